use fathom_scanner::normalize::normalize;
use fathom_scanner::{
    CrawlStats, Crawler, HttpFetcher, NormalizedUrl, PageRecord, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub url: String,
    pub max_depth: usize,
    pub fetch_timeout: Duration,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>, max_depth: usize) -> Self {
        Self {
            url: url.into(),
            max_depth,
            fetch_timeout: fathom_scanner::crawler::DEFAULT_FETCH_TIMEOUT,
            show_progress_bars: false,
        }
    }
}

/// Everything a finished crawl produced.
#[derive(Debug)]
pub struct CrawlSummary {
    pub seed: NormalizedUrl,
    pub max_depth: usize,
    pub records: Vec<PageRecord>,
    pub stats: CrawlStats,
    pub elapsed: Duration,
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options
///
/// The only error is a seed that cannot be normalized.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlSummary, String> {
    let CrawlOptions {
        url,
        max_depth,
        fetch_timeout,
        show_progress_bars,
    } = options;

    if max_depth == 0 {
        return Err("Depth limit must be a positive integer".to_string());
    }

    // One client, and so one connection pool, per crawl
    let fetcher = HttpFetcher::new().map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let seed = normalize(&url, &fetcher)
        .await
        .map_err(|e| format!("Invalid root URL: {} ({})", url, e))?;

    if let Some(ref callback) = progress_callback {
        callback(format!("Crawling {} to depth {}", seed, max_depth));
    }

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let internal_progress_callback: ProgressCallback = match progress_bar {
        Some(ref pb) => {
            let pb_clone = pb.clone();
            let count_clone = processed_count.clone();
            Arc::new(move |depth: usize, url: String| {
                let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
                pb_clone.set_message(format!(
                    "[{}] depth {} {}",
                    count,
                    depth,
                    extract_url_path(&url)
                ));
            })
        }
        None => {
            let count_clone = processed_count.clone();
            Arc::new(move |_depth: usize, _url: String| {
                count_clone.fetch_add(1, Ordering::Relaxed);
            })
        }
    };

    let crawler = Crawler::new(fetcher)
        .with_max_depth(max_depth)
        .with_fetch_timeout(fetch_timeout)
        .with_progress_callback(internal_progress_callback);

    let started = Instant::now();
    let state = crawler.run(&seed).await;
    let elapsed = started.elapsed();

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Crawl complete! {} URLs requested", total));
    }

    let (records, stats) = state.into_parts();
    info!(
        "Crawled {} in {:.2}s: {} pages recorded",
        seed,
        elapsed.as_secs_f64(),
        records.len()
    );

    Ok(CrawlSummary {
        seed,
        max_depth,
        records,
        stats,
        elapsed,
    })
}
