use crate::error::Result;
use crate::extract::extract_links;
use crate::fetch::Fetcher;
use crate::fingerprint::ContentFingerprint;
use crate::normalize::{NormalizedUrl, normalize};
use crate::ratio::same_domain_ratio;
use crate::result::{CrawlStats, PageRecord, SkipReason, VisitOutcome};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Called with `(depth, url)` right before a page is requested.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
/// Called with every new record, in record order.
pub type ResultCallback = Arc<dyn Fn(PageRecord) + Send + Sync>;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Deepest level that may be recorded; the seed is depth 1.
    pub max_depth: usize,
    pub fetch_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Everything one crawl accumulates. Never shared between crawls.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: HashSet<String>,
    fingerprints: HashSet<ContentFingerprint>,
    records: Vec<PageRecord>,
    stats: CrawlStats,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn into_records(self) -> Vec<PageRecord> {
        self.records
    }

    pub fn into_parts(self) -> (Vec<PageRecord>, CrawlStats) {
        (self.records, self.stats)
    }
}

/// Depth-first crawler over whatever `Fetcher` it is given.
pub struct Crawler<F: Fetcher> {
    fetcher: F,
    config: CrawlConfig,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: CrawlConfig::default(),
            progress_callback: None,
            result_callback: None,
        }
    }

    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Normalize `start_url` and crawl from it.
    ///
    /// Fails only when the seed cannot be normalized; per-page failures are
    /// logged and skipped.
    pub async fn crawl(&self, start_url: &str) -> Result<Vec<PageRecord>> {
        let seed = normalize(start_url, &self.fetcher).await?;
        Ok(self.run(&seed).await.into_records())
    }

    /// Crawl from an already normalized seed with fresh state.
    pub async fn run(&self, seed: &NormalizedUrl) -> CrawlState {
        let mut state = CrawlState::new();
        self.run_with_state(seed, &mut state).await;
        state
    }

    /// Crawl from `seed` into an existing state.
    ///
    /// Pre-order depth-first: a link's whole subtree is finished before its
    /// next sibling. The frontier is a LIFO work list with children pushed in
    /// reverse, and visited checks happen when a frame is popped, so repeated
    /// siblings each get a frame and all but the first short-circuit.
    pub async fn run_with_state(&self, seed: &NormalizedUrl, state: &mut CrawlState) {
        info!(
            "Starting crawl of {} (max depth {})",
            seed, self.config.max_depth
        );

        let mut frontier: Vec<(NormalizedUrl, usize)> = vec![(seed.clone(), 1)];

        while let Some((url, depth)) = frontier.pop() {
            let (outcome, links) = self.visit(&url, depth, state).await;
            state.stats.record(outcome);

            frontier.extend(links.into_iter().rev().map(|link| (link, depth + 1)));
        }

        let stats = &state.stats;
        info!(
            "Crawl complete. Recorded {} pages ({} fetched, {} skipped)",
            stats.recorded,
            stats.fetches,
            stats.skipped()
        );
    }

    /// Process a single URL and return its outcome together with the links
    /// to follow (empty unless the page was recorded).
    pub async fn visit(
        &self,
        url: &NormalizedUrl,
        depth: usize,
        state: &mut CrawlState,
    ) -> (VisitOutcome, Vec<NormalizedUrl>) {
        if depth > self.config.max_depth {
            return (VisitOutcome::Skipped(SkipReason::DepthExceeded), Vec::new());
        }
        if state.is_visited(url) {
            debug!("Already visited {}", url);
            return (VisitOutcome::Skipped(SkipReason::AlreadyVisited), Vec::new());
        }

        info!("Crawling URL: {} at depth {}", url, depth);
        if let Some(ref callback) = self.progress_callback {
            callback(depth, url.to_string());
        }

        state.stats.fetches += 1;
        let page = match self
            .fetcher
            .fetch(url.as_url(), self.config.fetch_timeout)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return (VisitOutcome::Skipped(SkipReason::FetchError), Vec::new());
            }
        };

        let final_url = NormalizedUrl::from(page.final_url.clone());
        if !state.visited.insert(final_url.as_str().to_string()) {
            debug!("{} redirected to already visited {}", url, final_url);
            return (VisitOutcome::Skipped(SkipReason::AlreadyVisited), Vec::new());
        }

        if !page.is_html() {
            info!("Non-HTML content at {}, skipping.", final_url);
            return (VisitOutcome::Skipped(SkipReason::NonHtml), Vec::new());
        }

        if !state.fingerprints.insert(ContentFingerprint::of(&page.body)) {
            info!("Duplicate content at {}, skipping processing.", final_url);
            return (
                VisitOutcome::Skipped(SkipReason::DuplicateContent),
                Vec::new(),
            );
        }

        let links = extract_links(&page.body, final_url.as_url());
        let ratio = same_domain_ratio(&links, final_url.host_str());
        debug!(
            "{}: {} links, same-domain ratio {}",
            final_url,
            links.len(),
            ratio
        );

        let record = PageRecord::new(final_url, depth, ratio);
        if let Some(ref callback) = self.result_callback {
            callback(record.clone());
        }
        state.records.push(record);

        (VisitOutcome::Recorded, links)
    }
}
