use clap::ArgMatches;
use colored::Colorize;
use fathom_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
use fathom_core::report::{DEFAULT_OUTPUT, ReportFormat, generate_crawl_report, write_report};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Everything `handle_crawl` needs, resolved from the command line.
pub struct CrawlRequest {
    pub options: CrawlOptions,
    pub format: ReportFormat,
    pub output: PathBuf,
    pub quiet: bool,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the default level.
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Default report path for a format when `--output` is not given
pub fn default_output(format: ReportFormat) -> PathBuf {
    match format {
        ReportFormat::Tsv => PathBuf::from(DEFAULT_OUTPUT),
        ReportFormat::Json => PathBuf::from("output.json"),
    }
}

pub fn crawl_request_from_args(args: &ArgMatches) -> Result<CrawlRequest, String> {
    let url = args
        .get_one::<String>("ROOT_URL")
        .ok_or("A root URL is required")?;
    let depth = *args
        .get_one::<u64>("DEPTH")
        .ok_or("A depth limit is required")?;
    let depth =
        usize::try_from(depth).map_err(|_| format!("Depth limit {} is too large", depth))?;

    let format_name = args
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("tsv");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| format!("Unknown report format: {}", format_name))?;

    let output = args
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| default_output(format));
    let timeout = *args.get_one::<u64>("timeout").unwrap_or(&10);
    let quiet = args.get_flag("quiet");

    Ok(CrawlRequest {
        options: CrawlOptions {
            url: url.clone(),
            max_depth: depth,
            fetch_timeout: Duration::from_secs(timeout),
            show_progress_bars: !quiet,
        },
        format,
        output,
        quiet,
    })
}

/// Run the crawl described by `args` and return the process exit code.
pub async fn handle_crawl(args: &ArgMatches) -> i32 {
    let request = match crawl_request_from_args(args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };

    init_tracing(request.quiet);

    if !request.quiet {
        println!("Root URL: {}", request.options.url.bright_white());
        println!("Max depth: {}", request.options.max_depth);
        println!(
            "Output: {} ({})\n",
            request.output.display(),
            request.format.as_str()
        );
    }

    let progress_callback: Option<CrawlProgressCallback> = if request.quiet {
        None
    } else {
        Some(Arc::new(|msg: String| println!("{}", msg)))
    };

    let summary = match execute_crawl(request.options, progress_callback).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };

    match write_report(&summary, request.format, &request.output) {
        Ok(true) => {
            if !request.quiet {
                println!(
                    "\n{} Results saved to {}",
                    "✓".green().bold(),
                    request.output.display().to_string().bright_white()
                );
            }
        }
        Ok(false) => {
            if !request.quiet {
                println!(
                    "\n{} No pages recorded, no report written",
                    "→".yellow().bold()
                );
            }
        }
        Err(e) => {
            eprintln!(
                "{} Failed to write {}: {}",
                "✗".red().bold(),
                request.output.display(),
                e
            );
            return 1;
        }
    }

    if !request.quiet {
        println!();
        print!("{}", generate_crawl_report(&summary));
    }

    0
}
