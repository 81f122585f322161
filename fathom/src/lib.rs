pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{CrawlRequest, crawl_request_from_args, handle_crawl, init_tracing};

// Re-export crawl functionality from fathom-core
pub use fathom_core::crawl::{CrawlOptions, CrawlSummary, execute_crawl};
pub use fathom_core::report::{ReportFormat, generate_crawl_report, write_report};
