pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod fingerprint;
pub mod normalize;
pub mod ratio;
pub mod result;

pub use crawler::{CrawlConfig, CrawlState, Crawler, ProgressCallback, ResultCallback};
pub use error::ScanError;
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use fingerprint::ContentFingerprint;
pub use normalize::NormalizedUrl;
pub use result::{CrawlStats, PageRecord, SkipReason, VisitOutcome};
