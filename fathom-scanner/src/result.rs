use crate::normalize::NormalizedUrl;
use serde::Serialize;
use std::fmt;

/// One processed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub url: NormalizedUrl,
    pub depth: usize,
    /// Share of the page's links pointing at its own host, two decimals.
    pub ratio: f64,
}

impl PageRecord {
    pub fn new(url: NormalizedUrl, depth: usize, ratio: f64) -> Self {
        Self { url, depth, ratio }
    }
}

/// Why a visit ended without a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DepthExceeded,
    AlreadyVisited,
    FetchError,
    NonHtml,
    DuplicateContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::DepthExceeded => "depth exceeded",
            SkipReason::AlreadyVisited => "already visited",
            SkipReason::FetchError => "fetch error",
            SkipReason::NonHtml => "non-HTML content",
            SkipReason::DuplicateContent => "duplicate content",
        };
        f.write_str(s)
    }
}

/// Terminal state of a single visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    Recorded,
    Skipped(SkipReason),
}

/// Outcome counters for one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Requests sent, successful or not.
    pub fetches: usize,
    pub recorded: usize,
    pub depth_exceeded: usize,
    pub already_visited: usize,
    pub fetch_errors: usize,
    pub non_html: usize,
    pub duplicate_content: usize,
}

impl CrawlStats {
    pub fn record(&mut self, outcome: VisitOutcome) {
        match outcome {
            VisitOutcome::Recorded => self.recorded += 1,
            VisitOutcome::Skipped(SkipReason::DepthExceeded) => self.depth_exceeded += 1,
            VisitOutcome::Skipped(SkipReason::AlreadyVisited) => self.already_visited += 1,
            VisitOutcome::Skipped(SkipReason::FetchError) => self.fetch_errors += 1,
            VisitOutcome::Skipped(SkipReason::NonHtml) => self.non_html += 1,
            VisitOutcome::Skipped(SkipReason::DuplicateContent) => self.duplicate_content += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.depth_exceeded
            + self.already_visited
            + self.fetch_errors
            + self.non_html
            + self.duplicate_content
    }
}
