// Report generation from crawl results

use crate::crawl::CrawlSummary;
use fathom_scanner::PageRecord;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const DEFAULT_OUTPUT: &str = "output.tsv";
pub const TSV_HEADER: &str = "url\tdepth\tratio";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Tsv,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tsv" => Some(ReportFormat::Tsv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Tsv => "tsv",
            ReportFormat::Json => "json",
        }
    }
}

/// First record of every URL, in record order.
pub fn unique_records(records: &[PageRecord]) -> Vec<&PageRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.url.as_str()))
        .collect()
}

/// Ratios always carry a decimal point: `0.0`, `0.5`, `0.67`, `1.0`.
pub fn format_ratio(ratio: f64) -> String {
    if ratio.fract() == 0.0 {
        format!("{:.1}", ratio)
    } else {
        format!("{}", ratio)
    }
}

pub fn generate_tsv_report(records: &[PageRecord]) -> String {
    let mut report = String::new();
    report.push_str(TSV_HEADER);
    report.push('\n');

    for record in unique_records(records) {
        report.push_str(&format!(
            "{}\t{}\t{}\n",
            record.url,
            record.depth,
            format_ratio(record.ratio)
        ));
    }

    report
}

pub fn generate_json_report(summary: &CrawlSummary) -> serde_json::Result<String> {
    let pages = unique_records(&summary.records);
    let json_report = serde_json::json!({
        "report": {
            "generator": "fathom",
            "version": env!("CARGO_PKG_VERSION"),
            "seed": summary.seed.as_str(),
            "max_depth": summary.max_depth,
            "elapsed_ms": summary.elapsed.as_millis() as u64,
        },
        "summary": {
            "pages_recorded": pages.len(),
            "stats": summary.stats,
        },
        "pages": pages,
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Write the report for `summary` to `path`.
///
/// Nothing is written when the crawl recorded no pages; the return value
/// says whether a file was produced.
pub fn write_report(
    summary: &CrawlSummary,
    format: ReportFormat,
    path: &Path,
) -> std::io::Result<bool> {
    if summary.records.is_empty() {
        info!("No pages recorded, skipping report");
        return Ok(false);
    }

    info!("Saving results to {}", path.display());
    let content = match format {
        ReportFormat::Tsv => generate_tsv_report(&summary.records),
        ReportFormat::Json => generate_json_report(summary)?,
    };
    save_report(&content, path)?;
    Ok(true)
}

/// Human readable summary shown after a crawl.
pub fn generate_crawl_report(summary: &CrawlSummary) -> String {
    let pages = unique_records(&summary.records);
    let stats = &summary.stats;

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seed: {}\n", summary.seed));
    report.push_str(&format!("  Max depth: {}\n", summary.max_depth));
    report.push_str(&format!("  Pages recorded: {}\n", pages.len()));
    report.push_str(&format!("  Requests sent: {}\n", stats.fetches));
    report.push_str(&format!("  Fetch errors: {}\n", stats.fetch_errors));
    report.push_str(&format!("  Non-HTML skipped: {}\n", stats.non_html));
    report.push_str(&format!(
        "  Duplicate content skipped: {}\n",
        stats.duplicate_content
    ));
    report.push_str(&format!(
        "  Elapsed: {:.2}s\n",
        summary.elapsed.as_secs_f64()
    ));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group pages by host, hosts in order of first appearance
    let mut hosts: Vec<&str> = Vec::new();
    let mut by_host: HashMap<&str, Vec<&PageRecord>> = HashMap::new();
    for record in pages {
        let host = record.url.host_str().unwrap_or("unknown");
        if !by_host.contains_key(host) {
            hosts.push(host);
        }
        by_host.entry(host).or_default().push(record);
    }

    for host in hosts {
        let host_pages = &by_host[host];
        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} pages found\n\n", host_pages.len()));

        for record in host_pages {
            let path = record.url.as_url().path();
            report.push_str(&format!(
                "  [{}] {} \x1b[90mratio {}\x1b[0m\n",
                record.depth,
                path,
                format_ratio(record.ratio)
            ));
        }
        report.push('\n');
    }

    report
}
