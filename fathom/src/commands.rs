use clap::arg;
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("fathom")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("fathom")
        .about("Crawl a site depth-first and record the same-domain link ratio of every page")
        .styles(CLAP_STYLING)
        .arg(
            arg!(<ROOT_URL>)
                .help("The URL to start crawling from; http:// or https:// is probed if omitted"),
        )
        .arg(
            arg!(<DEPTH>)
                .help("Recursion depth limit (positive integer); the root URL is depth 1")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the report (default: output.tsv, or output.json with --format json)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format")
                .value_parser(["tsv", "json"])
                .default_value("tsv"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-page request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress and summary output").required(false))
}
