use fathom::ReportFormat;
use fathom::commands::command_argument_builder;
use fathom::handlers::{crawl_request_from_args, default_output, handle_crawl};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn parse(args: &[&str]) -> Result<clap::ArgMatches, clap::Error> {
    command_argument_builder().try_get_matches_from(args)
}

#[test]
fn test_positional_arguments() {
    let matches = parse(&["fathom", "http://www.example.com", "2"]).unwrap();
    let request = crawl_request_from_args(&matches).unwrap();

    assert_eq!(request.options.url, "http://www.example.com");
    assert_eq!(request.options.max_depth, 2);
    assert_eq!(request.options.fetch_timeout, Duration::from_secs(10));
    assert_eq!(request.format, ReportFormat::Tsv);
    assert_eq!(request.output, PathBuf::from("output.tsv"));
    assert!(!request.quiet);
    assert!(request.options.show_progress_bars);
}

#[test]
fn test_missing_depth_is_a_usage_error() {
    assert!(parse(&["fathom", "http://www.example.com"]).is_err());
    assert!(parse(&["fathom"]).is_err());
}

#[test]
fn test_depth_must_be_positive() {
    assert!(parse(&["fathom", "example.com", "0"]).is_err());
    assert!(parse(&["fathom", "example.com", "-1"]).is_err());
    assert!(parse(&["fathom", "example.com", "two"]).is_err());
}

#[test]
fn test_extra_arguments_are_rejected() {
    assert!(parse(&["fathom", "example.com", "2", "extra"]).is_err());
}

#[test]
fn test_json_format_changes_default_output() {
    let matches = parse(&["fathom", "-q", "-f", "json", "example.com", "1"]).unwrap();
    let request = crawl_request_from_args(&matches).unwrap();

    assert_eq!(request.format, ReportFormat::Json);
    assert_eq!(request.output, default_output(ReportFormat::Json));
    assert!(request.quiet);
    assert!(!request.options.show_progress_bars);
}

#[test]
fn test_explicit_output_and_timeout() {
    let matches = parse(&[
        "fathom",
        "--output",
        "/tmp/report.tsv",
        "--timeout",
        "3",
        "example.com",
        "4",
    ])
    .unwrap();
    let request = crawl_request_from_args(&matches).unwrap();

    assert_eq!(request.output, PathBuf::from("/tmp/report.tsv"));
    assert_eq!(request.options.fetch_timeout, Duration::from_secs(3));
    assert_eq!(request.options.max_depth, 4);
}

#[tokio::test]
async fn test_handle_crawl_writes_tsv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/next">next</a>"#, "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>end</p>", "text/html"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output.tsv");
    let output_arg = output.to_string_lossy().to_string();
    let uri = server.uri();
    let matches = parse(&["fathom", "-q", "-o", &output_arg, &uri, "2"]).unwrap();

    let code = handle_crawl(&matches).await;

    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        format!("url\tdepth\tratio\n{uri}/\t1\t1.0\n{uri}/next\t2\t0.0\n")
    );
}

#[tokio::test]
async fn test_handle_crawl_fails_on_unreachable_seed() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output.tsv");
    let output_arg = output.to_string_lossy().to_string();
    let matches = parse(&["fathom", "-q", "-o", &output_arg, "127.0.0.1:1", "1"]).unwrap();

    let code = handle_crawl(&matches).await;

    assert_eq!(code, 1);
    assert!(!output.exists());
}
