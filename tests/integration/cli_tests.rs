//! Command-line tests for the site-collector binary
//!
//! These run the built executable against wiremock servers and check exit
//! codes, usage output and the per-page progress lines.

use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_collector(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_site-collector"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to run site-collector")
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

#[tokio::test]
async fn test_missing_url_prints_usage() {
    let output = run_collector(&[]).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
    assert!(stderr.contains("<URL>"));
}

#[tokio::test]
async fn test_version_flag() {
    for flag in ["-v", "--version"] {
        let output = run_collector(&[flag]).await;

        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }
}

#[tokio::test]
async fn test_invalid_concurrency_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let sitemap = dir.path().join("sitemap.xml");

    let output = run_collector(&[
        "http://127.0.0.1:9/",
        "-c",
        "0",
        "--sitemap",
        sitemap.to_str().unwrap(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(!sitemap.exists());
}

#[tokio::test]
async fn test_crawl_exits_zero_and_reports_failures() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<html><body><a href="/broken">Broken</a></body></html>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let sitemap = dir.path().join("sitemap.xml");

    let output = run_collector(&[
        base_url.as_str(),
        "--max_duration",
        "2",
        "--sitemap",
        sitemap.to_str().unwrap(),
    ])
    .await;

    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("500, 0.00M, "));
    assert!(stdout.contains(&format!(
        "{}/broken <- ERROR: Internal Server Error, parent: {}/",
        base_url, base_url
    )));
    assert!(stdout.contains("Well done, 2 URLs processed."));

    let document = std::fs::read_to_string(&sitemap).unwrap();
    assert_eq!(document.matches("<url>").count(), 1);
}
