//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from seed URL to sitemap file.

use site_collector::config::{build_config, CliOverrides, CollectorConfig};
use site_collector::crawler::collect;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing the sitemap into `dir`
fn create_test_config(seed: &str, dir: &TempDir, concurrency: usize) -> CollectorConfig {
    let overrides = CliOverrides {
        concurrency: Some(concurrency),
        max_duration_secs: Some(2),
        user_agent: Some("TestBot/1.0".to_string()),
        sitemap_path: Some(dir.path().join("sitemap.xml").display().to_string()),
    };
    build_config(seed, None, overrides).expect("Failed to build config")
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn read_sitemap(config: &CollectorConfig) -> String {
    std::fs::read_to_string(Path::new(&config.output.sitemap_path))
        .expect("Failed to read sitemap")
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(
            r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://other.example.org/">Elsewhere</a>
            <a href="/">Home</a>
            </body></html>"#,
        ),
    )
    .await;

    // Each page is requested exactly once even though both link to each other.
    mount_page(
        &mock_server,
        "/page1",
        html_page(r#"<html><body><a href="/page2">2</a><a href="/#top">Home</a></body></html>"#),
    )
    .await;

    mount_page(
        &mock_server,
        "/page2",
        html_page(r#"<html><body><a href="/page1">1</a></body></html>"#),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir, 2);

    let summary = collect(&config).await.expect("Crawl failed");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.pages_written, 3);
    assert_eq!(summary.failures, 0);

    let sitemap = read_sitemap(&config);
    assert!(sitemap.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(sitemap.ends_with("</urlset>"));
    assert_eq!(sitemap.matches("<url>").count(), 3);
    assert!(sitemap.contains(&format!("<loc>{}/</loc>", base_url)));
    assert!(sitemap.contains(&format!("<loc>{}/page1</loc>", base_url)));
    assert!(sitemap.contains(&format!("<loc>{}/page2</loc>", base_url)));
    assert!(!sitemap.contains("other.example.org"));
}

#[tokio::test]
async fn test_failing_seed_leaves_empty_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", ResponseTemplate::new(500)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir, 1);

    let summary = collect(&config).await.expect("Crawl should absorb fetch errors");

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.pages_written, 0);
    assert_eq!(
        read_sitemap(&config),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"https://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         </urlset>"
    );
}

#[tokio::test]
async fn test_non_html_and_missing_pages_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(
            r#"<html><body>
            <a href="/report.pdf">Report</a>
            <a href="/gone">Gone</a>
            <a href="/about">About</a>
            </body></html>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/report.pdf",
        ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
    )
    .await;

    mount_page(&mock_server, "/gone", ResponseTemplate::new(404)).await;

    mount_page(
        &mock_server,
        "/about",
        html_page("<html><body>About us</body></html>"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir, 3);

    let summary = collect(&config).await.expect("Crawl failed");

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.fetched, 4);
    assert_eq!(summary.failures, 1);

    let sitemap = read_sitemap(&config);
    assert_eq!(sitemap.matches("<url>").count(), 2);
    assert!(sitemap.contains(&format!("<loc>{}/about</loc>", base_url)));
    assert!(!sitemap.contains("report.pdf"));
    assert!(!sitemap.contains("/gone"));
}

#[tokio::test]
async fn test_query_string_escaped_in_sitemap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(r#"<html><body><a href="/search?a=1&amp;b=2">Search</a></body></html>"#),
    )
    .await;

    mount_page(
        &mock_server,
        "/search",
        html_page("<html><body>Results</body></html>"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir, 1);

    collect(&config).await.expect("Crawl failed");

    let sitemap = read_sitemap(&config);
    assert!(sitemap.contains(&format!("<loc>{}/search?a=1&amp;b=2</loc>", base_url)));
    assert!(!sitemap.contains("a=1&b=2"));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(r#"<html><body><a href="/slow">Slow</a><a href="/fast">Fast</a></body></html>"#),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/fast", html_page("<html></html>")).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir, 2);

    let summary = collect(&config).await.expect("Crawl failed");

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failures, 1);

    let sitemap = read_sitemap(&config);
    assert!(sitemap.contains(&format!("<loc>{}/fast</loc>", base_url)));
    assert!(!sitemap.contains("/slow"));
}

#[tokio::test]
async fn test_previous_sitemap_replaced() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("<html></html>")).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir, 1);
    std::fs::write(&config.output.sitemap_path, "<loc>https://stale.example/</loc>").unwrap();

    collect(&config).await.expect("Crawl failed");

    let sitemap = read_sitemap(&config);
    assert!(!sitemap.contains("stale.example"));
    assert_eq!(sitemap.matches("<url>").count(), 1);
}
