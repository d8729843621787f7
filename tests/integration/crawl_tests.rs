//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end through the production fetcher and
//! checkpoint store.

use product_scout::config::{parse_config, Config};
use product_scout::crawler::run_crawl;
use product_scout::output::CrawlReport;
use product_scout::storage::{CheckpointStore, JsonCheckpointStore};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a config crawling the mock server with the given max depth
fn create_test_config(server: &MockServer, checkpoint: &Path, max_depth: u32) -> Config {
    let toml = format!(
        r#"
[crawler]
max-depth = {max_depth}
max-workers = 4
idle-timeout-secs = 1
fetch-timeout-secs = 5

[checkpoint]
path = "{checkpoint}"

[[domain]]
name = "127.0.0.1"
seed = "{uri}/"
"#,
        max_depth = max_depth,
        checkpoint = checkpoint.display(),
        uri = server.uri(),
    );
    parse_config(&toml).expect("test config should be valid")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn crawl(config: Config, fresh: bool) -> CrawlReport {
    tokio::time::timeout(Duration::from_secs(20), run_crawl(config, None, fresh))
        .await
        .expect("crawl should finish")
        .expect("crawl should start")
}

#[tokio::test]
async fn test_full_crawl_finds_products_in_scope() {
    let server = MockServer::start().await;
    let port = server.address().port();
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("progress.json");

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/product/1">One</a>
            <a href="/about">About</a>
            <a href="https://other.com/product/2">Elsewhere</a>
            <a href="http://localhost:{}/product/3">Same server, other host</a>"#,
            port
        ),
        1,
    )
    .await;
    mount_page(&server, "/product/1", "<h1>Blue shirt</h1>", 1).await;
    mount_page(&server, "/about", "<h1>About us</h1>", 1).await;
    mount_page(&server, "/product/3", "<h1>Never</h1>", 0).await;

    let config = create_test_config(&server, &checkpoint, 1);
    let report = crawl(config, false).await;

    let base = server.uri();
    let products = report.products_for("127.0.0.1");
    assert_eq!(products.len(), 1);
    assert!(products.contains(&format!("{}/product/1", base)));
    assert_eq!(report.visited_total, 3);
    assert!(report.checkpoint_error.is_none());

    let saved = JsonCheckpointStore::new(&checkpoint).load();
    assert!(saved.visited_urls.contains(&format!("{}/", base)));
    assert!(saved.visited_urls.contains(&format!("{}/about", base)));
    assert_eq!(saved.product_count(), 1);
}

#[tokio::test]
async fn test_checkpoint_file_shape() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("progress.json");

    mount_page(&server, "/", r#"<a href="/item/9">Nine</a>"#, 1).await;
    mount_page(&server, "/item/9", "<p>Red hat</p>", 1).await;

    crawl(create_test_config(&server, &checkpoint, 1), false).await;

    let raw = std::fs::read_to_string(&checkpoint).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["visited_urls"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        json["product_urls"]["127.0.0.1"][0].as_str(),
        Some(format!("{}/item/9", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &dir.path().join("progress.json"), 1);
    let report = crawl(config, false).await;

    assert_eq!(report.visited_total, 1);
    assert_eq!(report.counters.failed, 1);
    assert_eq!(report.total_products(), 0);
    assert!(report.domains.contains_key("127.0.0.1"));
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#, 1).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#, 1).await;
    mount_page(&server, "/b", r#"<a href="/c">C</a>"#, 0).await;

    let config = create_test_config(&server, &dir.path().join("progress.json"), 1);
    let report = crawl(config, false).await;

    assert_eq!(report.visited_total, 2);
    assert_eq!(report.counters.depth_exceeded, 1);
}

#[tokio::test]
async fn test_resume_does_not_refetch() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("progress.json");

    // Hit counts span both runs
    mount_page(&server, "/", r#"<a href="/p/1">One</a>"#, 1).await;
    mount_page(&server, "/p/1", "<p>Socks</p>", 1).await;

    let first = crawl(create_test_config(&server, &checkpoint, 1), false).await;
    assert_eq!(first.total_products(), 1);

    let second = crawl(create_test_config(&server, &checkpoint, 1), false).await;
    assert_eq!(second.counters.fetched, 0);
    assert_eq!(second.total_products(), 1);
}

#[tokio::test]
async fn test_fresh_crawl_refetches() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let checkpoint = dir.path().join("progress.json");

    mount_page(&server, "/", "<p>Welcome</p>", 2).await;

    crawl(create_test_config(&server, &checkpoint, 1), false).await;
    let report = crawl(create_test_config(&server, &checkpoint, 1), true).await;

    assert_eq!(report.counters.fetched, 1);
}

#[tokio::test]
async fn test_links_resolved_after_redirect() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/shop/"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/shop/", r#"<a href="item/5">Five</a>"#, 1).await;
    mount_page(&server, "/shop/item/5", "<p>Green scarf</p>", 1).await;

    let config = create_test_config(&server, &dir.path().join("progress.json"), 1);
    let report = crawl(config, false).await;

    assert!(report
        .products_for("127.0.0.1")
        .contains(&format!("{}/shop/item/5", server.uri())));
}

#[tokio::test]
async fn test_keyword_and_metadata_classification() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/cart-page">Cart</a><a href="/meta-page">Meta</a><a href="/plain">Plain</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/cart-page", "<button>Add to Cart</button>", 1).await;
    Mock::given(method("GET"))
        .and(path("/meta-page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><meta property="og:type" content="product"></head><body>Hat</body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/plain", "<p>Our story</p>", 1).await;

    let config = create_test_config(&server, &dir.path().join("progress.json"), 1);
    let report = crawl(config, false).await;

    let base = server.uri();
    let products = report.products_for("127.0.0.1");
    assert_eq!(products.len(), 2);
    assert!(products.contains(&format!("{}/cart-page", base)));
    assert!(products.contains(&format!("{}/meta-page", base)));
}
