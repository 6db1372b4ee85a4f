//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run discovery and
//! scraping end-to-end through the real HTTP fetcher.

use sitemap_seo::config::{Config, UserAgentConfig};
use sitemap_seo::crawler::{Crawler, Fetch, FetchError, HttpFetcher};
use sitemap_seo::{scrape_sitemap, HtmlExtractor};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the given sitemap URL
fn create_test_config(root_url: &str, concurrency: usize) -> Config {
    let mut config = Config::new(root_url);
    config.scraper.concurrency = concurrency;
    config.scraper.request_timeout_secs = 5;
    config.user_agent = UserAgentConfig {
        pool: vec!["TestBot/1.0".to_string()],
        seed: Some(1),
    };
    config
}

fn html_page(title: &str, h1: &str, description: Option<&str>) -> String {
    let meta = description
        .map(|d| format!(r#"<meta name="description" content="{}">"#, d))
        .unwrap_or_default();
    format!(
        "<html><head><title>{}</title>{}</head><body><h1>{}</h1></body></html>",
        title, meta, h1
    )
}

async fn mount_body(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a two-level sitemap tree with two pages
async fn mount_site(server: &MockServer) {
    let base_url = server.uri();

    mount_body(
        server,
        "/sitemap.xml",
        200,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/sub.xml</loc></sitemap>
  <url><loc>{base}/page1</loc></url>
</sitemapindex>"#,
            base = base_url
        ),
    )
    .await;

    mount_body(
        server,
        "/sub.xml",
        200,
        format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{}/page2</loc></url>
</urlset>"#,
            base_url
        ),
    )
    .await;

    mount_body(
        server,
        "/page1",
        200,
        html_page("Page 1", "First", Some("The first page")),
    )
    .await;
    mount_body(server, "/page2", 200, html_page("Page 2", "Second", None)).await;
}

#[tokio::test]
async fn test_discover_nested_sitemaps() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 4);
    let crawler = Crawler::new(config).expect("Failed to create crawler");

    let mut leaves = crawler.discover().await;
    leaves.sort();

    assert_eq!(
        leaves,
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );
}

#[tokio::test]
async fn test_full_crawl_extracts_records() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 2);
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let report = crawler.run().await;

    assert_eq!(report.discovered, 2);
    assert_eq!(report.records.len(), 2);

    let page1 = report
        .records
        .iter()
        .find(|r| r.url == format!("{}/page1", base_url))
        .expect("page1 record missing");
    assert_eq!(page1.title, "Page 1");
    assert_eq!(page1.h1, "First");
    assert_eq!(page1.meta_description, "The first page");
    assert_eq!(page1.status_code, 200);

    // A page without a description tag still yields a record
    let page2 = report
        .records
        .iter()
        .find(|r| r.url == format!("{}/page2", base_url))
        .expect("page2 record missing");
    assert_eq!(page2.title, "Page 2");
    assert_eq!(page2.meta_description, "");
}

#[tokio::test]
async fn test_transport_failure_is_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_body(
        &mock_server,
        "/a",
        200,
        html_page("Hello", "Hello", None),
    )
    .await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 2);
    let crawler = Crawler::new(config).expect("Failed to create crawler");

    // Nothing listens on port 1, so the second fetch fails to connect
    let records = crawler
        .scrape(vec![
            format!("{}/a", base_url),
            "http://127.0.0.1:1/b".to_string(),
        ])
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Hello");
    assert_eq!(records[0].url, format!("{}/a", base_url));
}

#[tokio::test]
async fn test_error_status_pages_are_still_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_body(
        &mock_server,
        "/sitemap.xml",
        200,
        format!(
            "<urlset><url><loc>{0}/missing</loc></url><url><loc>{0}/broken</loc></url></urlset>",
            base_url
        ),
    )
    .await;
    mount_body(
        &mock_server,
        "/missing",
        404,
        html_page("Not Found", "404", None),
    )
    .await;
    mount_body(&mock_server, "/broken", 500, String::new()).await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 2);
    let records = scrape_sitemap(config, Arc::new(HtmlExtractor))
        .await
        .expect("Failed to run crawl");

    let mut statuses: Vec<u16> = records.iter().map(|r| r.status_code).collect();
    statuses.sort();
    assert_eq!(statuses, vec![404, 500]);

    let missing = records.iter().find(|r| r.status_code == 404).unwrap();
    assert_eq!(missing.title, "Not Found");
}

#[tokio::test]
async fn test_unreachable_root_returns_empty_collection() {
    let config = create_test_config("http://127.0.0.1:1/sitemap.xml", 2);
    let records = scrape_sitemap(config, Arc::new(HtmlExtractor))
        .await
        .expect("Failed to run crawl");
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_empty_container_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_body(
        &mock_server,
        "/sitemap.xml",
        200,
        format!(
            "<sitemapindex><sitemap><loc>{0}/empty.xml</loc></sitemap><sitemap><loc>{0}/garbage.xml</loc></sitemap></sitemapindex>",
            base_url
        ),
    )
    .await;
    mount_body(&mock_server, "/empty.xml", 200, "<urlset></urlset>".to_string()).await;
    mount_body(
        &mock_server,
        "/garbage.xml",
        200,
        "<html><body><p>oops</body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 2);
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let report = crawler.run().await;

    assert_eq!(report.discovered, 0);
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn test_each_sitemap_fetched_once_per_listing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // sub.xml is listed twice, so without the revisit guard it is fetched twice
    mount_body(
        &mock_server,
        "/sitemap.xml",
        200,
        format!(
            "<sitemapindex><loc>{0}/sub.xml</loc><loc>{0}/sub.xml</loc></sitemapindex>",
            base_url
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sub.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<urlset><loc>{}/page</loc></urlset>", base_url)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 2);
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let leaves = crawler.discover().await;

    assert_eq!(leaves.len(), 2);
    // Wiremock verifies expect(2) when the mock server drops
}

#[tokio::test]
async fn test_skip_revisited_sitemaps_breaks_cycle() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_body(
        &mock_server,
        "/a.xml",
        200,
        format!("<s><loc>{0}/b.xml</loc><loc>{0}/page-a</loc></s>", base_url),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<s><loc>{0}/a.xml</loc><loc>{0}/page-b</loc></s>",
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/a.xml", base_url), 2);
    config.sitemap.skip_revisited_sitemaps = true;
    let crawler = Crawler::new(config).expect("Failed to create crawler");

    let mut leaves = crawler.discover().await;
    leaves.sort();
    assert_eq!(
        leaves,
        vec![format!("{}/page-a", base_url), format!("{}/page-b", base_url)]
    );
}

#[tokio::test]
async fn test_user_agent_comes_from_pool() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "PoolAgent/9.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let user_agent = UserAgentConfig {
        pool: vec!["PoolAgent/9.9".to_string()],
        seed: None,
    };
    let fetcher =
        HttpFetcher::new(&user_agent, Duration::from_secs(5)).expect("Failed to build fetcher");

    for _ in 0..3 {
        let page = fetcher
            .fetch(&format!("{}/ua", mock_server.uri()))
            .await
            .expect("Fetch failed");
        assert_eq!(page.status_code, 200);
        assert_eq!(page.body, "ok");
    }
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), Duration::from_secs(1))
        .expect("Failed to build fetcher");

    let result = fetcher.fetch(&format!("{}/slow", mock_server.uri())).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), Duration::from_secs(2))
        .expect("Failed to build fetcher");

    let result = fetcher.fetch("http://127.0.0.1:1/").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_record_url_follows_redirects() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_body(&mock_server, "/new", 200, html_page("Moved", "Moved", None)).await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 1);
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let records = crawler.scrape(vec![format!("{}/old", base_url)]).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/new", base_url));
    assert_eq!(records[0].title, "Moved");
}

#[tokio::test]
async fn test_many_pages_under_small_ceiling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let locs: String = (0..25)
        .map(|i| format!("<url><loc>{}/p/{}</loc></url>", base_url, i))
        .collect();
    mount_body(
        &mock_server,
        "/sitemap.xml",
        200,
        format!("<urlset>{}</urlset>", locs),
    )
    .await;

    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/p/\d+$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Listed", "Listed", Some("d")))
                .set_delay(Duration::from_millis(20)),
        )
        .expect(25)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/sitemap.xml", base_url), 3);
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let report = crawler.run().await;

    assert_eq!(report.discovered, 25);
    assert_eq!(report.records.len(), 25);
    assert!(report.records.iter().all(|r| r.meta_description == "d"));
}
