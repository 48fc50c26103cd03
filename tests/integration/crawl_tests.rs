//! Integration tests for the crawler
//!
//! These tests use wiremock to serve paginated listings and run the
//! HtmlExtractor through the full PageCrawler loop end-to-end.

use listing_pager::config::{ExtractorConfig, UserAgentConfig};
use listing_pager::storage::{retain_unseen, SqliteFingerprintStore};
use listing_pager::{FailureKind, HtmlExtractor, PageCrawler, TerminationReason};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestPager".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/bot".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn create_extractor(config: ExtractorConfig) -> HtmlExtractor {
    HtmlExtractor::new(&create_test_agent(), config, 5_000).expect("Failed to build extractor")
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Jobs</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

fn titles(result: &listing_pager::CrawlResult) -> Vec<&str> {
    result.items().iter().map(|i| i.title.as_str()).collect()
}

#[tokio::test]
async fn test_follows_rel_next_across_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/jobs",
        r#"<ul>
             <li><a href="/jobs/1">Backend Engineer</a></li>
             <li><a href="/jobs/2">Frontend Engineer</a></li>
           </ul>
           <a rel="next" href="/jobs/page/2">Next</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/jobs/page/2",
        r#"<ul>
             <li><a href="/jobs/2">Frontend Engineer</a></li>
             <li><a href="/jobs/3">Data Engineer</a></li>
           </ul>
           <a rel="next" href="/jobs/page/3">Next</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/jobs/page/3",
        r#"<ul>
             <li><a href="/jobs/4">Product Owner</a></li>
             <li><a href="/jobs/5">Designer</a></li>
           </ul>
           <a rel="prev" href="/jobs/page/2">Previous</a>"#,
    )
    .await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .crawl(&format!("{}/jobs", server.uri()), &mut extractor)
        .await
        .expect("Crawl should start");

    assert_eq!(result.terminated_reason(), TerminationReason::NoNextPage);
    assert_eq!(result.pages_extracted(), 3);
    assert_eq!(result.pages_visited(), 2);
    assert_eq!(
        titles(&result),
        vec![
            "Backend Engineer",
            "Frontend Engineer",
            "Data Engineer",
            "Product Owner",
            "Designer"
        ]
    );
    assert_eq!(result.items()[0].url, format!("{}/jobs/1", server.uri()));
}

#[tokio::test]
async fn test_builds_page_param_from_indicator() {
    let server = MockServer::start().await;

    // Page-specific mocks are mounted before the bare listing mock
    for page in 2..=3 {
        Mock::given(method("GET"))
            .and(path("/career"))
            .and(query_param("page", page.to_string()))
            .respond_with(html_page(&format!(
                r#"<a href="/career/job-{page}">Opening {page}</a>
                   <div class="pagination">Seite {page} von 3</div>"#
            )))
            .mount(&server)
            .await;
    }
    mount_page(
        &server,
        "/career",
        r#"<a href="/career/job-1">Opening 1</a>
           <div class="pagination">Seite 1 von 3</div>"#,
    )
    .await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .crawl(&format!("{}/career", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(result.terminated_reason(), TerminationReason::NoNextPage);
    assert_eq!(titles(&result), vec!["Opening 1", "Opening 2", "Opening 3"]);

    let last = result.last_pagination().unwrap();
    assert_eq!(last.current_page, 3);
    assert_eq!(last.total_pages, 3);
}

#[tokio::test]
async fn test_relative_next_resolved_against_current_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing/all"))
        .and(query_param("p", "2"))
        .respond_with(html_page(r#"<a href="/item/b">Item B</a>"#))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/listing/all",
        r#"<a href="/item/a">Item A</a><a class="next" href="?p=2">Weiter</a>"#,
    )
    .await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .crawl(&format!("{}/listing/all", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(titles(&result), vec!["Item A", "Item B"]);
    assert_eq!(result.pages_visited(), 1);
}

#[tokio::test]
async fn test_http_error_keeps_partial_results() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/jobs",
        r#"<a href="/jobs/1">Engineer</a><a rel="next" href="/jobs/page/2">Next</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/jobs/page/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .crawl(&format!("{}/jobs", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(
        result.terminated_reason(),
        TerminationReason::ExtractionFailed(FailureKind::Error)
    );
    assert_eq!(titles(&result), vec!["Engineer"]);
    assert!(result.last_error().unwrap().contains("404"));
}

#[tokio::test]
async fn test_non_html_start_page_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .crawl(&format!("{}/jobs.json", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(
        result.terminated_reason(),
        TerminationReason::ExtractionFailed(FailureKind::Error)
    );
    assert!(result.items().is_empty());
    assert_eq!(result.pages_extracted(), 0);
}

#[tokio::test]
async fn test_empty_start_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/jobs", "<p>No open positions right now.</p>").await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .crawl(&format!("{}/jobs", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(result.terminated_reason(), TerminationReason::EmptyStart);
    assert!(result.items().is_empty());
}

#[tokio::test]
async fn test_page_limit_stops_pagination_cycle() {
    let server = MockServer::start().await;

    // Two pages pointing at each other
    mount_page(
        &server,
        "/jobs",
        r#"<a href="/jobs/1">Engineer</a><a rel="next" href="/jobs/more">Next</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/jobs/more",
        r#"<a href="/jobs/2">Designer</a><a rel="next" href="/jobs">Next</a>"#,
    )
    .await;

    let mut extractor = create_extractor(ExtractorConfig::default());
    let result = PageCrawler::new()
        .with_page_limit(3)
        .crawl(&format!("{}/jobs", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(result.terminated_reason(), TerminationReason::PageLimitReached);
    assert_eq!(result.pages_extracted(), 3);
    assert_eq!(titles(&result), vec!["Engineer", "Designer"]);
}

#[tokio::test]
async fn test_same_host_only_drops_foreign_links() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/jobs",
        r#"<a href="/jobs/1">Engineer</a>
           <a href="https://jobs.example.org/42">Partner Opening</a>"#,
    )
    .await;

    let config = ExtractorConfig {
        same_host_only: true,
        ..ExtractorConfig::default()
    };
    let mut extractor = create_extractor(config);
    let result = PageCrawler::new()
        .crawl(&format!("{}/jobs", server.uri()), &mut extractor)
        .await
        .unwrap();

    assert_eq!(titles(&result), vec!["Engineer"]);
}

#[tokio::test]
async fn test_second_run_reports_only_new_items() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/jobs",
        r#"<a href="/jobs/1">Engineer</a><a href="/jobs/2">Designer</a>"#,
    )
    .await;

    let start_url = format!("{}/jobs", server.uri());
    let mut store = SqliteFingerprintStore::new_in_memory().unwrap();

    let mut extractor = create_extractor(ExtractorConfig::default());
    let first = PageCrawler::new().crawl(&start_url, &mut extractor).await.unwrap();
    assert_eq!(retain_unseen(first.items(), &mut store).unwrap().len(), 2);

    let second = PageCrawler::new().crawl(&start_url, &mut extractor).await.unwrap();
    assert_eq!(second.items().len(), 2);
    assert!(retain_unseen(second.items(), &mut store).unwrap().is_empty());
}
