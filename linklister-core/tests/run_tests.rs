// End-to-end tests for the run modes against a mock blog

use linklister_core::crawl::{RunMode, RunOptions, RunOutcome, execute_run};
use linklister_core::matrix::AdjacencyMatrix;
use regex::Regex;
use std::sync::{Arc, Mutex};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount(server: &MockServer, route: &str, status: u16, content_type: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", content_type)
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

fn post(body: &str) -> String {
    format!(
        r#"<html><body>
            <header><a href="/blog/header-link">Header</a></header>
            <div class="blogpost-content">{}</div>
        </body></html>"#,
        body
    )
}

/// Feed with posts a, b and gone; a links to b and to an uncrawled post c.
async fn blog() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    let items: String = [("a", "Alpha"), ("b", "Beta"), ("gone", "Gone")]
        .iter()
        .map(|(slug, title)| {
            format!("<item><title>{title}</title><link>{base}/blog/{slug}</link></item>")
        })
        .collect();
    let feed = format!("<rss><channel><title>Blog</title>{items}</channel></rss>");
    mount(&server, "/blog/rss.xml", 200, "application/rss+xml", feed).await;

    mount(
        &server,
        "/blog/a",
        200,
        "text/html",
        post(
            r#"<p>Kafka topics</p>
               <a href="/blog/b">B</a>
               <a href="/blog/c#details">C</a>
               <a href="/docs/setup">Docs</a>
               <a href="/blog/rss.xml">Subscribe</a>"#,
        ),
    )
    .await;
    mount(&server, "/blog/b", 200, "text/html", post("<p>Nothing here</p>")).await;
    mount(&server, "/blog/gone", 404, "text/html", "Not Found".to_string()).await;

    server
}

fn options(server: &MockServer, mode: RunMode) -> RunOptions {
    let mut options = RunOptions::new(format!("{}/blog/rss.xml", server.uri()), "/blog/");
    options.mode = mode;
    options
}

#[tokio::test]
async fn test_matrix_mode_builds_expected_matrix() {
    let server = blog().await;
    let base = server.uri();

    let outcome = execute_run(options(&server, RunMode::Matrix), None)
        .await
        .unwrap();

    let RunOutcome::Matrix { urls, pages } = outcome else {
        panic!("expected a matrix outcome");
    };
    assert_eq!(urls.len(), 3);
    assert_eq!(pages.len(), 3);

    let a = format!("{base}/blog/a");
    let b = format!("{base}/blog/b");
    let c = format!("{base}/blog/c");
    let gone = format!("{base}/blog/gone");

    let matrix = AdjacencyMatrix::build(&pages, &urls);
    assert_eq!(matrix.labels(), [a.clone(), b.clone(), gone.clone(), c.clone()]);
    assert!(matrix.has_link(&a, &b));
    assert!(matrix.has_link(&a, &c));
    assert_eq!(matrix.link_count(), 2);

    // 404 leaves an empty row without stopping the crawl
    assert!(pages.links_of(&gone).unwrap().is_empty());
    assert_eq!(pages.failed().count(), 1);
}

#[tokio::test]
async fn test_list_mode_crawls_nothing() {
    let server = blog().await;

    let outcome = execute_run(options(&server, RunMode::List), None)
        .await
        .unwrap();

    match outcome {
        RunOutcome::Listed { urls } => assert_eq!(urls.len(), 3),
        other => panic!("expected a listing, got {:?}", other),
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/blog/rss.xml");
}

#[tokio::test]
async fn test_keyword_mode_reports_matching_pages() {
    let server = blog().await;
    let keyword = Regex::new("Kafka").unwrap();

    let outcome = execute_run(options(&server, RunMode::Keyword(keyword)), None)
        .await
        .unwrap();

    let RunOutcome::Keyword { hits, .. } = outcome else {
        panic!("expected a keyword outcome");
    };
    assert_eq!(hits.len(), 1);
    assert!(hits[0].url.ends_with("/blog/a"));
    assert_eq!(hits[0].count, 1);
}

#[tokio::test]
async fn test_match_and_limit_apply_before_crawling() {
    let server = blog().await;
    let mut options = options(&server, RunMode::Matrix);
    options.filter = options.filter.clone().with_match("BETA").with_limit(5);

    let outcome = execute_run(options, None).await.unwrap();

    let RunOutcome::Matrix { urls, pages } = outcome else {
        panic!("expected a matrix outcome");
    };
    assert_eq!(urls, vec![format!("{}/blog/b", server.uri())]);
    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn test_progress_callback_reports_failures() {
    let server = blog().await;
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();

    execute_run(
        options(&server, RunMode::Matrix),
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
    )
    .await
    .unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages[0].starts_with("Selected 3 URL(s)"));
    assert!(
        messages
            .iter()
            .any(|m| m.contains("Failed to process") && m.contains("/blog/gone"))
    );
}

#[tokio::test]
async fn test_feed_failure_aborts_run() {
    let server = MockServer::start().await;
    mount(&server, "/blog/rss.xml", 404, "text/html", "Not Found".to_string()).await;

    let result = execute_run(options(&server, RunMode::Matrix), None).await;

    let err = result.unwrap_err();
    assert!(err.contains("Could not process feed"));
    assert!(err.contains("404"));
}

#[tokio::test]
async fn test_malformed_feed_aborts_run() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/blog/rss.xml",
        200,
        "application/rss+xml",
        "<rss><channel><item><title>x</item></channel></rss>".to_string(),
    )
    .await;

    let result = execute_run(options(&server, RunMode::Matrix), None).await;
    assert!(result.unwrap_err().contains("Parse error"));
}
