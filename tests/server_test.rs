use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_scraper::app::{CatalogService, PageFetcher};
use catalog_scraper::common::{CatalogError, Result};
use catalog_scraper::config::Config;
use catalog_scraper::server::{create_server, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const CATALOG_PAGE: &str = include_str!("fixtures/sectioned_catalog.html");

/// Serves the catalog fixture for every URL except the faculty directory.
struct FixtureFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.ends_with(".json") {
            return Ok(json!([
                {"id": 1, "name": "Science", "url": "https://catalog.example/science",
                 "programs": [{"id": 3010, "name": "Computer Science", "url": "https://catalog.example/cs"}]}
            ])
            .to_string());
        }
        Ok(CATALOG_PAGE.to_string())
    }
}

struct DownFetcher;

#[async_trait]
impl PageFetcher for DownFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Err(CatalogError::Fetch(format!("{url} responded with 503 Service Unavailable")))
    }
}

fn app(fetcher: Arc<dyn PageFetcher>) -> axum::Router {
    let mut config = Config::default();
    config.directory.url = "https://catalog.example/faculty-data.json".to_string();
    let service = CatalogService::new(fetcher, &config);
    create_server(AppState::new(Arc::new(service), None))
}

fn fixture_fetcher() -> Arc<FixtureFetcher> {
    Arc::new(FixtureFetcher {
        calls: AtomicUsize::new(0),
    })
}

async fn post(app: axum::Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: axum::Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = get(app(fixture_fetcher()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_or_invalid_url_is_a_bad_request() {
    let fetcher = fixture_fetcher();

    for (path, body) in [
        ("/api/courses", "{}"),
        ("/api/courses", r#"{"url": 42}"#),
        ("/api/courses/grouped", r#"{"url": ""}"#),
        ("/api/debug", "not json"),
    ] {
        let (status, response) = post(app(fetcher.clone()), path, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {body}");
        assert_eq!(response["error"], "Valid URL is required");
        assert!(response["details"].as_str().unwrap().contains("URL"));
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn courses_returns_flat_list() {
    let (status, body) = post(
        app(fixture_fetcher()),
        "/api/courses",
        r#"{"url": "https://catalog.example/cs"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let courses = body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 5);
    assert_eq!(courses[1]["id"], "67102");
    assert_eq!(courses[1]["untilYear"], "2027");
}

#[tokio::test]
async fn grouped_courses_are_keyed_by_year_and_category() {
    let (status, body) = post(
        app(fixture_fetcher()),
        "/api/courses/grouped",
        r#"{"url": "https://catalog.example/cs"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let years = body["courses"]["years"].as_array().unwrap();
    assert_eq!(years.len(), 3);
    assert_eq!(years[0]["mandatory"].as_array().unwrap().len(), 2);
    assert_eq!(years[1]["requiredElective"][0]["id"], "67201");
}

#[tokio::test]
async fn debug_returns_html_sample() {
    let (status, body) = post(
        app(fixture_fetcher()),
        "/api/debug",
        r#"{"url": "https://catalog.example/cs"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sample = body["htmlSample"].as_str().unwrap();
    assert!(sample.starts_with("<!DOCTYPE html>"));
    assert!(sample.ends_with("..."));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn faculties_come_from_the_directory() {
    let (status, body) = get(app(fixture_fetcher()), "/api/faculties").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["facultiesData"][0]["name"], "Science");
    assert_eq!(body["facultiesData"][0]["programs"][0]["id"], "3010");
}

#[tokio::test]
async fn fetch_failures_are_server_errors() {
    let (status, body) = post(
        app(Arc::new(DownFetcher)),
        "/api/courses",
        r#"{"url": "https://catalog.example/cs"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to scrape the website");
    assert!(body["details"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn each_route_reports_its_own_failure_summary() {
    let url_body = r#"{"url": "https://catalog.example/cs"}"#;

    let (status, body) = post(app(Arc::new(DownFetcher)), "/api/courses/grouped", url_body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to scrape the website");

    let (status, body) = post(app(Arc::new(DownFetcher)), "/api/debug", url_body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch website HTML");

    let (status, body) = get(app(Arc::new(DownFetcher)), "/api/faculties").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch faculties data");
    assert!(body["details"].as_str().unwrap().contains("faculty-data.json"));
}

#[tokio::test]
async fn metrics_without_recorder_is_unavailable() {
    let (status, _) = get(app(fixture_fetcher()), "/metrics").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
