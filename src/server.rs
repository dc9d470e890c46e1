use crate::app::CatalogService;
use crate::common::error::CatalogError;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hyper::Server;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CatalogService>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: Arc<CatalogService>, metrics: Option<PrometheusHandle>) -> Self {
        Self { service, metrics }
    }
}

const INVALID_URL: &str = "Valid URL is required";
const SCRAPE_FAILED: &str = "Failed to scrape the website";
const HTML_FETCH_FAILED: &str = "Failed to fetch website HTML";
const FACULTIES_FAILED: &str = "Failed to fetch faculties data";

/// JSON error body `{error, details}`. Validation failures are 400 with a
/// fixed summary; anything else is 500 with the route's own summary.
pub struct ApiError {
    error: CatalogError,
    summary: &'static str,
}

impl ApiError {
    fn new(error: CatalogError, summary: &'static str) -> Self {
        Self { error, summary }
    }

    /// Error mapper carrying the summary used for non-validation failures.
    fn with_summary(summary: &'static str) -> impl Fn(CatalogError) -> ApiError {
        move |error| ApiError::new(error, summary)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, summary) = if self.error.is_validation() {
            warn!("Rejected request: {}", self.error);
            (StatusCode::BAD_REQUEST, INVALID_URL)
        } else {
            error!("{}: {}", self.summary, self.error);
            (StatusCode::INTERNAL_SERVER_ERROR, self.summary)
        };
        let body = json!({ "error": summary, "details": self.error.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Pull `url` out of a `{ "url": "..." }` body. Missing bodies and non-string
/// values are validation errors.
fn request_url(body: Option<Json<Value>>) -> Result<String, CatalogError> {
    body.and_then(|Json(value)| value.get("url").and_then(Value::as_str).map(str::to_string))
        .ok_or_else(|| CatalogError::Validation(INVALID_URL.to_string()))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "catalog-scraper",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn courses(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let failed = ApiError::with_summary(SCRAPE_FAILED);
    let url = request_url(body).map_err(&failed)?;
    let courses = state.service.scrape_courses(&url).await.map_err(&failed)?;
    Ok(Json(json!({ "courses": courses })))
}

async fn grouped_courses(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let failed = ApiError::with_summary(SCRAPE_FAILED);
    let url = request_url(body).map_err(&failed)?;
    let grouped = state.service.scrape_grouped_courses(&url).await.map_err(&failed)?;
    Ok(Json(json!({ "courses": grouped })))
}

async fn debug_html(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let failed = ApiError::with_summary(HTML_FETCH_FAILED);
    let url = request_url(body).map_err(&failed)?;
    let sample = state.service.inspect_html(&url).await.map_err(&failed)?;
    let body = serde_json::to_value(sample).map_err(|e| failed(e.into()))?;
    Ok(Json(body))
}

async fn faculties(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let faculties = state
        .service
        .list_faculties()
        .await
        .map_err(ApiError::with_summary(FACULTIES_FAILED))?;
    Ok(Json(json!({ "facultiesData": faculties })))
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

/// Router with every catalog route and a permissive CORS layer.
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/courses", post(courses))
        .route("/api/courses/grouped", post(grouped_courses))
        .route("/api/debug", post(debug_html))
        .route("/api/faculties", get(faculties))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(cors))
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), hyper::Error> {
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{}", port);
    info!("Health check: http://localhost:{}/health", port);

    Server::bind(&addr).serve(app.into_make_service()).await
}
