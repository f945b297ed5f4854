//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Routes with a fixed path, recorded verbatim.
const KNOWN_PATHS: &[&str] = &[
    "/api/analyze",
    "/api/download-clip",
    "/health",
    "/metrics",
    "/",
];

static ASSET_PATH: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"\.[A-Za-z0-9]{1,8}$").expect("valid asset pattern")
});

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "inky_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "inky_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "inky_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "inky_analyses_total";
    pub const SUGGESTIONS_SKIPPED_TOTAL: &str = "inky_suggestions_skipped_total";
    pub const CLIP_REQUESTS_TOTAL: &str = "inky_clip_requests_total";

    // Upstream metrics
    pub const UPSTREAM_DURATION_SECONDS: &str = "inky_upstream_duration_seconds";
    pub const UPSTREAM_FAILURES_TOTAL: &str = "inky_upstream_failures_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished analysis. `outcome` is `success` or an error kind.
pub fn record_analysis(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
}

/// Record model output blocks that could not be parsed.
pub fn record_suggestions_skipped(count: u64) {
    counter!(names::SUGGESTIONS_SKIPPED_TOTAL).increment(count);
}

/// Record a download-clip request.
pub fn record_clip_request(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::CLIP_REQUESTS_TOTAL, &labels).increment(1);
}

/// Record one outbound call to `service` (youtube, bilibili, gemini).
pub fn record_upstream_call(service: &str, success: bool, duration_secs: f64) {
    let labels = [("service", service.to_string())];
    histogram!(names::UPSTREAM_DURATION_SECONDS, &labels).record(duration_secs);
    if !success {
        counter!(names::UPSTREAM_FAILURES_TOTAL, &labels).increment(1);
    }
}

/// Sanitize path for metrics labels.
///
/// Anything outside the fixed routes is served from the static directory, so
/// those paths collapse into two buckets to keep label cardinality bounded.
fn sanitize_path(path: &str) -> String {
    if KNOWN_PATHS.contains(&path) {
        return path.to_string();
    }
    if path.starts_with("/api/") {
        return "/api/:unknown".to_string();
    }
    if ASSET_PATH.is_match(path) {
        "/:asset".to_string()
    } else {
        "/:page".to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
