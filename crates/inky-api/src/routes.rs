//! API routes.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers::{analyze_get, analyze_post, api_not_found, download_clip, health};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, mask_internal_errors, request_id, request_logging, security_headers,
};
use crate::state::AppState;

/// Create the API router.
///
/// `/api/*`, `/health` and `/metrics` are handled here; every other path is
/// served from the static directory, falling back to its `index.html`.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/analyze", get(analyze_get).post(analyze_post))
        .route("/download-clip", get(download_clip))
        .fallback(api_not_found);

    let health_routes = Router::new().route("/health", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let static_dir = &state.config.static_dir;
    let static_files =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .fallback_service(static_files)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn_with_state(
            state.config.is_production(),
            mask_internal_errors,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
