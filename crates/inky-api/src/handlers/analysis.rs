//! Video analysis handlers.
//!
//! `GET /api/analyze?url=...` and `POST /api/analyze {"url": ...}` run the
//! same pipeline and return the same body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use inky_models::AnalysisResult;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::security::validate_url_input;
use crate::state::AppState;

/// Query parameters for `GET /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub url: Option<String>,
}

/// Body for `POST /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Analyze a video given as a query parameter.
pub async fn analyze_get(
    State(state): State<AppState>,
    params: Result<Query<AnalyzeParams>, QueryRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    run_analysis(&state, params.url.as_deref()).await
}

/// Analyze a video given in a JSON body.
pub async fn analyze_post(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected analyze body");
        ApiError::bad_request(format!("Invalid request body: {}", e.body_text()))
    })?;
    run_analysis(&state, request.url.as_deref()).await
}

async fn run_analysis(state: &AppState, url: Option<&str>) -> ApiResult<Json<AnalysisResult>> {
    let url = validate_url_input(url)?;
    let result = state.analyzer.analyze(url).await?;
    Ok(Json(result))
}
