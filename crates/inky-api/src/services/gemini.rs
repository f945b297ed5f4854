//! Gemini client for clip suggestion text.
//!
//! Models are tried in the configured order; the first one that answers wins.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::UpstreamConfig;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::{endpoint, SuggestionModel};

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    models: Vec<String>,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    /// Create a new Gemini client. Requires `GEMINI_API_KEY` to be configured.
    pub fn new(config: &UpstreamConfig, client: Client) -> ApiResult<Self> {
        let api_key = config.gemini_api_key.clone().ok_or_else(|| {
            ApiError::internal("GEMINI_API_KEY not configured. Cannot generate suggestions.")
        })?;

        if config.gemini_models.is_empty() {
            return Err(ApiError::internal("No Gemini models configured"));
        }

        Ok(Self {
            api_key,
            base_url: config.gemini_base_url.clone(),
            models: config.gemini_models.clone(),
            client,
        })
    }

    /// Generate text, falling back through the configured models.
    pub async fn generate_text(&self, prompt: &str) -> ApiResult<String> {
        let mut last_error = None;

        for model in &self.models {
            info!("Attempting Gemini API with model: {}", model);
            let start = Instant::now();
            let result = self.call_gemini_api(model, prompt).await;
            metrics::record_upstream_call("gemini", result.is_ok(), start.elapsed().as_secs_f64());

            match result {
                Ok(text) => {
                    info!("Generated suggestions with {}", model);
                    return Ok(text);
                }
                Err(e) => {
                    warn!("Failed with model {}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::upstream("All Gemini models failed")))
    }

    async fn call_gemini_api(&self, model: &str, prompt: &str) -> ApiResult<String> {
        let url = endpoint(&self.base_url, &format!("models/{}:generateContent", model));

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::upstream(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ApiError::upstream(format!("Failed to parse Gemini response: {}", e)))?;

        gemini_response
            .into_text()
            .ok_or_else(|| ApiError::upstream("No content in Gemini response"))
    }
}

#[async_trait]
impl SuggestionModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> ApiResult<String> {
        self.generate_text(prompt).await
    }
}
