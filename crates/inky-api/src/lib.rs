//! Axum HTTP API server for InkyClip.
//!
//! This crate provides:
//! - `/api/analyze`: metadata lookup plus model-generated clip suggestions
//! - `/api/download-clip`: clip URLs from a pluggable materializer
//! - YouTube, Bilibili and Gemini clients
//! - Security headers, request ids and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::{ApiConfig, ConfigError, MaterializerMode, UpstreamConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{ClipMaterializer, MetadataFetcher, SuggestionModel, VideoAnalyzer};
pub use state::AppState;
