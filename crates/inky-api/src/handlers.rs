//! Request handlers.

pub mod analysis;
pub mod clips;
pub mod health;

pub use analysis::*;
pub use clips::*;
pub use health::*;

use crate::error::ApiError;

/// Fallback for unknown `/api/*` paths.
pub async fn api_not_found() -> ApiError {
    ApiError::not_found("Not found")
}
