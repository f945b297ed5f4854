//! Input validation for request parameters.

use crate::error::{ApiError, ApiResult};

/// Maximum accepted length of a submitted video URL.
pub const MAX_URL_LENGTH: usize = 2048;

/// Maximum accepted length of a time parameter (`start`, `end`).
pub const MAX_TIME_PARAM_LENGTH: usize = 16;

/// Validate the `url` input of an analyze request.
///
/// Returns the trimmed URL, or `BadRequest` when it is missing, blank,
/// too long or contains control characters.
pub fn validate_url_input(url: Option<&str>) -> ApiResult<&str> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("No video URL provided"))?;

    if url.len() > MAX_URL_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Video URL too long (max {} characters)",
            MAX_URL_LENGTH
        )));
    }

    if url.chars().any(char::is_control) {
        return Err(ApiError::bad_request("Invalid video URL"));
    }

    Ok(url)
}

/// Require a non-blank, reasonably short query parameter.
pub fn require_param<'a>(value: Option<&'a str>, name: &str, max_len: usize) -> ApiResult<&'a str> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing required parameter: {}", name)))?;

    if value.len() > max_len {
        return Err(ApiError::bad_request(format!("Parameter {} is too long", name)));
    }

    Ok(value)
}
