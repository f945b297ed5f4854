//! Video identifier extraction from user-supplied URLs.
//!
//! Input is untrusted free text: a bare URL, or a URL with surrounding words.
//! Platforms are tried in a fixed order (YouTube, then Bilibili).

use std::sync::LazyLock;

use regex::Regex;

use crate::video::{Platform, VideoReference};

/// Length of a YouTube video ID.
pub const YOUTUBE_ID_LEN: usize = 11;

/// YouTube watch/embed/short-link shapes. Group 1 is the video ID, which must
/// be followed by end of input, `&`, `?`, `/` or whitespace.
static YOUTUBE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?i:youtube\.com)/(?:(?:v|e(?:mbed)?|shorts|live)/|\S*?[?&]v=|[^/\s]+/\S+/)|(?i:youtu\.be)/)([A-Za-z0-9_-]{11})(?:[&?/\s]|$)",
    )
    .expect("valid youtube pattern")
});

/// Bilibili video page. Group 1 is the full `BV...` token.
static BILIBILI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:bilibili\.com)/video/(BV[A-Za-z0-9]+)").expect("valid bilibili pattern")
});

/// Extract a platform video reference from a URL.
///
/// Returns `None` when nothing matches. That is the common outcome for
/// malformed or unsupported URLs, not an error.
///
/// # Examples
/// ```
/// use inky_models::{extract_video_reference, Platform};
///
/// let video = extract_video_reference("https://youtu.be/dQw4w9WgXcQ").unwrap();
/// assert_eq!(video.platform(), Platform::YouTube);
/// assert_eq!(video.id(), "dQw4w9WgXcQ");
///
/// assert!(extract_video_reference("not a url").is_none());
/// ```
pub fn extract_video_reference(url: &str) -> Option<VideoReference> {
    if let Some(id) = capture_first(&YOUTUBE_PATTERN, url) {
        return Some(VideoReference::new_unchecked(Platform::YouTube, id));
    }

    if let Some(id) = capture_first(&BILIBILI_PATTERN, url) {
        return Some(VideoReference::new_unchecked(Platform::Bilibili, id));
    }

    None
}

/// Extract only a YouTube video ID.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    capture_first(&YOUTUBE_PATTERN, url).map(str::to_string)
}

fn capture_first<'a>(pattern: &Regex, haystack: &'a str) -> Option<&'a str> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Check YouTube ID shape: 11 chars, alphanumeric plus `-` and `_`.
pub fn is_valid_youtube_id(id: &str) -> bool {
    id.len() == YOUTUBE_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Check Bilibili ID shape: `BV` followed by at least one ASCII alphanumeric.
pub fn is_valid_bilibili_id(id: &str) -> bool {
    match id.strip_prefix("BV") {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}
