//! Video reference and metadata models.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::parse_iso8601_duration;
use crate::utils::{is_valid_bilibili_id, is_valid_youtube_id};

/// Video platform a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Bilibili,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Bilibili => "bilibili",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A platform plus its canonical video identifier.
///
/// The id always matches the platform's identifier shape: 11 characters of
/// `[A-Za-z0-9_-]` for YouTube, `BV` followed by ASCII alphanumerics for
/// Bilibili. Values are only built through validating constructors or the
/// URL extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub struct VideoReference {
    platform: Platform,
    id: String,
}

impl VideoReference {
    /// Create a reference, returning `None` if `id` doesn't fit the platform.
    pub fn new(platform: Platform, id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let valid = match platform {
            Platform::YouTube => is_valid_youtube_id(&id),
            Platform::Bilibili => is_valid_bilibili_id(&id),
        };
        valid.then_some(Self { platform, id })
    }

    /// Infer the platform from a bare identifier.
    ///
    /// `BV`-prefixed tokens are Bilibili; 11-character tokens are YouTube.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.starts_with("BV") {
            Self::new(Platform::Bilibili, id)
        } else {
            Self::new(Platform::YouTube, id)
        }
    }

    pub(crate) fn new_unchecked(platform: Platform, id: impl Into<String>) -> Self {
        Self {
            platform,
            id: id.into(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical watch page URL.
    pub fn watch_url(&self) -> String {
        match self.platform {
            Platform::YouTube => format!("https://www.youtube.com/watch?v={}", self.id),
            Platform::Bilibili => format!("https://www.bilibili.com/video/{}", self.id),
        }
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.id)
    }
}

/// Video metadata as reported by the platform API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Video title
    pub title: String,

    /// Video description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Uploader / channel name
    pub channel_title: String,

    /// ISO-8601 duration (e.g. `PT5M0S`)
    pub duration: String,

    /// Thumbnail image URL
    pub thumbnail_url: String,
}

impl VideoMetadata {
    /// Duration in whole seconds, if the duration string parses.
    pub fn duration_seconds(&self) -> Option<u32> {
        parse_iso8601_duration(&self.duration)
    }
}
