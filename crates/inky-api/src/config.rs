//! API configuration.
//!
//! Everything is read once at startup and passed into the collaborators that
//! need it. Credentials live here, not in process-wide state.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_BILIBILI_API_BASE_URL: &str = "https://api.bilibili.com";
const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-flash-lite"];
const DEFAULT_CLIP_BASE_URL: &str = "https://example.com/clips";

/// Configuration problems detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} has unsupported value '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// How `/api/download-clip` produces clip URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializerMode {
    /// Return a placeholder URL without doing any work
    Placeholder,
    /// Refuse every request
    Disabled,
}

impl MaterializerMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "placeholder" => Some(Self::Placeholder),
            "disabled" | "off" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Credentials and endpoints for outbound calls.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Gemini models, tried in order
    pub gemini_models: Vec<String>,
    pub youtube_base_url: String,
    pub bilibili_base_url: String,
    pub gemini_base_url: String,
    /// Timeout applied to every outbound request
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            gemini_api_key: None,
            gemini_models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
            youtube_base_url: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
            bilibili_base_url: DEFAULT_BILIBILI_API_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("UpstreamConfig")
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_models", &self.gemini_models)
            .field("youtube_base_url", &self.youtube_base_url)
            .field("bilibili_base_url", &self.bilibili_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Directory holding the front-end page and its assets
    pub static_dir: PathBuf,
    /// Expose `/metrics`
    pub metrics_enabled: bool,
    pub materializer: MaterializerMode,
    /// Base URL for placeholder clip links
    pub clip_base_url: String,
    pub upstream: UpstreamConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 64 * 1024, // 64KB
            environment: "development".to_string(),
            static_dir: PathBuf::from("public"),
            metrics_enabled: true,
            materializer: MaterializerMode::Placeholder,
            clip_base_url: DEFAULT_CLIP_BASE_URL.to_string(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let upstream_defaults = UpstreamConfig::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let materializer = match non_empty("CLIP_MATERIALIZER") {
            Some(value) => MaterializerMode::parse(&value).ok_or(ConfigError::InvalidValue {
                var: "CLIP_MATERIALIZER",
                value,
            })?,
            None => defaults.materializer,
        };

        let upstream = UpstreamConfig {
            youtube_api_key: non_empty("YOUTUBE_API_KEY"),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_models: non_empty("GEMINI_MODELS")
                .map(|s| {
                    s.split(',')
                        .map(|m| m.trim().to_string())
                        .filter(|m| !m.is_empty())
                        .collect()
                })
                .unwrap_or(upstream_defaults.gemini_models),
            youtube_base_url: non_empty("YOUTUBE_API_BASE_URL")
                .unwrap_or(upstream_defaults.youtube_base_url),
            bilibili_base_url: non_empty("BILIBILI_API_BASE_URL")
                .unwrap_or(upstream_defaults.bilibili_base_url),
            gemini_base_url: non_empty("GEMINI_API_BASE_URL")
                .unwrap_or(upstream_defaults.gemini_base_url),
            timeout: non_empty("UPSTREAM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(upstream_defaults.timeout),
        };

        Ok(Self {
            host: non_empty("API_HOST").unwrap_or(defaults.host),
            port: non_empty("API_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: non_empty("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: non_empty("MAX_BODY_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            metrics_enabled: non_empty("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            materializer,
            clip_base_url: non_empty("CLIP_BASE_URL").unwrap_or(defaults.clip_base_url),
            upstream,
        })
    }

    /// Check everything the upstream clients need before serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.youtube_api_key.is_none() {
            return Err(ConfigError::Missing("YOUTUBE_API_KEY"));
        }
        if self.upstream.gemini_api_key.is_none() {
            return Err(ConfigError::Missing("GEMINI_API_KEY"));
        }
        if self.upstream.gemini_models.is_empty() {
            return Err(ConfigError::Missing("GEMINI_MODELS"));
        }

        let urls = [
            ("YOUTUBE_API_BASE_URL", &self.upstream.youtube_base_url),
            ("BILIBILI_API_BASE_URL", &self.upstream.bilibili_base_url),
            ("GEMINI_API_BASE_URL", &self.upstream.gemini_base_url),
            ("CLIP_BASE_URL", &self.clip_base_url),
        ];
        for (var, value) in urls {
            if Url::parse(value).is_err() {
                return Err(ConfigError::InvalidUrl {
                    var,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.materializer, MaterializerMode::Placeholder);
        assert_eq!(config.upstream.timeout, Duration::from_secs(30));
        assert_eq!(config.upstream.gemini_models.len(), 2);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = config_from(&[("GEMINI_API_KEY", "g")]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("YOUTUBE_API_KEY"))));

        let config = config_from(&[("YOUTUBE_API_KEY", "y"), ("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("GEMINI_API_KEY"))));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("YOUTUBE_API_KEY", "y"),
            ("GEMINI_API_KEY", "g"),
            ("API_PORT", "9000"),
            ("GEMINI_MODELS", "gemini-pro, ,gemini-2.5-pro"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("CLIP_MATERIALIZER", "disabled"),
            ("ENVIRONMENT", "Production"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.upstream.gemini_models, vec!["gemini-pro", "gemini-2.5-pro"]);
        assert_eq!(config.upstream.timeout, Duration::from_secs(5));
        assert_eq!(config.materializer, MaterializerMode::Disabled);
        assert!(config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("CLIP_MATERIALIZER", "ffmpeg")]),
            Err(ConfigError::InvalidValue { var: "CLIP_MATERIALIZER", .. })
        ));

        let config = config_from(&[
            ("YOUTUBE_API_KEY", "y"),
            ("GEMINI_API_KEY", "g"),
            ("GEMINI_API_BASE_URL", "not a url"),
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { var: "GEMINI_API_BASE_URL", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = config_from(&[("YOUTUBE_API_KEY", "secret-key")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
