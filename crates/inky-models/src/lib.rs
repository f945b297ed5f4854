//! Shared data models for the InkyClip backend.
//!
//! This crate provides:
//! - Video references and platform metadata
//! - Identifier extraction from YouTube and Bilibili URLs
//! - Prompt construction and the free-text clip suggestion parser
//! - `MM:SS` and ISO-8601 duration helpers

pub mod analysis;
pub mod prompt;
pub mod suggestion;
pub mod timestamp;
pub mod utils;
pub mod video;

// Re-export common types
pub use analysis::AnalysisResult;
pub use prompt::{build_prompt, MAX_SUGGESTIONS, MIN_SUGGESTIONS};
pub use suggestion::{parse_blocks, parse_suggestions, BlockOutcome, ClipSuggestion, SkipReason};
pub use timestamp::{seconds_to_timestamp, timestamp_to_seconds, TimestampError};
pub use utils::{extract_video_reference, extract_youtube_id};
pub use video::{Platform, VideoMetadata, VideoReference};
