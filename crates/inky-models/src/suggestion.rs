//! Clip suggestions and the free-text parser for model output.
//!
//! The model is asked for blank-line separated blocks of three lines:
//!
//! ```text
//! 1. Cat Jumps
//! 1:05 - 1:20
//! Sudden jump scares the cat
//! ```
//!
//! Output format is not guaranteed, so each block is parsed independently
//! and a malformed block is skipped without affecting the others.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timestamp::{minutes_seconds_to_total, TimestampError};

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid separator pattern"));

/// `MM:SS - MM:SS` not embedded in a longer `H:MM:SS` timestamp.
static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d:])(\d+):(\d+)\s*-\s*(\d+):(\d+)(?:[^\d:]|$)")
        .expect("valid time range pattern")
});

/// Leading markdown label on the rationale line, e.g. `**Why:**` or `**Why**:`.
static RATIONALE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*[^*]{1,40}(?::\*\*|\*\*:)\s*").expect("valid label pattern")
});

static TITLE_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*[.):]\s*").expect("valid numbering pattern"));

/// A model-proposed clip within the source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipSuggestion {
    /// Catchy clip title
    pub title: String,

    /// Clip start (seconds from video start)
    pub start_seconds: u32,

    /// Clip end (seconds from video start), always after `start_seconds`
    pub end_seconds: u32,

    /// Why this moment could perform well
    pub rationale: String,

    /// Optional externally supplied score. Nothing computes this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viral_potential: Option<f64>,
}

impl ClipSuggestion {
    /// Clip length in seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.end_seconds.saturating_sub(self.start_seconds)
    }
}

/// Why a block of model output was not turned into a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("expected title, time range and rationale lines, found {0} line(s)")]
    MissingLines(usize),

    #[error("title line is empty")]
    EmptyTitle,

    #[error("no MM:SS - MM:SS time range on line 2")]
    MissingTimeRange,

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] TimestampError),

    #[error("end {end}s is not after start {start}s")]
    EmptyRange { start: u32, end: u32 },

    #[error("rationale line is empty")]
    EmptyRationale,
}

/// Result of parsing one block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome {
    Parsed(ClipSuggestion),
    Skipped {
        /// Zero-based position among non-empty blocks
        index: usize,
        reason: SkipReason,
    },
}

impl BlockOutcome {
    pub fn into_suggestion(self) -> Option<ClipSuggestion> {
        match self {
            BlockOutcome::Parsed(s) => Some(s),
            BlockOutcome::Skipped { .. } => None,
        }
    }
}

/// Parse model output into per-block outcomes, in input order.
pub fn parse_blocks(text: &str) -> Vec<BlockOutcome> {
    let normalized = text.replace("\r\n", "\n");

    BLOCK_SEPARATOR
        .split(&normalized)
        .filter(|block| !block.trim().is_empty())
        .enumerate()
        .map(|(index, block)| match parse_block(block) {
            Ok(suggestion) => BlockOutcome::Parsed(suggestion),
            Err(reason) => BlockOutcome::Skipped { index, reason },
        })
        .collect()
}

/// Parse model output into suggestions, dropping malformed blocks.
///
/// # Examples
/// ```
/// use inky_models::parse_suggestions;
///
/// let text = "1. Cat Jumps\n1:05 - 1:20\nSudden jump scares the cat\n\nnot a clip";
/// let suggestions = parse_suggestions(text);
/// assert_eq!(suggestions.len(), 1);
/// assert_eq!(suggestions[0].start_seconds, 65);
/// ```
pub fn parse_suggestions(text: &str) -> Vec<ClipSuggestion> {
    parse_blocks(text)
        .into_iter()
        .filter_map(BlockOutcome::into_suggestion)
        .collect()
}

fn parse_block(block: &str) -> Result<ClipSuggestion, SkipReason> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let [title_line, range_line, rationale_line, ..] = lines.as_slice() else {
        return Err(SkipReason::MissingLines(lines.len()));
    };

    let title = clean_title(title_line);
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }

    let (start_seconds, end_seconds) = parse_time_range(range_line)?;

    let rationale = clean_rationale(rationale_line);
    if rationale.is_empty() {
        return Err(SkipReason::EmptyRationale);
    }

    Ok(ClipSuggestion {
        title: title.to_string(),
        start_seconds,
        end_seconds,
        rationale: rationale.to_string(),
        viral_potential: None,
    })
}

/// Strip a leading bold label and stray emphasis from a rationale.
fn clean_rationale(line: &str) -> &str {
    let line = match RATIONALE_LABEL.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    line.trim_matches('*').trim()
}

/// Strip list numbering (`1.`, `2)`, `3:`) and markdown emphasis from a title.
fn clean_title(line: &str) -> &str {
    let line = line.trim_start_matches('#').trim_matches('*').trim();
    let line = match TITLE_NUMBERING.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    line.trim_matches(|c: char| c == '*' || c == '"').trim()
}

/// Parse `MM:SS - MM:SS` anywhere in the line into `(start, end)` seconds.
pub fn parse_time_range(line: &str) -> Result<(u32, u32), SkipReason> {
    let caps = TIME_RANGE
        .captures(line)
        .ok_or(SkipReason::MissingTimeRange)?;

    let component = |idx: usize| -> Result<u32, SkipReason> {
        let raw = &caps[idx];
        raw.parse::<u32>()
            .map_err(|_| TimestampError::InvalidValue("time", raw.to_string()).into())
    };

    let start = minutes_seconds_to_total(component(1)?, component(2)?)?;
    let end = minutes_seconds_to_total(component(3)?, component(4)?)?;

    if end <= start {
        return Err(SkipReason::EmptyRange { start, end });
    }
    Ok((start, end))
}
