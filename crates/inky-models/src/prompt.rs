//! Prompt construction for clip suggestion requests.

use crate::video::VideoMetadata;

/// Fewest clips the model is asked for.
pub const MIN_SUGGESTIONS: usize = 3;

/// Most clips the model is asked for.
pub const MAX_SUGGESTIONS: usize = 5;

/// Descriptions longer than this are cut before interpolation.
pub const MAX_PROMPT_DESCRIPTION_CHARS: usize = 2000;

/// Build the clip suggestion prompt for a video.
///
/// Interpolates title, description (when present), duration and channel.
/// The output format section must stay in sync with
/// [`parse_suggestions`](crate::suggestion::parse_suggestions).
pub fn build_prompt(metadata: &VideoMetadata) -> String {
    let mut prompt = format!(
        "Analyze the following video and suggest {min}-{max} short clips that could go viral as short-form videos.\n\n\
         Title: {title}\n",
        min = MIN_SUGGESTIONS,
        max = MAX_SUGGESTIONS,
        title = metadata.title.trim(),
    );

    if let Some(description) = metadata
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        prompt.push_str("Description: ");
        prompt.push_str(truncate_chars(description, MAX_PROMPT_DESCRIPTION_CHARS));
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "Duration: {}\nChannel: {}\n",
        metadata.duration.trim(),
        metadata.channel_title.trim()
    ));

    prompt.push_str(
        r#"
For each suggested clip, provide exactly three lines:
1. A numbered catchy title, for example "1. The Big Reveal"
2. The start and end timestamps in MM:SS - MM:SS form, for example "01:05 - 01:20"
3. A one-line explanation of why it could go viral

Separate clips with one blank line. Do not add any other text, headings or formatting."#,
    );

    prompt
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(description: Option<&str>) -> VideoMetadata {
        VideoMetadata {
            title: "Funny Cat".to_string(),
            description: description.map(str::to_string),
            channel_title: "Cats".to_string(),
            duration: "PT5M0S".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
        }
    }

    #[test]
    fn test_prompt_interpolates_fields() {
        let prompt = build_prompt(&metadata(Some("A cat does things")));
        assert!(prompt.contains("Title: Funny Cat"));
        assert!(prompt.contains("Description: A cat does things"));
        assert!(prompt.contains("Duration: PT5M0S"));
        assert!(prompt.contains("Channel: Cats"));
        assert!(prompt.contains("3-5"));
        assert!(prompt.contains("MM:SS - MM:SS"));
    }

    #[test]
    fn test_prompt_omits_missing_description() {
        assert!(!build_prompt(&metadata(None)).contains("Description:"));
        assert!(!build_prompt(&metadata(Some("   "))).contains("Description:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let meta = metadata(Some("desc"));
        assert_eq!(build_prompt(&meta), build_prompt(&meta));
    }

    #[test]
    fn test_long_description_truncated_on_char_boundary() {
        let long = "é".repeat(MAX_PROMPT_DESCRIPTION_CHARS + 50);
        let prompt = build_prompt(&metadata(Some(&long)));
        let line = prompt
            .lines()
            .find(|l| l.starts_with("Description: "))
            .unwrap();
        assert_eq!(
            line.trim_start_matches("Description: ").chars().count(),
            MAX_PROMPT_DESCRIPTION_CHARS
        );
    }
}
