//! Title-generation prompt construction and response validation.
//!
//! The model is asked for a JSON object whose `titles` array aligns
//! positionally with the submitted video order; it is not asked to echo
//! video IDs. Position is therefore the correlation key, which is why
//! [`parse_titles`] rejects a reply whose length differs from the input
//! before any mapping happens.

use serde::Deserialize;

use tdoc_models::{ImprovedTitle, VideoSummary};

use crate::error::{StageError, StageResult};

/// The JSON shape the model is instructed to return.
#[derive(Debug, Deserialize)]
struct TitlesEnvelope {
    titles: Vec<GeneratedTitle>,
}

#[derive(Debug, Deserialize)]
struct GeneratedTitle {
    original: String,
    improved: String,
    rationale: String,
}

/// Build the single generation request for a batch of videos.
pub fn build_prompt(channel_name: &str, videos: &[VideoSummary]) -> String {
    let video_titles = videos
        .iter()
        .enumerate()
        .map(|(idx, video)| format!("{}. \"{}\"", idx + 1, video.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a YouTube title optimization expert. Below are {count} video titles from the channel "{channel_name}".

For each title, provide:
1. An improved version that is more engaging, SEO-friendly, and likely to get more clicks
2. A brief rationale (1-2 sentences) explaining why the new title is better

Guidelines:
- Keep the core topic and authenticity
- Use action verbs, numbers, and specific value propositions
- Make it curiosity-inducing without being clickbait
- Optimize for searchability and clarity

Video Titles:
{video_titles}

Respond with one title entry per input title, in the same order, in JSON format:
{{
    "titles": [
        {{
            "original": "...",
            "improved": "...",
            "rationale": "..."
        }}
    ]
}}"#,
        count = videos.len(),
    )
}

/// Validate the raw model text and map it onto the submitted videos.
///
/// Tolerates a reply wrapped in a Markdown code fence. Rejects a reply
/// whose entry count differs from the video count; order within an
/// equal-length reply is trusted.
pub fn parse_titles(raw: &str, videos: &[VideoSummary]) -> StageResult<Vec<ImprovedTitle>> {
    let text = strip_code_fence(raw);

    let envelope: TitlesEnvelope = serde_json::from_str(text)
        .map_err(|e| StageError::invalid_response(format!("titles JSON did not parse: {}", e)))?;

    if envelope.titles.len() != videos.len() {
        return Err(StageError::invalid_response(format!(
            "expected {} title entries, model returned {}",
            videos.len(),
            envelope.titles.len()
        )));
    }

    Ok(envelope
        .titles
        .into_iter()
        .zip(videos.iter())
        .map(|(title, video)| ImprovedTitle {
            video_id: video.video_id.clone(),
            original_title: title.original,
            improved_title: title.improved,
            rationale: title.rationale,
            url: video.url.clone(),
        })
        .collect())
}

/// Strip a surrounding Markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}
