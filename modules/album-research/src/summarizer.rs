//! Turns a research context into a validated summary via a text generator.

use std::sync::Arc;

use ai_client::{parse_json_object, GenerationRequest, TextGenerator};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::ResearchError;
use crate::extract::truncate_chars;
use crate::prompt::{research_system_prompt, research_user_message, RESEARCH_PROMPT_VERSION};
use crate::types::{Confidence, ResearchContext, ResearchSummary};

pub const RESEARCH_TEMPERATURE: f32 = 0.3;
pub const RESEARCH_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Per-field cap on model output.
pub const MAX_FIELD_CHARS: usize = 2000;

pub struct ResearchSummarizer {
    generator: Arc<dyn TextGenerator>,
    language: String,
}

impl ResearchSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, language: impl Into<String>) -> Self {
        Self {
            generator,
            language: language.into(),
        }
    }

    pub async fn summarize(&self, context: &ResearchContext) -> Result<ResearchSummary, ResearchError> {
        let request = GenerationRequest::new(
            research_system_prompt(&self.language),
            research_user_message(context),
        )
        .temperature(RESEARCH_TEMPERATURE)
        .max_output_tokens(RESEARCH_MAX_OUTPUT_TOKENS);

        let response = self.generator.generate(&request).await?;
        let summary = parse_research_response(&response)?;

        info!(
            model = self.generator.model(),
            prompt_version = RESEARCH_PROMPT_VERSION,
            confidence = summary.confidence.as_str(),
            "Research summary generated"
        );
        Ok(summary)
    }
}

/// Recover the JSON object, sanitize every field, and reject summaries
/// without genre, artist bio, or album summary.
pub fn parse_research_response(response: &str) -> Result<ResearchSummary, ResearchError> {
    let Some(object) = parse_json_object(response) else {
        warn!(
            preview = truncate_chars(response, 200),
            "Model response is not a JSON object"
        );
        return Err(ResearchError::Parse(format!(
            "no JSON object found in {} chars of model output",
            response.chars().count()
        )));
    };

    let summary = ResearchSummary {
        genre: text_field(&object, "genre"),
        artist_bio: text_field(&object, "artistBio"),
        album_summary: text_field(&object, "albumSummary"),
        user_opinions: text_field(&object, "userOpinions"),
        key_themes: text_field(&object, "keyThemes"),
        confidence: Confidence::from_wire(object.get("confidence").and_then(Value::as_str)),
    };

    if !summary.has_core_content() {
        return Err(ResearchError::EmptyResult);
    }
    Ok(summary)
}

/// Trimmed, capped string value. Non-strings and blanks are `None`.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    let text = object.get(key)?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(truncate_chars(text, MAX_FIELD_CHARS).to_string())
}
