//! Lenient JSON extraction from generator responses.
//!
//! Grounded-search backends return prose around the JSON payload, with
//! or without code fences; this parser accepts all of those shapes.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::GenerationError;

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fence pattern is valid")
    })
}

/// Extract and parse the JSON document carried in a generation response.
///
/// Tries, in order: a fenced ```json/``` block, the whole text, then
/// the outermost `{...}` span.
pub fn parse_candidate_response(text: &str) -> Result<Value, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "empty generation response".into(),
        ));
    }

    if let Some(block) = fence_re()
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
    {
        if let Ok(value) = serde_json::from_str(block) {
            return Ok(value);
        }
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }
    if let Some(span) = outer_object_span(trimmed) {
        return serde_json::from_str(span)
            .map_err(|e| GenerationError::JsonParsing(e.to_string()));
    }

    Err(GenerationError::MalformedResponse(
        "no JSON document in generation response".into(),
    ))
}

/// The span from the first `{` to the last `}`.
fn outer_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
