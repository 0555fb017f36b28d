//! Recovery of the `{tweet, explanation}` object from model output.
//!
//! Models wrap JSON in Markdown fences, prepend prose, or ignore the format
//! entirely. The pipeline is: strip fences, strict parse, then parse the span
//! from the first `{` to the last `}`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::types::GenerationResult;

const POST_KEY: &str = "tweet";
const RATIONALE_KEY: &str = "explanation";
const MISSING_RATIONALE: &str = "No explanation provided.";

// Greedy: a rationale containing `{` or `}` must not cut the object short.
static JSON_OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));

/// Removes a surrounding Markdown code fence (with optional info string).
/// Text without a leading fence is returned trimmed.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        // Single-line fence: ```json {...}```
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses `text` as a JSON object, falling back to the widest `{...}` span.
#[must_use]
pub fn recover_json_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Some(map);
    }

    let span = JSON_OBJECT_SPAN.find(text)?;
    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Turns one raw completion into a [`GenerationResult`].
///
/// A missing `explanation` gets a fixed placeholder; a missing `tweet` falls
/// back to the whole (fence-stripped) completion.
///
/// # Errors
///
/// - [`ProviderError::EmptyContent`] for a blank completion or a post text
///   that is only quotes and whitespace.
/// - [`ProviderError::NoJsonObject`] when no JSON object can be recovered.
pub fn extract_draft(raw: &str) -> Result<GenerationResult, ProviderError> {
    let content = strip_code_fence(raw);
    if content.is_empty() {
        return Err(ProviderError::EmptyContent);
    }

    let object = recover_json_object(content).ok_or(ProviderError::NoJsonObject)?;

    let post_text = strip_wrapping_quotes(string_field(&object, POST_KEY).unwrap_or(content));
    if post_text.is_empty() {
        return Err(ProviderError::EmptyContent);
    }
    let rationale = string_field(&object, RATIONALE_KEY).unwrap_or(MISSING_RATIONALE);

    Ok(GenerationResult {
        post_text: post_text.to_owned(),
        rationale: rationale.to_owned(),
    })
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn strip_wrapping_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or(text, str::trim)
}
