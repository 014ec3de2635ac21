use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid regex"));

static BRACE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Recover a JSON object from free-form model output.
///
/// Tried in order, first success wins:
/// 1. the whole (trimmed) response,
/// 2. the interior of the first fenced code block,
/// 3. the greedy span from the first `{` to the last `}`.
///
/// Each candidate must parse to a JSON object; scalars and arrays are skipped.
pub fn parse_json_object(response: &str) -> Option<Map<String, Value>> {
    if let Some(object) = as_object(response.trim()) {
        return Some(object);
    }

    if let Some(object) = FENCED_BLOCK
        .captures(response)
        .and_then(|caps| caps.get(1))
        .and_then(|m| as_object(m.as_str().trim()))
    {
        return Some(object);
    }

    BRACE_SPAN
        .find(response)
        .and_then(|m| as_object(m.as_str()))
}

fn as_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
