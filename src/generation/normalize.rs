//! Recovery of a section list from raw model text.
//!
//! Models wrap JSON in markdown fences or surround it with commentary, and
//! do so inconsistently from one call to the next. [`normalize`] runs a
//! chain of text stages, each of which either rewrites the text or passes it
//! through untouched, then parses and coerces the result:
//!
//! 1. [`strip_json_fences`]
//! 2. [`strip_generic_fences`]
//! 3. [`extract_array`]
//! 4. strict JSON parse, non-empty array check, per-element coercion

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::Section;

/// Description used when an element has none.
pub const DEFAULT_DESCRIPTION: &str = "AI Generated section";

/// Content used when an element has none.
pub const DEFAULT_CONTENT: &str = r#"<div class="p-8 text-center">AI Generated Content</div>"#;

/// Why raw model text could not be turned into sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The cleaned text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(String),
    /// The cleaned text is JSON but not an array.
    #[error("expected a JSON array")]
    NotArray,
    /// The array has no elements.
    #[error("JSON array is empty")]
    EmptyArray,
}

fn json_fence_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n?```(?:json)?[ \t]*\r?\n?").ok())
        .as_ref()
}

fn generic_fence_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n?```[\w-]*[ \t]*\r?\n?").ok())
        .as_ref()
}

/// Remove ```` ```json ```` fences and their closers.
///
/// Passes the (trimmed) text through when no `json`-tagged fence is present.
pub fn strip_json_fences(text: &str) -> String {
    if !text.contains("```json") {
        return text.trim().to_owned();
    }
    match json_fence_regex() {
        Some(re) => re.replace_all(text, "").trim().to_owned(),
        None => text.trim().to_owned(),
    }
}

/// Remove any fence markers, tagged or not, when the text opens with one.
pub fn strip_generic_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_owned();
    }
    match generic_fence_regex() {
        Some(re) => re.replace_all(trimmed, "").trim().to_owned(),
        None => trimmed.to_owned(),
    }
}

/// Slice from the first `[` through the last `]`, inclusive.
///
/// Returns the input unchanged when there is no such pair.
pub fn extract_array(text: &str) -> &str {
    let Some(start) = text.find('[') else {
        return text;
    };
    match text.rfind(']') {
        Some(end) if end > start => text.get(start..=end).unwrap_or(text),
        _ => text,
    }
}

/// Turn raw model text into sections.
///
/// # Errors
///
/// Returns [`NormalizeError`] when the cleaned text does not parse, is not an
/// array, or is an empty array. Never panics on any input.
pub fn normalize(raw: &str) -> Result<Vec<Section>, NormalizeError> {
    let cleaned = strip_generic_fences(&strip_json_fences(raw));
    let candidate = extract_array(&cleaned);

    let parsed: Value =
        serde_json::from_str(candidate).map_err(|e| NormalizeError::Parse(e.to_string()))?;

    let Value::Array(elements) = parsed else {
        return Err(NormalizeError::NotArray);
    };
    if elements.is_empty() {
        return Err(NormalizeError::EmptyArray);
    }

    Ok(elements
        .iter()
        .enumerate()
        .map(|(index, element)| coerce_section(element, position(index)))
        .collect())
}

/// 1-based position of an array index.
fn position(index: usize) -> u32 {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(1))
        .unwrap_or(u32::MAX)
}

/// Map one array element to a section, defaulting anything missing or falsy.
///
/// Non-object elements have no fields and come out fully defaulted.
fn coerce_section(element: &Value, position: u32) -> Section {
    let field = |key: &str| element.get(key).filter(|v| !is_falsy(v));

    Section {
        name: field("name")
            .map(stringify)
            .unwrap_or_else(|| format!("Section {position}")),
        description: field("description")
            .map(stringify)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
        content: field("content")
            .map(stringify)
            .unwrap_or_else(|| DEFAULT_CONTENT.to_owned()),
        order: field("order").and_then(coerce_order).unwrap_or(position),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Numeric coercion for `order`: numbers, numeric strings and `true`.
///
/// Fractions truncate; anything below 1 or non-numeric yields `None`.
fn coerce_order(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };
    if !number.is_finite() || number < 1.0 {
        return None;
    }
    Some(
        format!("{}", number.trunc())
            .parse::<u32>()
            .unwrap_or(u32::MAX),
    )
}
