//! The slide outline returned to callers, and the parse-or-default rules that
//! turn loosely-shaped model output into it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title used when the model returns none (or an empty one).
pub const DEFAULT_TITLE: &str = "Untitled";

/// Bullets beyond this count are dropped.
pub const MAX_BULLETS: usize = 8;

/// Title length the model is asked to respect. Not enforced locally.
pub const TITLE_MAX_CHARS: usize = 80;

/// A normalized slide outline: `{ title, bullets, notes }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub title: String,
    pub bullets: Vec<String>,
    pub notes: String,
}

impl Default for SlideSpec {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            bullets: Vec::new(),
            notes: String::new(),
        }
    }
}

impl SlideSpec {
    /// Build a slide from the model's content string.
    ///
    /// Content that is not valid JSON, or that decodes to anything other
    /// than an object, yields [`SlideSpec::default`].
    pub fn from_content(content: &str) -> Self {
        Self::from_fields(&decode_object(content))
    }

    /// Build a slide from already-decoded fields, applying the defaulting
    /// and truncation rules field by field.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let title = fields
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        // Only a real array counts; a string or object here is ignored, not coerced.
        let bullets = match fields.get("bullets") {
            Some(Value::Array(items)) => items
                .iter()
                .take(MAX_BULLETS)
                .filter_map(bullet_text)
                .collect(),
            _ => Vec::new(),
        };

        let notes = fields
            .get("notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            title,
            bullets,
            notes,
        }
    }
}

/// Decode `text` as a JSON object, falling back to an empty map.
///
/// Never fails: malformed JSON, `null`, arrays and scalars all produce `{}`.
pub fn decode_object(text: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "decoded JSON is not an object");
            Map::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "failed to decode JSON, using empty object");
            Map::new()
        }
    }
}

// Scalars are rendered as text; nulls and nested structures are dropped.
fn bullet_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
