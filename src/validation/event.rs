//! Chat event validator

use serde_json::{Map, Value};

use crate::error::Rejection;
use crate::types::{ChatEvent, EventKind};

/// Default cap for `nickname` / `color`
pub const DEFAULT_MAX_FIELD_BYTES: usize = 128;

/// Field names accepted for the event kind, in lookup order
const KIND_FIELDS: &[&str] = &["type", "kind"];

/// Validates raw JSON into a [`ChatEvent`]
#[derive(Debug, Clone, Copy)]
pub struct EventValidator {
    max_field_bytes: usize,
}

impl EventValidator {
    pub fn new(max_field_bytes: usize) -> Self {
        Self { max_field_bytes }
    }

    /// Check `raw` against the accepted event shape.
    ///
    /// Rules are applied in order and the first failure wins:
    /// 1. `raw` is an object
    /// 2. its kind is `"text"` or `"image"`
    /// 3. `content` is a string
    ///
    /// `nickname` and `color` are kept when they are strings (truncated to the
    /// field cap) and dropped otherwise.
    pub fn validate(&self, raw: &Value) -> Result<ChatEvent, Rejection> {
        let obj = raw.as_object().ok_or(Rejection::Malformed)?;

        let kind = kind_field(obj)
            .and_then(Value::as_str)
            .and_then(EventKind::from_wire)
            .ok_or(Rejection::Malformed)?;

        let content = obj
            .get("content")
            .and_then(Value::as_str)
            .ok_or(Rejection::Malformed)?;

        Ok(ChatEvent {
            kind,
            content: content.to_string(),
            nickname: self.decoration(obj, "nickname"),
            color: self.decoration(obj, "color"),
        })
    }

    fn decoration(&self, obj: &Map<String, Value>, field: &str) -> Option<String> {
        obj.get(field)
            .and_then(Value::as_str)
            .map(|s| truncate_on_char_boundary(s, self.max_field_bytes).to_string())
    }
}

impl Default for EventValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FIELD_BYTES)
    }
}

fn kind_field(obj: &Map<String, Value>) -> Option<&Value> {
    KIND_FIELDS.iter().find_map(|name| obj.get(*name))
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
