//! Views over decoded webhook payloads.
//!
//! The payload is kept as a [`serde_json::Value`] so it can be written back
//! exactly as received; these helpers only read the routing fields.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::constants::webhook::UNKNOWN;

/// A decoded webhook body. Always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    body: Map<String, Value>,
}

impl WebhookEvent {
    /// Wrap a decoded payload; `None` unless it is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(body) => Some(Self { body }),
            _ => None,
        }
    }

    /// Event kind from `type`, then `event_type`, else `"unknown"`.
    ///
    /// The first key that is present wins whatever its value. A non-string
    /// value is rendered as JSON (`null`, `42`), which never names a
    /// persisted event kind.
    pub fn event_type(&self) -> Cow<'_, str> {
        match self.body.get("type").or_else(|| self.body.get("event_type")) {
            Some(Value::String(kind)) => Cow::Borrowed(kind.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Borrowed(UNKNOWN),
        }
    }

    /// Conversation id from `data.conversation_id`, then the top-level
    /// `conversation_id`, else `"unknown"`. Empty strings and non-scalar
    /// values fall through to the next candidate.
    pub fn conversation_id(&self) -> String {
        let nested = self
            .body
            .get("data")
            .and_then(Value::as_object)
            .and_then(|data| data.get("conversation_id"));

        nested
            .and_then(id_from_value)
            .or_else(|| self.body.get("conversation_id").and_then(id_from_value))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Make a value safe to embed in a single path component.
pub fn sanitize_file_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    // "." and ".." would still resolve outside the file name
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}
