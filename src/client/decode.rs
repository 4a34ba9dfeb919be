//! Shape-tolerant decoding of list responses.
//!
//! The backend is inconsistent about how it returns collections. The same
//! logical list may arrive as:
//!
//! ```text
//! {"items": [...], "count": N}    wrapped
//! [...]                           bare array
//! {...}                           a single element
//! {} / {"count": 0}               empty
//! ```
//!
//! [`decode_list`] accepts all of them so call sites never sniff shapes.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A response matched none of the known shapes.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to decode response: {reason} (payload: {})", preview(.raw))]
pub struct DecodeError {
    pub reason: String,
    /// The original payload, lossily converted to UTF-8.
    pub raw: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>, raw: &[u8]) -> Self {
        Self {
            reason: reason.into(),
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}

const PREVIEW_LEN: usize = 200;

fn preview(raw: &str) -> String {
    if raw.chars().count() <= PREVIEW_LEN {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(PREVIEW_LEN).collect();
        format!("{}...", head)
    }
}

/// Items of a list response, in server order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecodedList<T> {
    items: Vec<T>,
}

impl<T> DecodedList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for DecodedList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for DecodedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for DecodedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> From<DecodedList<T>> for Vec<T> {
    fn from(list: DecodedList<T>) -> Self {
        list.items
    }
}

/// Decode a list response of any known shape.
///
/// Shapes are tried in order and the first match wins:
/// 1. an object with a non-null `items` array (returned as-is, even if empty);
///    an object without `items` whose `count` is 0 (or that is `{}`) is empty
/// 2. a bare array
/// 3. a single object, wrapped as a one-element list
///
/// Anything else is a [`DecodeError`] carrying the payload.
pub fn decode_list<T: DeserializeOwned>(raw: &[u8]) -> Result<DecodedList<T>, DecodeError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| DecodeError::new(format!("invalid JSON: {}", e), raw))?;

    match value {
        Value::Object(map) => decode_object(map, raw),
        Value::Array(_) => serde_json::from_value::<Vec<T>>(value)
            .map(DecodedList::new)
            .map_err(|e| DecodeError::new(format!("array elements: {}", e), raw)),
        other => Err(DecodeError::new(
            format!("expected an object or array, got {}", kind(&other)),
            raw,
        )),
    }
}

fn decode_object<T: DeserializeOwned>(
    mut map: Map<String, Value>,
    raw: &[u8],
) -> Result<DecodedList<T>, DecodeError> {
    match map.remove("items") {
        Some(Value::Null) | None => {}
        Some(items) => {
            return serde_json::from_value::<Vec<T>>(items)
                .map(DecodedList::new)
                .map_err(|e| DecodeError::new(format!("items: {}", e), raw));
        }
    }

    let count_is_zero = map.get("count").and_then(Value::as_i64) == Some(0);
    if map.is_empty() || count_is_zero {
        return Ok(DecodedList::empty());
    }

    serde_json::from_value::<T>(Value::Object(map))
        .map(|item| DecodedList::new(vec![item]))
        .map_err(|e| DecodeError::new(format!("single object: {}", e), raw))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
