//! Caller-side response decoding.
//!
//! The dispatcher hands back raw responses. These helpers sit on top of it
//! for callers that want JSON, including a repair step for a server defect
//! where some endpoints answer with a doubly encoded body.

use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use serde_json::{Deserializer, Value};

use crate::error::{ApiError, Result};

/// Decode a response body as JSON, regardless of status
pub fn decode<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = response.bytes()?;
    Ok(serde_json::from_slice(&body)?)
}

/// Decode a response body as JSON after [`repair_double_json`]
pub fn decode_repaired<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = response.text()?;
    let value = repair_double_json(&body)?;
    Ok(serde_json::from_value(value)?)
}

/// Parse a body that may have been JSON-encoded twice.
///
/// Two shapes are handled:
/// - a JSON string whose content is itself a JSON document
/// - several JSON documents back to back, of which the last one wins
///
/// A well-formed body passes through unchanged.
pub fn repair_double_json(body: &str) -> Result<Value> {
    let mut last = None;
    for document in Deserializer::from_str(body).into_iter::<Value>() {
        last = Some(document?);
    }
    let value = last.ok_or_else(|| ApiError::Other("empty response body".to_string()))?;

    match value {
        Value::String(inner) => match serde_json::from_str::<Value>(&inner) {
            Ok(decoded @ (Value::Object(_) | Value::Array(_))) => Ok(decoded),
            _ => Ok(Value::String(inner)),
        },
        other => Ok(other),
    }
}

/// Get a value from a JSON document by a slash-separated path.
/// For example, `"billing/email"` reads the `email` field inside `billing`,
/// and `"line_items/0/sku"` indexes into an array.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('/').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }

    Some(current)
}
