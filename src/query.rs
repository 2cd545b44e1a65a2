//! Query parameter flattening.
//!
//! The store API reads nested query parameters with PHP bracket notation:
//! `filter[status]=processing` for mappings and `include[]=1&include[]=2`
//! for sequences. [`flatten`] produces those entries in the mapping's
//! insertion order and [`encode`] turns them into a query-string fragment.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Flatten `params` into `key=value` entries, unencoded.
///
/// ```
/// use woocommerce_api::query::flatten;
///
/// let params = serde_json::json!({"a": 1, "b": {"x": 2}, "c": [4, 5]});
/// let entries = flatten(params.as_object().unwrap());
/// assert_eq!(entries, vec!["a=1", "b[x]=2", "c[]=4", "c[]=5"]);
/// ```
pub fn flatten(params: &Map<String, Value>) -> Vec<String> {
    flatten_pairs(params)
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect()
}

/// Flatten `params` into `(key, value)` pairs, unencoded
pub fn flatten_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push_value(&mut pairs, key.clone(), value);
    }
    pairs
}

/// Encode `params` as a query-string fragment without a leading `?`.
///
/// Returns `None` for an absent or empty mapping so callers never append a
/// bare `?` or `&`.
pub fn encode(params: Option<&Map<String, Value>>) -> Option<String> {
    let pairs = flatten_pairs(params?);
    if pairs.is_empty() {
        return None;
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Some(encoded)
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (inner_key, inner) in map {
                push_value(pairs, format!("{}[{}]", key, inner_key), inner);
            }
        }
        Value::Array(items) => {
            for item in items {
                push_value(pairs, format!("{}[]", key), item);
            }
        }
        scalar => pairs.push((key, scalar_to_string(scalar))),
    }
}

/// Render a scalar as a query value.
///
/// Booleans are sent as `true`/`false`, which the store's REST boolean
/// sanitizer accepts. `null` is sent as an empty value. A float with no
/// fractional part is sent as an integer (`3.0` becomes `3`) because PHP
/// reads both as the same number and its own query builder drops the `.0`.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}
