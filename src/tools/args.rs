//! Argument extraction helpers shared by the panel tools.

use serde_json::{Map, Value};

use ptero_search::engine::Query;

use crate::error::ToolError;

/// The argument object of a call. `null` counts as no arguments.
pub fn object(args: &Value) -> Result<Map<String, Value>, ToolError> {
    match args {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        _ => Err(ToolError::Validation("arguments must be a JSON object".into())),
    }
}

/// Fail if `args` contains a key outside `allowed`.
pub fn reject_unknown(args: &Map<String, Value>, allowed: &[&str]) -> Result<(), ToolError> {
    let mut extra: Vec<&str> = args
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if extra.is_empty() {
        return Ok(());
    }
    extra.sort_unstable();
    Err(ToolError::Validation(format!(
        "unexpected parameters: {}",
        extra.join(", ")
    )))
}

/// A required string argument.
pub fn required_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::Validation(format!("missing required argument: {key}")))
}

/// A string or integer identifier, rendered as text.
pub fn required_id(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Some(_) => Err(ToolError::Validation(format!(
            "{key} must be a string or an integer"
        ))),
        None => Err(ToolError::Validation(format!(
            "missing required parameter: {key}"
        ))),
    }
}

/// An optional integer argument; `null` or missing means `default`.
pub fn optional_int(args: &Map<String, Value>, key: &str, default: i64) -> Result<i64, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_i64()
            .ok_or_else(|| ToolError::Validation(format!("{key} must be an integer"))),
    }
}

/// An optional number argument; `null` or missing means `default`.
pub fn optional_f64(args: &Map<String, Value>, key: &str, default: f64) -> Result<f64, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| ToolError::Validation(format!("{key} must be a number"))),
    }
}

/// Saturate an integer argument into `u32`; negatives become 0.
pub fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Saturate an integer argument into `usize`; negatives become 0.
pub fn to_usize(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

/// Flatten a JSON `query` argument into ordered query-string pairs.
///
/// - scalars become `key=value` (booleans as `true`/`false`)
/// - arrays repeat the key once per element
/// - nested objects use bracket keys: `{"filter": {"email": "x"}}`
///   becomes `filter[email]=x`
/// - nulls are skipped
pub fn query_pairs(query: Option<&Value>) -> Result<Query, ToolError> {
    let mut out = Query::new();
    match query {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => {
            for (key, value) in map {
                flatten(key, value, &mut out);
            }
        }
        Some(_) => {
            return Err(ToolError::Validation("query must be a JSON object".into()));
        }
    }
    Ok(out)
}

fn flatten(key: &str, value: &Value, out: &mut Query) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push((key.to_owned(), s.clone())),
        Value::Number(n) => out.push((key.to_owned(), n.to_string())),
        Value::Bool(b) => out.push((key.to_owned(), b.to_string())),
        Value::Array(items) => {
            for item in items {
                flatten(key, item, out);
            }
        }
        Value::Object(map) => {
            for (sub, v) in map {
                flatten(&format!("{key}[{sub}]"), v, out);
            }
        }
    }
}
