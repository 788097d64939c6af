//! Tolerant parsing of Application API response envelopes.
//!
//! Collection endpoints answer with
//! `{"data": [{"attributes": {...}}, ...], "meta": {"pagination": {...}}}`
//! and single-object endpoints with `{"attributes": {...}}`. None of the
//! functions here fail: a missing or mistyped part degrades to an empty
//! default (no items, empty attributes, unknown totals).

use serde_json::Value;

use crate::types::{Pagination, Record};

/// Extract the records of a collection response.
///
/// Items carrying an `attributes` object are unwrapped; other object items
/// are used as-is; non-object items are skipped. Upstream order and
/// duplicates are preserved.
pub fn extract_items(payload: &Value) -> Vec<Record> {
    let Some(data) = payload.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    data.iter()
        .filter_map(|item| {
            let item = item.as_object()?;
            match item.get("attributes").and_then(Value::as_object) {
                Some(attributes) => Some(attributes.clone()),
                None => Some(item.clone()),
            }
        })
        .collect()
}

/// Extract the attributes of a single-object response.
///
/// Looks at top-level `attributes` first, then `data.attributes`.
pub fn extract_attributes(payload: &Value) -> Record {
    payload
        .get("attributes")
        .and_then(Value::as_object)
        .or_else(|| {
            payload
                .get("data")
                .and_then(|d| d.get("attributes"))
                .and_then(Value::as_object)
        })
        .cloned()
        .unwrap_or_default()
}

/// Read `meta.pagination`. Fields that are not unsigned integers are absent.
pub fn extract_pagination(payload: &Value) -> Pagination {
    let Some(p) = payload
        .get("meta")
        .and_then(|m| m.get("pagination"))
        .filter(|p| p.is_object())
    else {
        return Pagination::default();
    };

    let field = |key: &str| p.get(key).and_then(Value::as_u64);
    Pagination {
        current_page: field("current_page"),
        per_page: field("per_page"),
        total: field("total"),
        total_pages: field("total_pages"),
    }
}

/// The collection size declared in `meta.pagination.total`.
///
/// Accepts an unsigned integer or a string of ASCII digits; anything else
/// (absent, negative, fractional, text) counts as 0.
pub fn declared_total(payload: &Value) -> u64 {
    match payload.get("meta").and_then(|m| m.get("pagination")).and_then(|p| p.get("total")) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// The page count declared in `meta.pagination.total_pages`, as a signed
/// integer.
///
/// Any integer counts as declared, including zero and negatives, so a
/// paginator stops after the first page on such metadata. Absent or
/// non-integer values are unknown.
pub fn declared_total_pages(payload: &Value) -> Option<i64> {
    payload
        .get("meta")?
        .get("pagination")?
        .get("total_pages")?
        .as_i64()
}
