//! Candidate field extraction for scoring.
//!
//! Each resource kind has a fixed, ordered list of fields a query is
//! scored against. The order is also the tie-break: when two fields score
//! the same, the one listed first wins.

use crate::types::{Record, ResourceKind};

/// Scored fields for accounts, in priority order.
pub const ACCOUNT_FIELDS: &[&str] = &["username", "email", "name", "external_id", "uuid", "id"];

/// Scored fields for servers, in priority order.
pub const SERVER_FIELDS: &[&str] = &["name", "identifier", "uuid", "external_id", "id", "description"];

/// Render a scalar attribute as text.
///
/// Strings are returned as-is, numbers and booleans in their display form.
/// Null, arrays, objects and missing keys are absent.
pub fn scalar_text(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Join `first_name` and `last_name`, trimmed, skipping empty parts.
pub fn full_name(record: &Record) -> String {
    ["first_name", "last_name"]
        .iter()
        .filter_map(|key| scalar_text(record, key))
        .map(|part| part.trim().to_owned())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the candidate list for `record`: `(field name, text)` pairs in
/// priority order, skipping absent and empty values.
pub fn candidate_fields(kind: ResourceKind, record: &Record) -> Vec<(&'static str, String)> {
    let names = match kind {
        ResourceKind::Account => ACCOUNT_FIELDS,
        ResourceKind::Server => SERVER_FIELDS,
    };

    names
        .iter()
        .filter_map(|&field| {
            let value = if kind == ResourceKind::Account && field == "name" {
                Some(full_name(record))
            } else {
                scalar_text(record, field)
            };
            value.filter(|v| !v.is_empty()).map(|v| (field, v))
        })
        .collect()
}
