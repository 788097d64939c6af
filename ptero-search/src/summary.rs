//! Compact, token-efficient projections of panel records.
//!
//! Summaries keep only the identifying fields of a record and drop every
//! field that is absent, null or an empty string. When produced from a
//! ranked match they also carry the rounded `score` and the field the
//! match came from (`matched_on`).

use serde::Serialize;
use serde_json::Value;

use crate::orchestrator::fields::full_name;
use crate::types::{Record, ResourceKind, ScoredMatch};

/// Longest server description kept, in characters, including the ellipsis.
pub const DESCRIPTION_MAX_CHARS: usize = 120;

/// Compact account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    /// First and last name, trimmed and space-joined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Compact managed server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Truncated to [`DESCRIPTION_MAX_CHARS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<Value>,
}

/// A compact record of either kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    Account(AccountSummary),
    Server(ServerSummary),
}

impl Summary {
    /// Summarize `record` as `kind`, without match annotations.
    pub fn of(kind: ResourceKind, record: &Record) -> Self {
        match kind {
            ResourceKind::Account => Self::Account(summarize_account(record)),
            ResourceKind::Server => Self::Server(summarize_server(record)),
        }
    }

    /// Summarize a ranked match, annotated with its score and field.
    pub fn of_match(kind: ResourceKind, m: &ScoredMatch) -> Self {
        let score = Some(round_score(m.score));
        let matched_on = m.matched_on.map(str::to_owned);
        match Self::of(kind, &m.record) {
            Self::Account(s) => Self::Account(AccountSummary {
                score,
                matched_on,
                ..s
            }),
            Self::Server(s) => Self::Server(ServerSummary {
                score,
                matched_on,
                ..s
            }),
        }
    }

    /// The rounded match score, if this summary came from a search.
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Account(s) => s.score,
            Self::Server(s) => s.score,
        }
    }

    /// The field the match came from, if this summary came from a search.
    pub fn matched_on(&self) -> Option<&str> {
        match self {
            Self::Account(s) => s.matched_on.as_deref(),
            Self::Server(s) => s.matched_on.as_deref(),
        }
    }
}

/// Project an account record.
pub fn summarize_account(record: &Record) -> AccountSummary {
    let name = full_name(record);
    AccountSummary {
        score: None,
        matched_on: None,
        id: kept(record, "id"),
        uuid: kept(record, "uuid"),
        external_id: kept(record, "external_id"),
        username: kept(record, "username"),
        email: kept(record, "email"),
        name: (!name.is_empty()).then_some(name),
    }
}

/// Project a server record.
pub fn summarize_server(record: &Record) -> ServerSummary {
    let description = record
        .get("description")
        .and_then(Value::as_str)
        .map(|d| truncate_chars(d, DESCRIPTION_MAX_CHARS))
        .filter(|d| !d.is_empty());

    ServerSummary {
        score: None,
        matched_on: None,
        id: kept(record, "id"),
        identifier: kept(record, "identifier"),
        uuid: kept(record, "uuid"),
        external_id: kept(record, "external_id"),
        name: kept(record, "name"),
        description,
        suspended: kept(record, "suspended"),
    }
}

/// Round a score to one decimal place.
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Cut `text` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// The value at `key`, unless it is missing, null or an empty string.
fn kept(record: &Record, key: &str) -> Option<Value> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        v => Some(v.clone()),
    }
}
