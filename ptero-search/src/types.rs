//! Core types for panel records, search results and resource identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::summary::Summary;

/// One fetched entity as a flat field mapping (the item's `attributes`).
pub type Record = serde_json::Map<String, serde_json::Value>;

/// HTTP methods accepted by the Application API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the canonical upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(SearchError::InvalidInput(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

/// The two discoverable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Panel user accounts (`/api/application/users`).
    Account,
    /// Managed game servers (`/api/application/servers`).
    Server,
}

impl ResourceKind {
    /// Collection endpoint for this kind.
    pub fn collection_path(&self) -> &'static str {
        match self {
            Self::Account => "/api/application/users",
            Self::Server => "/api/application/servers",
        }
    }

    /// Key under which compact list output is returned.
    pub fn list_key(&self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Server => "servers",
        }
    }

    /// Returns the human-readable name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record that cleared the score threshold during a scan.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// Best field score, 0–100.
    pub score: f64,
    /// The matched record.
    pub record: Record,
    /// Name of the candidate field that produced `score`.
    pub matched_on: Option<&'static str>,
}

/// How much of the collection a search looked at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Every record yielded by the paginator, accepted or not.
    pub items: usize,
    /// Distinct page numbers those records came from.
    pub pages: usize,
}

/// Ranked outcome of a fuzzy search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// The trimmed query.
    pub query: String,
    /// Summarized matches, best first, at most `limit` long.
    pub matches: Vec<Summary>,
    /// Scan statistics.
    pub scanned: ScanStats,
}

/// Pagination metadata from `meta.pagination`; each field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

/// One page of compact list output.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Which collection was listed.
    pub kind: ResourceKind,
    /// Compact summaries in upstream order.
    pub items: Vec<Summary>,
    /// Pagination metadata as declared by the panel.
    pub pagination: Pagination,
}

impl ListPage {
    /// Render as `{"accounts"|"servers": [...], "pagination": {...}}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert(
            self.kind.list_key().to_owned(),
            serde_json::to_value(&self.items).unwrap_or_default(),
        );
        out.insert(
            "pagination".to_owned(),
            serde_json::to_value(self.pagination).unwrap_or_default(),
        );
        serde_json::Value::Object(out)
    }
}
