//! Discovery tools over accounts and servers.
//!
//! These wrap the `ptero_search` operations so an agent can find a user
//! or server without paging through raw Application API listings. Output
//! is always compact summaries.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ptero_search::{DEFAULT_LIST_PER_PAGE, PanelApi, ResourceKind, SearchOptions};

use crate::error::ToolError;

use super::args;
use super::types::{DEFAULT_MAX_BYTES, Tool, ToolMode, ToolResult};

fn plural(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Account => "users",
        ResourceKind::Server => "servers",
    }
}

fn singular(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Account => "user",
        ResourceKind::Server => "server",
    }
}

/// Fuzzy search over one collection (`ptero_ai_search_users`,
/// `ptero_ai_search_servers`).
pub struct SearchTool<A: PanelApi> {
    api: Arc<A>,
    kind: ResourceKind,
    name: String,
    description: String,
}

impl<A: PanelApi> SearchTool<A> {
    pub fn new(api: Arc<A>, kind: ResourceKind) -> Self {
        let description = match kind {
            ResourceKind::Account => {
                "Fuzzy-search users by username, email, name, external_id, uuid or id. \
                 Returns compact ranked matches."
            }
            ResourceKind::Server => {
                "Fuzzy-search servers by name, identifier, uuid, external_id, id or description. \
                 Returns compact ranked matches."
            }
        };
        Self {
            api,
            kind,
            name: format!("ptero_ai_search_{}", plural(kind)),
            description: description.to_owned(),
        }
    }
}

#[async_trait]
impl<A: PanelApi + 'static> Tool for SearchTool<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        let defaults = SearchOptions::default();
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Free-text query"},
                "limit": {"type": "integer", "default": defaults.limit, "minimum": 1, "maximum": 50},
                "max_pages": {"type": "integer", "default": defaults.max_pages, "minimum": 1},
                "per_page": {"type": "integer", "default": defaults.per_page, "minimum": 1, "maximum": 100},
                "min_score": {"type": "number", "default": defaults.min_score}
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&args)?;
        args::reject_unknown(&args, &["query", "limit", "max_pages", "per_page", "min_score"])?;

        let query = args::required_str(&args, "query")?;
        let defaults = SearchOptions::default();
        let options = SearchOptions {
            limit: args::to_usize(args::optional_int(&args, "limit", defaults.limit as i64)?),
            max_pages: args::to_u32(args::optional_int(
                &args,
                "max_pages",
                i64::from(defaults.max_pages),
            )?),
            per_page: args::to_u32(args::optional_int(
                &args,
                "per_page",
                i64::from(defaults.per_page),
            )?),
            min_score: args::optional_f64(&args, "min_score", defaults.min_score)?,
        };

        let result = ptero_search::search(self.api.as_ref(), self.kind, query, &options).await?;
        ToolResult::json(&result, DEFAULT_MAX_BYTES)
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}

/// One page of compact summaries (`ptero_ai_list_users`,
/// `ptero_ai_list_servers`).
pub struct ListTool<A: PanelApi> {
    api: Arc<A>,
    kind: ResourceKind,
    name: String,
    description: String,
}

impl<A: PanelApi> ListTool<A> {
    pub fn new(api: Arc<A>, kind: ResourceKind) -> Self {
        Self {
            api,
            kind,
            name: format!("ptero_ai_list_{}", plural(kind)),
            description: format!(
                "List {} (paginated) as compact summaries.",
                plural(kind)
            ),
        }
    }
}

#[async_trait]
impl<A: PanelApi + 'static> Tool for ListTool<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "page": {"type": "integer", "default": 1, "minimum": 1},
                "per_page": {"type": "integer", "default": DEFAULT_LIST_PER_PAGE, "minimum": 1, "maximum": 100}
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&args)?;
        args::reject_unknown(&args, &["page", "per_page"])?;
        let page = args::to_u32(args::optional_int(&args, "page", 1)?);
        let per_page = args::to_u32(args::optional_int(
            &args,
            "per_page",
            i64::from(DEFAULT_LIST_PER_PAGE),
        )?);

        let listing = ptero_search::list(self.api.as_ref(), self.kind, page, per_page).await?;
        ToolResult::json(&listing.to_json(), DEFAULT_MAX_BYTES)
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}

/// Compact summary of a single record (`ptero_ai_get_user_summary`,
/// `ptero_ai_get_server_summary`). The id argument is named after the kind.
pub struct SummaryTool<A: PanelApi> {
    api: Arc<A>,
    kind: ResourceKind,
    name: String,
    description: String,
}

impl<A: PanelApi> SummaryTool<A> {
    pub fn new(api: Arc<A>, kind: ResourceKind) -> Self {
        Self {
            api,
            kind,
            name: format!("ptero_ai_get_{}_summary", singular(kind)),
            description: format!("Get a compact summary of a single {}.", singular(kind)),
        }
    }
}

#[async_trait]
impl<A: PanelApi + 'static> Tool for SummaryTool<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        let key = singular(self.kind);
        json!({
            "type": "object",
            "properties": {
                key: {"type": ["string", "integer"], "description": format!("{key} id")}
            },
            "required": [key],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&args)?;
        let key = singular(self.kind);
        args::reject_unknown(&args, &[key])?;
        let id = args::required_id(&args, key)?;

        let api = self.api.as_ref();
        match self.kind {
            ResourceKind::Account => {
                let summary = ptero_search::account_summary(api, &id).await?;
                ToolResult::json(&summary, DEFAULT_MAX_BYTES)
            }
            ResourceKind::Server => {
                let summary = ptero_search::server_summary(api, &id).await?;
                ToolResult::json(&summary, DEFAULT_MAX_BYTES)
            }
        }
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}

/// Resource counts across the panel (`ptero_ai_panel_totals`).
pub struct TotalsTool<A: PanelApi> {
    api: Arc<A>,
}

impl<A: PanelApi> TotalsTool<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: PanelApi + 'static> Tool for TotalsTool<A> {
    fn name(&self) -> &str {
        "ptero_ai_panel_totals"
    }

    fn description(&self) -> &str {
        "Get counts of users, servers, nodes, locations and nests."
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}, "additionalProperties": false})
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        args::reject_unknown(&args::object(&args)?, &[])?;
        let totals = ptero_search::totals(self.api.as_ref()).await?;
        ToolResult::json(&totals, DEFAULT_MAX_BYTES)
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}
