//! Application API routes exposed one-to-one as tools.
//!
//! Every entry of [`APPLICATION_ROUTES`] becomes a [`RouteTool`] named
//! `ptero_app_{method}_{segments}`: the path after `/api/application/`,
//! with `{param}` placeholders unwrapped, `-` replaced by `_` and segments
//! joined with `_`. For example `GET /api/application/users/{user}` is
//! `ptero_app_get_users_user`.
//!
//! Two helpers sit next to the generated tools: [`ListEndpointsTool`]
//! describes the table and [`RawRequestTool`] reaches endpoints the table
//! does not cover.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ptero_search::{Method, PanelApi};

use crate::error::ToolError;

use super::args;
use super::types::{DEFAULT_MAX_BYTES, Tool, ToolMode, ToolResult};

/// Prefix every Application API path starts with.
pub const APPLICATION_PREFIX: &str = "/api/application/";

/// One Application API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
}

const fn route(method: Method, path: &'static str) -> Route {
    Route { method, path }
}

/// The Application API endpoints exposed as tools.
pub const APPLICATION_ROUTES: &[Route] = &[
    // Users
    route(Method::Get, "/api/application/users"),
    route(Method::Get, "/api/application/users/{user}"),
    route(Method::Get, "/api/application/users/external/{external_id}"),
    route(Method::Post, "/api/application/users"),
    route(Method::Patch, "/api/application/users/{user}"),
    route(Method::Delete, "/api/application/users/{user}"),
    // Nodes
    route(Method::Get, "/api/application/nodes"),
    route(Method::Get, "/api/application/nodes/deployable"),
    route(Method::Get, "/api/application/nodes/{node}"),
    route(Method::Get, "/api/application/nodes/{node}/configuration"),
    route(Method::Post, "/api/application/nodes"),
    route(Method::Patch, "/api/application/nodes/{node}"),
    route(Method::Delete, "/api/application/nodes/{node}"),
    // Allocations
    route(Method::Get, "/api/application/nodes/{node}/allocations"),
    route(Method::Post, "/api/application/nodes/{node}/allocations"),
    route(Method::Delete, "/api/application/nodes/{node}/allocations/{allocation}"),
    // Locations
    route(Method::Get, "/api/application/locations"),
    route(Method::Get, "/api/application/locations/{location}"),
    route(Method::Post, "/api/application/locations"),
    route(Method::Patch, "/api/application/locations/{location}"),
    route(Method::Delete, "/api/application/locations/{location}"),
    // Servers
    route(Method::Get, "/api/application/servers"),
    route(Method::Get, "/api/application/servers/{server}"),
    route(Method::Get, "/api/application/servers/external/{external_id}"),
    route(Method::Post, "/api/application/servers"),
    route(Method::Patch, "/api/application/servers/{server}/details"),
    route(Method::Patch, "/api/application/servers/{server}/build"),
    route(Method::Patch, "/api/application/servers/{server}/startup"),
    route(Method::Post, "/api/application/servers/{server}/suspend"),
    route(Method::Post, "/api/application/servers/{server}/unsuspend"),
    route(Method::Post, "/api/application/servers/{server}/reinstall"),
    route(Method::Delete, "/api/application/servers/{server}"),
    route(Method::Delete, "/api/application/servers/{server}/{force}"),
    // Server databases
    route(Method::Get, "/api/application/servers/{server}/databases"),
    route(Method::Get, "/api/application/servers/{server}/databases/{database}"),
    route(Method::Post, "/api/application/servers/{server}/databases"),
    route(
        Method::Post,
        "/api/application/servers/{server}/databases/{database}/reset-password",
    ),
    route(Method::Delete, "/api/application/servers/{server}/databases/{database}"),
    // Nests and eggs
    route(Method::Get, "/api/application/nests"),
    route(Method::Get, "/api/application/nests/{nest}"),
    route(Method::Get, "/api/application/nests/{nest}/eggs"),
    route(Method::Get, "/api/application/nests/{nest}/eggs/{egg}"),
];

/// Derive the tool name for a route.
pub fn tool_name(method: Method, path: &str) -> String {
    let suffix = path
        .strip_prefix(APPLICATION_PREFIX)
        .unwrap_or(path)
        .trim_matches('/');
    let parts: Vec<String> = suffix
        .split('/')
        .map(|segment| {
            let segment = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .unwrap_or(segment);
            segment.replace('-', "_")
        })
        .collect();
    format!(
        "ptero_app_{}_{}",
        method.as_str().to_ascii_lowercase(),
        parts.join("_")
    )
}

/// Names of the `{param}` placeholders in `path`, in order.
pub fn path_params(path: &str) -> Vec<&str> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .collect()
}

/// Substitute every placeholder of `template` from `args`, percent-encoding
/// each value as a single path segment.
pub fn resolve_path(
    template: &str,
    args: &serde_json::Map<String, Value>,
) -> Result<String, ToolError> {
    let mut resolved = template.to_owned();
    for param in path_params(template) {
        let value = args::required_id(args, param)?;
        resolved = resolved.replace(&format!("{{{param}}}"), &urlencoding::encode(&value));
    }
    Ok(resolved)
}

/// A single Application API endpoint as a tool.
///
/// Arguments: one per path parameter (string or integer, required), plus
/// an optional `query` object and an optional `body`. Any other argument
/// is rejected.
pub struct RouteTool<A: PanelApi> {
    api: Arc<A>,
    route: Route,
    name: String,
    description: String,
    params: Vec<&'static str>,
}

impl<A: PanelApi> RouteTool<A> {
    /// Create the tool for `route`.
    pub fn new(api: Arc<A>, route: Route) -> Self {
        let mut description = format!("{} {}", route.method, route.path);
        if route.method == Method::Get {
            match route.path {
                "/api/application/users" => description.push_str(
                    " (raw; can be large, prefer ptero_ai_list_users / ptero_ai_search_users)",
                ),
                "/api/application/servers" => description.push_str(
                    " (raw; can be large, prefer ptero_ai_list_servers / ptero_ai_search_servers)",
                ),
                _ => {}
            }
        }
        Self {
            api,
            name: tool_name(route.method, route.path),
            description,
            params: path_params(route.path),
            route,
        }
    }

    /// The endpoint this tool calls.
    pub fn route(&self) -> Route {
        self.route
    }
}

#[async_trait]
impl<A: PanelApi + 'static> Tool for RouteTool<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for param in &self.params {
            properties.insert(
                (*param).to_owned(),
                json!({"type": ["string", "integer"], "description": format!("Path parameter {{{param}}}")}),
            );
        }
        properties.insert(
            "query".to_owned(),
            json!({"type": "object", "description": "Query-string parameters (e.g. page, per_page, filter, include)"}),
        );
        properties.insert(
            "body".to_owned(),
            json!({"description": "JSON request body"}),
        );
        json!({
            "type": "object",
            "properties": properties,
            "required": self.params,
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&args)?;
        let mut allowed: Vec<&str> = self.params.clone();
        allowed.extend(["query", "body"]);
        args::reject_unknown(&args, &allowed)?;

        let path = resolve_path(self.route.path, &args)?;
        let query = args::query_pairs(args.get("query"))?;
        let body = args.get("body").filter(|b| !b.is_null());

        let payload = self
            .api
            .request(self.route.method, &path, &query, body)
            .await?;
        ToolResult::json(&payload, DEFAULT_MAX_BYTES)
    }

    fn allowed_in_mode(&self, mode: ToolMode) -> bool {
        self.route.method == Method::Get || mode == ToolMode::Full
    }
}

/// Lists every route tool with its method and path.
pub struct ListEndpointsTool;

#[async_trait]
impl Tool for ListEndpointsTool {
    fn name(&self) -> &str {
        "ptero_app_list_endpoints"
    }

    fn description(&self) -> &str {
        "List all Application API endpoints exposed as tools."
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}, "additionalProperties": false})
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        args::reject_unknown(&args::object(&args)?, &[])?;
        let endpoints: Vec<Value> = APPLICATION_ROUTES
            .iter()
            .map(|r| {
                json!({
                    "tool": tool_name(r.method, r.path),
                    "method": r.method,
                    "path": r.path,
                })
            })
            .collect();
        ToolResult::json(&endpoints, DEFAULT_MAX_BYTES)
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}

/// A raw Application API request for endpoints without a dedicated tool.
pub struct RawRequestTool<A: PanelApi> {
    api: Arc<A>,
}

impl<A: PanelApi> RawRequestTool<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: PanelApi + 'static> Tool for RawRequestTool<A> {
    fn name(&self) -> &str {
        "ptero_app_request"
    }

    fn description(&self) -> &str {
        "Make a raw Application API request (useful for endpoints not mapped as tools yet)."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "method": {"type": "string", "enum": ["GET", "POST", "PUT", "PATCH", "DELETE"]},
                "path": {"type": "string", "description": "Must start with /api/application/"},
                "query": {"type": "object"},
                "body": {}
            },
            "required": ["method", "path"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&args)?;
        args::reject_unknown(&args, &["method", "path", "query", "body"])?;

        let method: Method = args::required_str(&args, "method")?.parse()?;
        let path = args::required_str(&args, "path")?;
        if !path.starts_with(APPLICATION_PREFIX) {
            return Err(ToolError::Validation(format!(
                "path must start with {APPLICATION_PREFIX}"
            )));
        }
        let query = args::query_pairs(args.get("query"))?;
        let body = args.get("body").filter(|b| !b.is_null());

        let payload = self.api.request(method, path, &query, body).await?;
        ToolResult::json(&payload, DEFAULT_MAX_BYTES)
    }

    fn allowed_in_mode(&self, mode: ToolMode) -> bool {
        mode == ToolMode::Full
    }
}
