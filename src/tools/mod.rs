//! Agent-facing tools over the panel Application API.
//!
//! Two families are registered by [`build_registry`]:
//!
//! - `ptero_app_*`: one tool per Application API route, plus
//!   `ptero_app_list_endpoints` and the raw `ptero_app_request`.
//! - `ptero_ai_*`: discovery helpers (fuzzy search, compact listing,
//!   summaries, totals) backed by `ptero_search`.
//!
//! In [`ToolMode::ReadOnly`] only GET route tools, the endpoint listing
//! and the discovery tools are available.

pub mod args;
pub mod discovery;
pub mod registry;
pub mod routes;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use ptero_search::{PanelApi, ResourceKind};

pub use discovery::{ListTool, SearchTool, SummaryTool, TotalsTool};
pub use registry::ToolRegistry;
pub use routes::{APPLICATION_ROUTES, ListEndpointsTool, RawRequestTool, Route, RouteTool};
pub use types::{Tool, ToolMode, ToolResult};

/// Register every panel tool against `api`.
pub fn build_registry<A: PanelApi + 'static>(api: Arc<A>, mode: ToolMode) -> ToolRegistry {
    let mut registry = ToolRegistry::new(mode);

    for route in APPLICATION_ROUTES {
        registry.register(Arc::new(RouteTool::new(Arc::clone(&api), *route)));
    }
    registry.register(Arc::new(ListEndpointsTool));
    registry.register(Arc::new(RawRequestTool::new(Arc::clone(&api))));

    for kind in [ResourceKind::Account, ResourceKind::Server] {
        registry.register(Arc::new(SearchTool::new(Arc::clone(&api), kind)));
        registry.register(Arc::new(ListTool::new(Arc::clone(&api), kind)));
        registry.register(Arc::new(SummaryTool::new(Arc::clone(&api), kind)));
    }
    registry.register(Arc::new(TotalsTool::new(api)));

    tracing::debug!(tools = registry.len(), ?mode, "tool registry built");
    registry
}
