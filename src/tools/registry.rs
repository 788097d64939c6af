//! Tool registry with mode-based gating.
//!
//! The [`ToolRegistry`] holds registered tools, provides lookup by name,
//! enforces mode permissions, exports JSON schemas and dispatches calls.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ToolError;

use super::types::{Tool, ToolMode, ToolResult};

/// Registry of available tools with mode-based access control.
///
/// Tools that aren't allowed in the current mode are hidden from
/// [`list_available()`](Self::list_available), [`get()`](Self::get) and
/// [`schemas()`](Self::schemas), and rejected by [`call()`](Self::call).
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    mode: ToolMode,
}

impl ToolRegistry {
    /// Create a new empty registry with the given mode.
    pub fn new(mode: ToolMode) -> Self {
        Self {
            tools: HashMap::new(),
            mode,
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name, respecting mode gating.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .filter(|t| t.allowed_in_mode(self.mode))
            .cloned()
    }

    /// List names of all tools available in the current mode, sorted.
    pub fn list_available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tools
            .values()
            .filter(|t| t.allowed_in_mode(self.mode))
            .map(|t| t.name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Export JSON schemas for all available tools, sorted by name.
    ///
    /// Each entry contains `name`, `description`, and `parameters` (the schema).
    pub fn schemas(&self) -> Vec<serde_json::Value> {
        let mut schemas: Vec<(String, serde_json::Value)> = self
            .tools
            .values()
            .filter(|t| t.allowed_in_mode(self.mode))
            .map(|t| {
                let entry = serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema(),
                });
                (t.name().to_string(), entry)
            })
            .collect();
        schemas.sort_by(|a, b| a.0.cmp(&b.0));
        schemas.into_iter().map(|(_, v)| v).collect()
    }

    /// Look up `name` and execute it with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] if nothing is registered under
    /// `name`, [`ToolError::Blocked`] if the current mode hides it, or the
    /// tool's own error.
    pub async fn call(
        &self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let Some(tool) = self.get(name) else {
            if self.is_blocked_by_mode(name) {
                return Err(ToolError::Blocked(format!(
                    "tool {name} is not available in {:?} mode",
                    self.mode
                )));
            }
            return Err(ToolError::UnknownTool(format!("no tool named {name}")));
        };

        tracing::debug!(tool = name, "calling tool");
        let result = tool.execute(args).await;
        if let Err(ref e) = result {
            tracing::debug!(tool = name, code = e.code(), "tool call failed");
        }
        result
    }

    /// Number of registered tools, regardless of mode.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check if a tool exists in the registry (regardless of mode).
    pub fn exists(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Check if a tool is registered but blocked by the current mode.
    pub fn is_blocked_by_mode(&self, name: &str) -> bool {
        self.tools
            .get(name)
            .map(|t| !t.allowed_in_mode(self.mode))
            .unwrap_or(false)
    }
}
