//! Core tool types.
//!
//! Defines the [`Tool`] trait that every panel tool implements and
//! [`ToolResult`] for capturing bounded execution output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Default maximum output size (100 KB).
pub const DEFAULT_MAX_BYTES: usize = 100 * 1024;

/// Tool execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    /// Only tools that cannot change panel state.
    ReadOnly,
    /// All tools enabled.
    #[default]
    Full,
}

/// Result of a successful tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Output content (bounded).
    pub content: String,
    /// Whether the output was truncated to fit within max_bytes.
    pub truncated: bool,
}

impl ToolResult {
    /// Create a tool result.
    pub fn success(content: String) -> Self {
        Self {
            content,
            truncated: false,
        }
    }

    /// Create a tool result with truncation applied.
    pub fn success_truncated(content: String) -> Self {
        Self {
            content,
            truncated: true,
        }
    }

    /// Render `value` as pretty JSON, bounded to `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Execution`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T, max_bytes: usize) -> Result<Self, ToolError> {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| ToolError::Execution(format!("failed to serialize output: {e}")))?;
        let (content, truncated) = truncate_output(&rendered, max_bytes);
        Ok(if truncated {
            Self::success_truncated(content)
        } else {
            Self::success(content)
        })
    }
}

/// Truncate a string to at most `max_bytes`, respecting UTF-8 boundaries.
///
/// Returns `(truncated_string, was_truncated)`.
pub fn truncate_output(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    let truncated = &s[..end];
    (
        format!("{truncated}\n\n[output truncated at {max_bytes} bytes]"),
        true,
    )
}

/// Core trait for panel tools.
///
/// All tools must be `Send + Sync` so one registry can serve concurrent
/// callers. The trait provides metadata (name, description, schema) and
/// an execution method that accepts JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool name (e.g. "ptero_ai_search_users").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's arguments.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns `ToolError` for validation and execution failures.
    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// Whether this tool is allowed in the given mode.
    ///
    /// Tools that only read (GET routes, discovery helpers) return true for
    /// both modes; tools that may change panel state only allow
    /// `ToolMode::Full`.
    fn allowed_in_mode(&self, mode: ToolMode) -> bool;
}
