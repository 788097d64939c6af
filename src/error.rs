//! Error types for the tool layer.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`ToolError::code()`].
//! Codes are part of the tool protocol and will not change.

use ptero_search::SearchError;

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Tool arguments are missing, mistyped or not allowed.
    pub const TOOL_VALIDATION: &str = "TOOL_VALIDATION";

    /// Tool execution failed for a reason other than the panel.
    pub const TOOL_FAILED: &str = "TOOL_FAILED";

    /// No tool is registered under the requested name.
    pub const UNKNOWN_TOOL: &str = "UNKNOWN_TOOL";

    /// The tool exists but the current tool mode hides it.
    pub const TOOL_BLOCKED: &str = "TOOL_BLOCKED";

    /// Invalid or missing panel configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// The panel request failed (network fault or error status).
    pub const PANEL_ERROR: &str = "PANEL_ERROR";
}

/// Errors produced while calling a tool.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool arguments are missing, mistyped or not allowed.
    #[error("[{}] {}", error_codes::TOOL_VALIDATION, .0)]
    Validation(String),

    /// Tool execution failed for a reason other than the panel.
    #[error("[{}] {}", error_codes::TOOL_FAILED, .0)]
    Execution(String),

    /// No tool is registered under the requested name.
    #[error("[{}] {}", error_codes::UNKNOWN_TOOL, .0)]
    UnknownTool(String),

    /// The tool exists but the current tool mode hides it.
    #[error("[{}] {}", error_codes::TOOL_BLOCKED, .0)]
    Blocked(String),

    /// Invalid or missing panel configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// The panel request failed.
    #[error("[{}] {}", error_codes::PANEL_ERROR, .0)]
    Panel(String),
}

impl ToolError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => error_codes::TOOL_VALIDATION,
            Self::Execution(_) => error_codes::TOOL_FAILED,
            Self::UnknownTool(_) => error_codes::UNKNOWN_TOOL,
            Self::Blocked(_) => error_codes::TOOL_BLOCKED,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Panel(_) => error_codes::PANEL_ERROR,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::Execution(m)
            | Self::UnknownTool(m)
            | Self::Blocked(m)
            | Self::Config(m)
            | Self::Panel(m) => m,
        }
    }
}

impl From<SearchError> for ToolError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidInput(m) => Self::Validation(m),
            SearchError::Config(m) => Self::Config(m),
            e @ (SearchError::Http(_) | SearchError::Api { .. }) => Self::Panel(e.to_string()),
        }
    }
}

/// Convenience alias for tool results.
pub type Result<T> = std::result::Result<T, ToolError>;
