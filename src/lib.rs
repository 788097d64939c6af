//! Pterodactyl panel tools for automated agents.
//!
//! Exposes the panel's Application API as named tools and adds
//! discovery helpers (fuzzy search, compact listings, summaries, totals)
//! built on [`ptero_search`].
//!
//! # Architecture
//!
//! - **Tools**: the [`Tool`] trait, one implementation per API route plus
//!   the discovery tools, collected in a [`ToolRegistry`]
//! - **Stdio server**: newline-delimited JSON requests on stdin, one
//!   response line each on stdout ([`stdio`])
//! - **Panel client**: [`ptero_search::LazyPanelClient`], built on first
//!   use so tools can be listed without credentials
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ptero_tools::{ToolMode, build_registry};
//! use ptero_search::LazyPanelClient;
//!
//! # async fn run() -> Result<(), ptero_tools::ToolError> {
//! let registry = build_registry(Arc::new(LazyPanelClient::from_env()), ToolMode::ReadOnly);
//! let result = registry
//!     .call("ptero_ai_search_users", serde_json::json!({"query": "alice"}))
//!     .await?;
//! println!("{}", result.content);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod stdio;
pub mod tools;

pub use error::{Result, ToolError};
pub use stdio::{ToolRequest, ToolResponse, handle_line, run_stdio_server};
pub use tools::{Tool, ToolMode, ToolRegistry, ToolResult, build_registry};
