//! Newline-delimited JSON tool server.
//!
//! Each input line is a [`ToolRequest`]:
//!
//! ```json
//! {"id": 1, "tool": "ptero_ai_search_users", "args": {"query": "alice"}}
//! ```
//!
//! and produces exactly one [`ToolResponse`] line. The special tool name
//! [`LIST_TOOLS`] returns the schemas of every available tool instead of
//! calling one.
//!
//! Stdout is reserved for the protocol; all diagnostics go through
//! `tracing`, which the binary routes to stderr.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ToolError, error_codes};
use crate::tools::ToolRegistry;

/// Tool name that lists the available tools.
pub const LIST_TOOLS: &str = "tools/list";

/// One request line.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Echoed back unchanged; any JSON value.
    #[serde(default)]
    pub id: Value,
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

/// Error half of a [`ToolResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// One response line.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    fn error(id: Value, err: &ToolError) -> Self {
        Self::failure(id, err.code(), err.message())
    }

    fn failure(id: Value, code: &str, message: &str) -> Self {
        Self {
            id,
            ok: false,
            content: None,
            truncated: false,
            tools: None,
            error: Some(ErrorBody {
                code: code.to_owned(),
                message: message.to_owned(),
            }),
        }
    }
}

/// Answer one request line.
pub async fn handle_line(registry: &ToolRegistry, line: &str) -> ToolResponse {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse tool request");
            return ToolResponse::failure(
                Value::Null,
                error_codes::TOOL_VALIDATION,
                &format!("failed to parse request: {e}"),
            );
        }
    };

    if request.tool == LIST_TOOLS {
        return ToolResponse {
            id: request.id,
            ok: true,
            content: None,
            truncated: false,
            tools: Some(registry.schemas()),
            error: None,
        };
    }

    match registry.call(&request.tool, request.args).await {
        Ok(result) => ToolResponse {
            id: request.id,
            ok: true,
            content: Some(result.content),
            truncated: result.truncated,
            tools: None,
            error: None,
        },
        Err(e) => ToolResponse::error(request.id, &e),
    }
}

/// Serve requests from `reader` until EOF, one response line per request.
///
/// Blank lines are skipped. Requests are handled one at a time, in order.
///
/// # Errors
///
/// Returns the first I/O error on either stream.
pub async fn run_stdio_server<R, W>(
    registry: &ToolRegistry,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(registry, trimmed).await;
        let json = serde_json::to_string(&response).map_err(std::io::Error::other)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    tracing::info!("input closed; tool server stopping");
    Ok(())
}
