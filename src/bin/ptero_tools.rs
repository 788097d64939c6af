//! Tool server binary for the Pterodactyl Application API.
//!
//! `serve` (the default) speaks newline-delimited JSON on stdin/stdout.
//! All tracing output goes to stderr so that stdout stays a clean
//! protocol channel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ptero_search::{LazyPanelClient, PanelConfig};
use ptero_tools::{ToolMode, build_registry, run_stdio_server};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Pterodactyl panel tools for automated agents.
#[derive(Parser)]
#[command(name = "ptero-tools", version, about)]
struct Cli {
    /// TOML file with panel_url, panel_token and optional client settings.
    /// Without it, PANEL_* environment variables (and `.env`) are used.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Only expose GET routes and the discovery tools.
    #[arg(long, global = true)]
    read_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve tool calls over stdin/stdout.
    Serve,

    /// Call one tool and print its output.
    Call {
        /// Tool name, e.g. `ptero_ai_search_users`.
        tool: String,

        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Print the schemas of the available tools.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ptero_tools=info,ptero_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let client = match cli.config {
        Some(path) => LazyPanelClient::new(move || PanelConfig::from_file(&path)),
        None => LazyPanelClient::from_env(),
    };
    let mode = if cli.read_only {
        ToolMode::ReadOnly
    } else {
        ToolMode::Full
    };
    let registry = build_registry(Arc::new(client), mode);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(tools = registry.list_available().len(), ?mode, "ptero-tools serving on stdio");
            let stdin = BufReader::new(tokio::io::stdin());
            run_stdio_server(&registry, stdin, tokio::io::stdout())
                .await
                .context("stdio server failed")?;
            tracing::info!("ptero-tools shut down cleanly");
        }
        Command::Call { tool, args } => {
            let args: serde_json::Value =
                serde_json::from_str(&args).context("--args must be valid JSON")?;
            let result = registry.call(&tool, args).await?;
            println!("{}", result.content);
            if result.truncated {
                tracing::warn!(tool = %tool, "output truncated");
            }
        }
        Command::List => {
            let schemas = registry.schemas();
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }
    Ok(())
}
