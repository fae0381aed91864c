//! iOS Component Catalog MCP Server
//!
//! A Model Context Protocol server that answers questions about the iOS
//! component catalog and its upstream repository.
//!
//! # Usage
//!
//! ```bash
//! catalog-mcp [--root <path>] [--config <file>]
//! ```
//!
//! Without `--root`, the working copy is the git repository containing the
//! executable, or the executable's directory when it is not inside one.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `catalog_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::{Path, PathBuf};

use catalog_mcp::{CatalogMcpServer, ServerConfig};
use clap::Parser;

/// MCP server for the iOS component catalog
#[derive(Parser)]
#[command(name = "catalog-mcp")]
#[command(about = "MCP server for the iOS component catalog")]
#[command(version)]
struct Args {
    /// Working copy checked by check_updates
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Configuration file (default: <root>/.catalog-mcp.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let root = match args.root {
        Some(root) => root,
        None => default_root()?,
    };
    let config = ServerConfig::resolve(&root, args.config.as_deref())?;

    tracing::info!(root = ?root, base_url = %config.catalog.base_url, "Starting catalog-mcp server");

    let server = CatalogMcpServer::new(root, config);
    server.run().await?;

    Ok(())
}

/// The repository the installed binary lives in.
fn default_root() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();

    match catalog_git::discover_working_copy(&exe_dir) {
        Ok(root) => Ok(root),
        Err(e) => {
            tracing::debug!(dir = ?exe_dir, error = %e, "Executable not inside a working copy");
            Ok(exe_dir)
        }
    }
}
