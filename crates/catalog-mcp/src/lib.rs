//! MCP Server for the iOS component catalog
//!
//! This crate exposes a published catalog of iOS UIKit components via the
//! Model Context Protocol (MCP), so coding assistants can discover
//! components, read their specifications, and learn when the catalog's
//! source repository has moved ahead of the local checkout.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (IDE / assistant) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ catalog-mcp (MCP Server) ]
//!        |
//!        +--> [ catalog-client ] --HTTP--> [ specs/index.json, specs/components/*.json ]
//!        +--> [ catalog-git ]    --git-->  [ local working copy vs. origin/main ]
//! ```
//!
//! # Tools
//!
//! - `list_components` - every entry of the catalog index
//! - `get_component` - one component's full specification
//! - `search_components` - case-insensitive keyword search
//! - `check_updates` - upstream commits and the component files they touch

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{CatalogConfig, ServerConfig, UpdatesConfig};
pub use error::{Error, Result};
pub use handlers::{ToolContext, handle_tool_call};
pub use server::{CatalogMcpServer, SERVER_NAME, ServerState};
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
