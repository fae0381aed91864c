//! MCP Tool Handlers
//!
//! Each handler turns its own failures into text: network and remote errors
//! become error results, while not-found, no-match and update advisories are
//! ordinary results. Only malformed arguments and unknown tool names surface
//! as [`Error`] values, which the server renders as error results as well.

use std::path::Path;
use std::sync::Arc;

use catalog_client::{CatalogSource, HttpCatalog, search_components};
use catalog_git::{GitCli, UpdateCheckOptions, VcsBackend, compute_update_report};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::tools::{CHECK_UPDATES, GET_COMPONENT, LIST_COMPONENTS, SEARCH_COMPONENTS, ToolResult};
use crate::{Error, Result};

/// Collaborators shared by every tool call.
///
/// Holds no per-request state; cloning is cheap and concurrent calls never
/// observe each other.
#[derive(Clone)]
pub struct ToolContext {
    catalog: Arc<dyn CatalogSource>,
    vcs: Arc<dyn VcsBackend>,
    update_options: UpdateCheckOptions,
}

impl ToolContext {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        vcs: Arc<dyn VcsBackend>,
        update_options: UpdateCheckOptions,
    ) -> Self {
        Self {
            catalog,
            vcs,
            update_options,
        }
    }

    /// Build the production context: HTTP catalog plus `git` in `root`.
    pub fn from_config(root: &Path, config: &ServerConfig) -> Result<Self> {
        let catalog = HttpCatalog::new(&config.catalog.base_url, config.catalog_timeout())?;
        let vcs = GitCli::new(root).with_timeout(config.git_timeout());
        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(vcs),
            config.update_options(),
        ))
    }

    pub fn update_options(&self) -> &UpdateCheckOptions {
        &self.update_options
    }
}

/// Handle a tool call by dispatching to the appropriate handler
pub async fn handle_tool_call(
    ctx: &ToolContext,
    tool_name: &str,
    arguments: Value,
) -> Result<ToolResult> {
    tracing::debug!(tool = %tool_name, "Dispatching tool call");

    match tool_name {
        LIST_COMPONENTS => handle_list_components(ctx).await,
        GET_COMPONENT => handle_get_component(ctx, parse_args(tool_name, arguments)?).await,
        SEARCH_COMPONENTS => {
            handle_search_components(ctx, parse_args(tool_name, arguments)?).await
        }
        CHECK_UPDATES => handle_check_updates(ctx).await,
        _ => Err(Error::UnknownTool(tool_name.to_string())),
    }
}

/// Arguments for get_component
#[derive(Debug, Deserialize)]
struct GetComponentArgs {
    name: String,
}

/// Arguments for search_components
#[derive(Debug, Deserialize)]
struct SearchComponentsArgs {
    query: String,
}

/// Deserialize tool arguments, treating an absent arguments object as `{}`.
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Render an index fetch failure. A non-success status gets the same
/// wording from every tool; other failures are prefixed with `context`.
fn index_failure(context: &str, err: catalog_client::Error) -> ToolResult {
    tracing::warn!(error = %err, "Component index unavailable");
    match err {
        catalog_client::Error::RemoteUnavailable {
            status,
            status_text,
        } => ToolResult::error(
            format!("Failed to fetch component index: {status} {status_text}")
                .trim_end()
                .to_string(),
        ),
        other => ToolResult::error(format!("{context}: {other}")),
    }
}

/// Handle list_components - Return the index entries as JSON
async fn handle_list_components(ctx: &ToolContext) -> Result<ToolResult> {
    match ctx.catalog.fetch_index().await {
        Ok(index) => Ok(ToolResult::text(serde_json::to_string_pretty(
            &index.components,
        )?)),
        Err(e) => Ok(index_failure("Error fetching components", e)),
    }
}

/// Handle get_component - Return one component's spec document verbatim
async fn handle_get_component(ctx: &ToolContext, args: GetComponentArgs) -> Result<ToolResult> {
    match ctx.catalog.fetch_component_spec(&args.name).await {
        Ok(spec) => Ok(ToolResult::text(serde_json::to_string_pretty(&spec)?)),
        Err(catalog_client::Error::ComponentNotFound { name }) => Ok(ToolResult::text(format!(
            "Component \"{name}\" not found. Use {LIST_COMPONENTS} to see available components."
        ))),
        Err(e) => {
            tracing::warn!(component = %args.name, error = %e, "Component fetch failed");
            Ok(ToolResult::error(format!(
                "Error fetching component \"{}\": {e}",
                args.name
            )))
        }
    }
}

/// Handle search_components - Case-insensitive match on name and description
async fn handle_search_components(
    ctx: &ToolContext,
    args: SearchComponentsArgs,
) -> Result<ToolResult> {
    let index = match ctx.catalog.fetch_index().await {
        Ok(index) => index,
        Err(e) => return Ok(index_failure("Error searching components", e)),
    };

    let matches = search_components(&index, &args.query);
    tracing::debug!(query = %args.query, matches = matches.len(), "Searched components");

    if matches.is_empty() {
        return Ok(ToolResult::text(format!(
            "No components found matching \"{}\". Use {LIST_COMPONENTS} to see all available components.",
            args.query
        )));
    }

    Ok(ToolResult::text(serde_json::to_string_pretty(&matches)?))
}

/// Handle check_updates - Compare the working copy against upstream
async fn handle_check_updates(ctx: &ToolContext) -> Result<ToolResult> {
    let check = compute_update_report(ctx.vcs.as_ref(), &ctx.update_options).await;
    Ok(ToolResult::text(check.to_string()))
}
