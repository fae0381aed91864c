//! MCP Server implementation
//!
//! The main server struct that coordinates MCP protocol handling
//! with the component catalog tools.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::ServerConfig;
use crate::handlers::{ToolContext, handle_tool_call};
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability, error_codes,
};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "ios-components";

/// Lifecycle of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Tools not yet registered; only construction has happened
    Initializing,
    /// Accepting and dispatching requests
    Serving,
}

/// MCP Server for the component catalog
///
/// Reads newline-delimited JSON-RPC requests, handles each one on its own
/// task, and writes one JSON line per response. Responses may therefore
/// arrive in a different order than requests; clients match them by `id`.
///
/// # Example
///
/// ```ignore
/// use catalog_mcp::{CatalogMcpServer, ServerConfig};
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = CatalogMcpServer::new(PathBuf::from("."), ServerConfig::default());
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct CatalogMcpServer {
    /// Working copy inspected by `check_updates`
    root: PathBuf,

    config: ServerConfig,

    state: ServerState,

    /// Collaborators for tool handlers, built during initialization unless
    /// supplied up front
    context: Option<ToolContext>,

    /// Registered MCP tools
    tools: Vec<ToolDefinition>,
}

impl CatalogMcpServer {
    /// Create a new MCP server instance
    ///
    /// # Arguments
    ///
    /// * `root` - Working copy used for update checks
    /// * `config` - Catalog and update-check settings
    pub fn new(root: PathBuf, config: ServerConfig) -> Self {
        Self {
            root,
            config,
            state: ServerState::Initializing,
            context: None,
            tools: Vec::new(),
        }
    }

    /// Create a server around an existing tool context instead of building
    /// one from configuration.
    pub fn with_context(root: PathBuf, context: ToolContext) -> Self {
        Self {
            context: Some(context),
            ..Self::new(root, ServerConfig::default())
        }
    }

    /// Initialize the server
    ///
    /// Builds the HTTP catalog client and git backend (unless a context was
    /// supplied) and registers the tool definitions.
    pub async fn initialize(&mut self) -> Result<()> {
        tracing::info!(root = ?self.root, "Initializing MCP server");

        if self.context.is_none() {
            self.context = Some(ToolContext::from_config(&self.root, &self.config)?);
        }
        self.tools = get_tool_definitions();
        self.state = ServerState::Serving;

        tracing::debug!(tools = self.tools.len(), "Registered tools");
        Ok(())
    }

    /// Run the MCP server
    ///
    /// Initializes, then processes MCP protocol messages over stdin/stdout
    /// until stdin closes.
    pub async fn run(mut self) -> Result<()> {
        self.initialize().await?;

        tracing::info!("MCP server ready, listening on stdio");

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        Arc::new(self).serve(stdin, tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, writing responses
    /// to `writer`.
    ///
    /// Returns after `reader` reaches EOF and every in-flight request has
    /// written its response.
    pub async fn serve<R, W>(self: Arc<Self>, mut reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut tasks = JoinSet::new();
        let mut buf = Vec::new();

        // A line that is not UTF-8 gets a parse error and the session continues
        loop {
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let line = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding line that is not UTF-8");
                    let _ = tx.send(parse_error_response(&e));
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!(request = %line.trim_end(), "Received message");

            let server = Arc::clone(&self);
            let tx = tx.clone();
            tasks.spawn(async move {
                let response = match server.handle_message(&line).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to handle message");
                        internal_error_response(&e)
                    }
                };
                if !response.is_empty() {
                    // The writer only goes away once every sender is dropped
                    let _ = tx.send(response);
                }
            });

            while tasks.try_join_next().is_some() {}
        }

        tracing::info!("stdin closed, draining in-flight requests");
        while tasks.join_next().await.is_some() {}
        drop(tx);

        writer_task
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Parses the JSON-RPC request and dispatches to the appropriate handler.
    ///
    /// # Returns
    ///
    /// The JSON-RPC response as a string, or empty string for notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let raw: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                return Ok(parse_error_response(&e));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = raw.get("id").filter(|id| !id.is_null()).cloned();
                let response = JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                );
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        if request.method == "initialized" || request.method.starts_with("notifications/") {
            return Ok(String::new());
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id)?,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ if request.is_notification() => return Ok(String::new()),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info. Client details are only logged;
    /// a client that omits them is still served.
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        match serde_json::from_value::<InitializeParams>(params) {
            Ok(params) => tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol_version = %params.protocol_version,
                "Client connected"
            ),
            Err(e) => tracing::debug!(error = %e, "Initialize without client details"),
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> Result<JsonRpcResponse> {
        Ok(JsonRpcResponse::success(
            id,
            json!({ "tools": serde_json::to_value(&self.tools)? }),
        ))
    }

    /// Handle tools/call request
    ///
    /// Executes the requested tool. Tool failures are reported inside a
    /// successful response so the caller always receives readable text.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };

        let context = self.context.as_ref().ok_or(Error::NotInitialized)?;

        let tool_result =
            match handle_tool_call(context, &tool_params.name, tool_params.arguments).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(tool = %tool_params.name, error = %e, "Tool call rejected");
                    ToolResult::error(e.to_string())
                }
            };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }

    /// Get the working-copy root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Check if the server is initialized
    pub fn is_initialized(&self) -> bool {
        self.state == ServerState::Serving
    }

    /// Get registered tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }
}

fn parse_error_response(err: &dyn std::fmt::Display) -> String {
    let response =
        JsonRpcResponse::error(None, error_codes::PARSE_ERROR, format!("Parse error: {err}"));
    serde_json::to_string(&response).unwrap_or_default()
}

fn internal_error_response(err: &Error) -> String {
    let response = JsonRpcResponse::error(
        None,
        error_codes::INTERNAL_ERROR,
        format!("Internal error: {err}"),
    );
    serde_json::to_string(&response).unwrap_or_default()
}

/// Write each response as one line, flushing after every message.
async fn write_responses<W>(mut rx: mpsc::UnboundedReceiver<String>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    writer.shutdown().await?;
    Ok(())
}
