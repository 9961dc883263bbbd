//! MCP server: method dispatch and the session loop.
//!
//! Requests are handled strictly one at a time, in input order. Each line is
//! decoded, dispatched and answered (or deliberately not answered) before the
//! next line is read, so responses come out in request order. Nothing is
//! carried from one request to the next except the immutable tool catalog.

use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::mcp::protocol::{
    parse_message, JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method, MCP_PROTOCOL_VERSION,
    SERVER_NAME,
};
use crate::mcp::transport::{StdioTransport, Transport};
use crate::plate::normalize;
use crate::rdw::{DataFetcher, ResultAggregator, ToolCatalog};

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters for a `call_tool` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call itself failed. "No data" is not a failure.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// The text of the first content item.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|ToolContent::Text { text }| text.as_str())
    }
}

/// What the dispatcher decided to do with one request.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// Write a success response.
    Response(JsonRpcResponse),
    /// Write a protocol-level error response.
    Error(JsonRpcError),
    /// The method is not handled; nothing is written.
    Ignored {
        /// The method name as received.
        method: String,
    },
}

/// The MCP server for RDW vehicle lookups.
pub struct McpServer {
    /// Tool registry, fixed for the lifetime of the server.
    catalog: ToolCatalog,
    /// Resolves tools against the data provider.
    aggregator: ResultAggregator,
}

impl McpServer {
    /// Creates a server that fetches through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn DataFetcher>) -> Self {
        Self {
            catalog: ToolCatalog::new(),
            aggregator: ResultAggregator::new(fetcher),
        }
    }

    /// Returns the tool catalog.
    #[must_use]
    pub const fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Runs the session over stdio with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&self) -> io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(io::Error::other)?;

        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating graceful shutdown");
                Ok(())
            }

            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
                Ok(())
            }

            result = self.serve(transport) => result,
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> io::Result<()> {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                Ok(())
            }

            result = self.serve(transport) => result,
        }
    }

    /// Processes lines from `transport` until end of stream.
    ///
    /// A bad or failing request never ends the session; only an I/O error on
    /// the transport itself does.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the transport fails.
    pub async fn serve<R, W>(&self, transport: &mut Transport<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = transport.read_line().await? {
            match self.handle_line(&line).await {
                Some(Dispatch::Response(response)) => transport.write_response(&response).await?,
                Some(Dispatch::Error(error)) => transport.write_error(&error).await?,
                Some(Dispatch::Ignored { method }) => {
                    tracing::debug!(method = %method, "Ignoring unhandled method");
                }
                None => {}
            }
        }

        tracing::info!("Input closed, ending session");
        Ok(())
    }

    /// Decodes and dispatches one input line.
    ///
    /// Returns `None` for blank lines and lines that cannot be decoded; the
    /// latter are logged at `error`, which even `--quiet` keeps.
    pub async fn handle_line(&self, line: &str) -> Option<Dispatch> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(request) => Some(self.dispatch(request).await),
            Err(e) => {
                tracing::error!(error = %e, "Skipping undecodable input line");
                None
            }
        }
    }

    /// Handles one decoded request.
    pub async fn dispatch(&self, req: JsonRpcRequest) -> Dispatch {
        match req.method() {
            Method::Initialize => Dispatch::Response(Self::handle_initialize(&req)),
            Method::ListTools => self.handle_list_tools(&req),
            Method::CallTool => self.handle_call_tool(&req).await,
            Method::Other(method) => Dispatch::Ignored { method },
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
        let client = req
            .params
            .as_ref()
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(Value::as_str);
        tracing::info!(client, "Client initialising");

        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the `list_tools` request.
    fn handle_list_tools(&self, req: &JsonRpcRequest) -> Dispatch {
        let result = json!({
            "tools": self.catalog.list(),
        });

        Dispatch::Response(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the `call_tool` request.
    async fn handle_call_tool(&self, req: &JsonRpcRequest) -> Dispatch {
        let params = match Self::tool_call_params(req) {
            Ok(params) => params,
            Err(error) => return Dispatch::Error(error),
        };

        let result = self.call_tool(&params.name, &params.arguments).await;

        match serde_json::to_value(&result) {
            Ok(value) => Dispatch::Response(JsonRpcResponse::success(req.id.clone(), value)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialise tool call result");
                Dispatch::Error(JsonRpcError::internal_error(
                    req.id.clone(),
                    "Internal error: failed to serialise result",
                ))
            }
        }
    }

    fn tool_call_params(req: &JsonRpcRequest) -> Result<ToolCallParams, JsonRpcError> {
        let params = req
            .params
            .clone()
            .ok_or_else(|| JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params"))?;

        serde_json::from_value(params).map_err(|e| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Invalid tool call params: {e}"))
        })
    }

    /// Invokes a tool by name.
    ///
    /// Always yields exactly one text item. Unknown tools and a missing
    /// `kenteken` argument are error-flagged; provider failures are not.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> ToolCallResult {
        let Some(tool) = self.catalog.resolve(name) else {
            tracing::warn!(tool = name, "Unknown tool requested");
            return ToolCallResult::error(format!("Tool niet gevonden: {name}"));
        };

        let Some(raw) = arguments.get("kenteken").and_then(Value::as_str) else {
            return ToolCallResult::error("Kenteken is verplicht");
        };

        let kenteken = normalize(raw);
        tracing::info!(tool = tool.name, %kenteken, "Calling tool");

        let outcome = self.aggregator.resolve_tool(tool, &kenteken).await;
        match outcome.render(tool) {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                tracing::error!(tool = tool.name, error = %e, "Failed to render tool result");
                ToolCallResult::error(format!("Fout bij het opmaken van het resultaat: {e}"))
            }
        }
    }
}
