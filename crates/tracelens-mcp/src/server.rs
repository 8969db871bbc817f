// crates/tracelens-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio and HTTP transports.
// Purpose: Expose TraceLens tools via JSON-RPC 2.0.
// Dependencies: axum, tokio, tracelens-client, tracelens-config
// ============================================================================

//! ## Overview
//! The MCP server exposes TraceLens tools using JSON-RPC 2.0. It supports
//! stdio and HTTP transports and always routes calls through
//! [`crate::tools::ToolRouter`]. Request bodies are size-limited on both
//! transports, and HTTP callers pass through the configured auth policy
//! before any dispatch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::routing::post;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracelens_client::ApiClient;
use tracelens_config::ServerTransport;
use tracelens_config::TracelensConfig;

use crate::audit::StderrAuditSink;
use crate::auth::RequestContext;
use crate::auth::ServerAuthPolicy;
use crate::telemetry::McpMethod;
use crate::telemetry::McpMetricEvent;
use crate::telemetry::McpMetrics;
use crate::telemetry::McpOutcome;
use crate::telemetry::NoopMetrics;
use crate::tooling::ToolDefinition;
use crate::tooling::ToolName;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: TracelensConfig,
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Auth policy applied to HTTP callers.
    policy: ServerAuthPolicy,
    /// Metrics sink for request events.
    metrics: Arc<dyn McpMetrics>,
}

impl McpServer {
    /// Builds a new MCP server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when validation or client setup fails.
    pub fn from_config(config: TracelensConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let client = ApiClient::from_config(&config.api)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let router = ToolRouter::new(Arc::new(client), Arc::new(StderrAuditSink));
        let policy = ServerAuthPolicy::from_config(config.server.auth.as_ref());
        emit_local_only_warning(&policy, config.server.transport);
        Ok(Self {
            config,
            router,
            policy,
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn McpMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        let max_body_bytes = self.config.server.max_body_bytes;
        match self.config.server.transport {
            ServerTransport::Stdio => serve_stdio(&self.router, &self.metrics, max_body_bytes),
            ServerTransport::Http => serve_http(self.config, self.router, self.policy, self.metrics).await,
        }
    }
}

/// Warns when the HTTP transport runs without explicit auth.
fn emit_local_only_warning(policy: &ServerAuthPolicy, transport: ServerTransport) {
    if transport == ServerTransport::Http && policy.is_local_only() {
        let _ = writeln!(
            std::io::stderr(),
            "tracelens-mcp: WARNING: http transport running without auth; configure \
             server.auth to enable bearer_token"
        );
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout until EOF.
fn serve_stdio(
    router: &ToolRouter,
    metrics: &Arc<dyn McpMetrics>,
    max_body_bytes: usize,
) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(std::io::stdin());
    let mut writer = std::io::stdout();
    loop {
        let Some(bytes) = read_framed(&mut reader, max_body_bytes)? else {
            return Ok(());
        };
        let response =
            process_payload(router, metrics, ServerTransport::Stdio, max_body_bytes, &bytes).1;
        let payload = serde_json::to_vec(&response)
            .map_err(|_| McpServerError::Transport("json-rpc serialization failed".to_string()))?;
        write_framed(&mut writer, &payload)?;
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Shared server state for HTTP handlers.
#[derive(Clone)]
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Auth policy applied to every request.
    policy: ServerAuthPolicy,
    /// Metrics sink for request events.
    metrics: Arc<dyn McpMetrics>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Serves JSON-RPC requests over HTTP.
async fn serve_http(
    config: TracelensConfig,
    router: ToolRouter,
    policy: ServerAuthPolicy,
    metrics: Arc<dyn McpMetrics>,
) -> Result<(), McpServerError> {
    let bind = config
        .server
        .bind
        .as_ref()
        .ok_or_else(|| McpServerError::Config("bind address required".to_string()))?;
    let addr: SocketAddr =
        bind.parse().map_err(|_| McpServerError::Config("invalid bind address".to_string()))?;
    let state = Arc::new(ServerState {
        router,
        policy,
        metrics,
        max_body_bytes: config.server.max_body_bytes,
    });
    let app = Router::new().route("/rpc", post(handle_http)).with_state(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Handles HTTP JSON-RPC requests.
async fn handle_http(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> impl IntoResponse {
    let auth_header =
        headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_string);
    let context = RequestContext::http(Some(peer.ip()), auth_header.as_deref());
    if let Err(err) = state.policy.authorize(&context) {
        let response = JsonRpcResponse {
            jsonrpc: "2.0",
            id: Value::Null,
            result: None,
            error: Some(JsonRpcError {
                code: -32001,
                message: err.to_string(),
            }),
        };
        return (StatusCode::UNAUTHORIZED, axum::Json(response));
    }
    let (status, response) = process_payload(
        &state.router,
        &state.metrics,
        ServerTransport::Http,
        state.max_body_bytes,
        bytes.as_ref(),
    );
    (status, axum::Json(response))
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier.
    id: Value,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// JSON tool output.
    Json {
        /// JSON payload.
        json: Value,
    },
}

/// Parses a payload, dispatches it, and records one metric event.
fn process_payload(
    router: &ToolRouter,
    metrics: &Arc<dyn McpMetrics>,
    transport: ServerTransport,
    max_body_bytes: usize,
    bytes: &[u8],
) -> (StatusCode, JsonRpcResponse) {
    let started = Instant::now();
    let (status, method, tool, response) = if bytes.len() > max_body_bytes {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            McpMethod::Invalid,
            None,
            JsonRpcResponse {
                jsonrpc: "2.0",
                id: Value::Null,
                result: None,
                error: Some(JsonRpcError {
                    code: -32070,
                    message: "request body too large".to_string(),
                }),
            },
        )
    } else {
        match serde_json::from_slice::<JsonRpcRequest>(bytes) {
            Ok(request) => handle_request(router, request),
            Err(_) => (
                StatusCode::BAD_REQUEST,
                McpMethod::Invalid,
                None,
                JsonRpcResponse {
                    jsonrpc: "2.0",
                    id: Value::Null,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32600,
                        message: "invalid json-rpc request".to_string(),
                    }),
                },
            ),
        }
    };
    let outcome = if response.error.is_some() { McpOutcome::Error } else { McpOutcome::Ok };
    metrics.record(&McpMetricEvent {
        method,
        tool,
        transport,
        outcome,
        duration: started.elapsed(),
    });
    (status, response)
}

/// Dispatches a JSON-RPC request to the tool router.
fn handle_request(
    router: &ToolRouter,
    request: JsonRpcRequest,
) -> (StatusCode, McpMethod, Option<ToolName>, JsonRpcResponse) {
    if request.jsonrpc != "2.0" {
        return (
            StatusCode::BAD_REQUEST,
            McpMethod::Invalid,
            None,
            JsonRpcResponse {
                jsonrpc: "2.0",
                id: request.id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32600,
                    message: "invalid json-rpc version".to_string(),
                }),
            },
        );
    }
    match request.method.as_str() {
        "tools/list" => {
            let tools = router.list_tools();
            match serde_json::to_value(ToolListResult {
                tools,
            }) {
                Ok(value) => (
                    StatusCode::OK,
                    McpMethod::ToolsList,
                    None,
                    JsonRpcResponse {
                        jsonrpc: "2.0",
                        id: request.id,
                        result: Some(value),
                        error: None,
                    },
                ),
                Err(_) => {
                    let (status, response) = jsonrpc_error(request.id, &ToolError::Serialization);
                    (status, McpMethod::ToolsList, None, response)
                }
            }
        }
        "tools/call" => {
            let id = request.id;
            let params = request.params.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolCallParams>(params) {
                Ok(call) => {
                    let tool = ToolName::parse(&call.name);
                    match call_tool_with_blocking(router, &call.name, call.arguments) {
                        Ok(result) => match serde_json::to_value(ToolCallResult {
                            content: vec![ToolContent::Json {
                                json: result,
                            }],
                        }) {
                            Ok(value) => (
                                StatusCode::OK,
                                McpMethod::ToolsCall,
                                tool,
                                JsonRpcResponse {
                                    jsonrpc: "2.0",
                                    id,
                                    result: Some(value),
                                    error: None,
                                },
                            ),
                            Err(_) => {
                                let (status, response) =
                                    jsonrpc_error(id, &ToolError::Serialization);
                                (status, McpMethod::ToolsCall, tool, response)
                            }
                        },
                        Err(err) => {
                            let (status, response) = jsonrpc_error(id, &err);
                            (status, McpMethod::ToolsCall, tool, response)
                        }
                    }
                }
                Err(_) => (
                    StatusCode::BAD_REQUEST,
                    McpMethod::ToolsCall,
                    None,
                    JsonRpcResponse {
                        jsonrpc: "2.0",
                        id,
                        result: None,
                        error: Some(JsonRpcError {
                            code: -32602,
                            message: "invalid tool params".to_string(),
                        }),
                    },
                ),
            }
        }
        _ => (
            StatusCode::BAD_REQUEST,
            McpMethod::Other,
            None,
            JsonRpcResponse {
                jsonrpc: "2.0",
                id: request.id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32601,
                    message: "method not found".to_string(),
                }),
            },
        ),
    }
}

/// Executes a tool call, shifting to a blocking context when available.
fn call_tool_with_blocking(
    router: &ToolRouter,
    name: &str,
    arguments: Value,
) -> Result<Value, ToolError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| router.handle_tool_call(name, arguments))
        }
        _ => router.handle_tool_call(name, arguments),
    }
}

/// Builds a JSON-RPC error response for a tool failure.
fn jsonrpc_error(id: Value, error: &ToolError) -> (StatusCode, JsonRpcResponse) {
    let (status, code, message) = match error {
        ToolError::UnknownTool => (StatusCode::BAD_REQUEST, -32601, "unknown tool".to_string()),
        ToolError::Unauthenticated(message) => {
            (StatusCode::UNAUTHORIZED, -32001, message.clone())
        }
        ToolError::InvalidParams(message) => (StatusCode::BAD_REQUEST, -32602, message.clone()),
        ToolError::Serialization => (StatusCode::OK, -32060, "serialization failed".to_string()),
        ToolError::Internal(message) => (StatusCode::OK, -32050, message.clone()),
    };
    (
        status,
        JsonRpcResponse {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
            }),
        },
    )
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// Reads a framed stdio payload using MCP Content-Length headers.
///
/// Returns `None` on a clean EOF before any header line.
fn read_framed(
    reader: &mut BufReader<impl Read>,
    max_body_bytes: usize,
) -> Result<Option<Vec<u8>>, McpServerError> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            if content_length.is_some() {
                return Err(McpServerError::Transport("stdio closed mid-frame".to_string()));
            }
            return Ok(None);
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Length:") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| McpServerError::Transport("invalid content length".to_string()))?;
            content_length = Some(parsed);
        }
    }
    let len = content_length
        .ok_or_else(|| McpServerError::Transport("missing content length".to_string()))?;
    if len > max_body_bytes {
        return Err(McpServerError::Transport("payload too large".to_string()));
    }
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    Ok(Some(buf))
}

/// Writes a framed stdio payload using MCP Content-Length headers.
fn write_framed(writer: &mut impl Write, payload: &[u8]) -> Result<(), McpServerError> {
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer
        .write_all(payload)
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))?;
    writer.flush().map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
