// chain-porter-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: JSON-RPC 2.0 server over a single framed stdio session.
// Purpose: Expose Chain Porter tools via tools/list and tools/call.
// Dependencies: chain-porter-core, chain-porter-mcp::tools, serde_json
// ============================================================================

//! ## Overview
//! The MCP server serves JSON-RPC 2.0 over stdin/stdout with Content-Length
//! framing. Requests run strictly in arrival order on the session thread;
//! stdout carries only framed responses, so all logging goes to stderr. The
//! server is built only after bootstrap succeeds, and end of input is a clean
//! shutdown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::sync::Arc;

use chain_porter_clients::PinningClient;
use chain_porter_clients::WeatherClient;
use chain_porter_config::PorterConfig;
use chain_porter_core::ToolDefinition;
use chain_porter_store_sqlite::TextStore;
use chain_porter_store_sqlite::TextStoreConfig;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::audit::StderrAuditSink;
use crate::bootstrap::HttpBootstrap;
use crate::bootstrap::bootstrap;
use crate::tools::PorterTooling;
use crate::tools::ToolError;
use crate::tools::ToolRegistry;
use crate::tools::ToolRouter;
use crate::tools::register_porter_tools;

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: PorterConfig,
    /// Tool router for request dispatch.
    router: ToolRouter,
}

impl McpServer {
    /// Bootstraps the session and builds a ready server.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when configuration is invalid or any
    /// bootstrap step fails.
    pub fn from_config(config: PorterConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let session = bootstrap(&HttpBootstrap::new(config.clone()))
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let store = TextStore::new(TextStoreConfig {
            path: config.text_store.path.clone(),
            busy_timeout_ms: config.text_store.busy_timeout_ms,
        })
        .map_err(|err| McpServerError::Init(err.to_string()))?;
        let weather = WeatherClient::new(&config.weather)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let pinning = PinningClient::new(&config.pinning)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let tooling = PorterTooling {
            chain: session.chain,
            storage: session.storage,
            weather: Arc::new(weather),
            pinning: Arc::new(pinning),
            store: Arc::new(store),
        };
        let mut registry = ToolRegistry::new();
        register_porter_tools(&mut registry, &tooling);
        let router = ToolRouter::new(registry, Arc::new(StderrAuditSink));
        let _ = writeln!(
            std::io::stderr(),
            "chain-porter: session ready, {} files in working directory",
            session.initial_listing.files.len()
        );
        Ok(Self {
            config,
            router,
        })
    }

    /// Serves the stdio session until end of input.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the transport fails.
    pub fn serve(self) -> Result<(), McpServerError> {
        serve_stdio(&self.router, self.config.server.max_body_bytes)
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout until end of input.
fn serve_stdio(router: &ToolRouter, max_body_bytes: usize) -> Result<(), McpServerError> {
    let mut reader = BufReader::new(std::io::stdin());
    let mut writer = std::io::stdout();
    loop {
        let Some(bytes) = read_framed(&mut reader, max_body_bytes)? else {
            return Ok(());
        };
        let response = match serde_json::from_slice::<JsonRpcRequest>(&bytes) {
            Ok(request) => handle_request(router, request),
            Err(_) => JsonRpcResponse {
                jsonrpc: "2.0",
                id: Value::Null,
                result: None,
                error: Some(JsonRpcError {
                    code: -32600,
                    message: "invalid json-rpc request".to_string(),
                }),
            },
        };
        let payload = serde_json::to_vec(&response)
            .map_err(|_| McpServerError::Transport("json-rpc serialization failed".to_string()))?;
        write_framed(&mut writer, &payload)?;
    }
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
    #[serde(default = "empty_arguments")]
    arguments: Value,
}

/// Default arguments payload when the client omits the field.
fn empty_arguments() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Dispatches a JSON-RPC request to the tool router.
fn handle_request(router: &ToolRouter, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse {
            jsonrpc: "2.0",
            id: request.id,
            result: None,
            error: Some(JsonRpcError {
                code: -32600,
                message: "invalid json-rpc version".to_string(),
            }),
        };
    }
    match request.method.as_str() {
        "tools/list" => {
            let tools = router.list_tools();
            match serde_json::to_value(ToolListResult {
                tools,
            }) {
                Ok(value) => JsonRpcResponse {
                    jsonrpc: "2.0",
                    id: request.id,
                    result: Some(value),
                    error: None,
                },
                Err(_) => jsonrpc_error(request.id, &ToolError::Serialization),
            }
        }
        "tools/call" => {
            let id = request.id;
            let params = request.params.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolCallParams>(params) {
                Ok(call) => match router.handle_tool_call(&call.name, call.arguments) {
                    Ok(envelope) => match serde_json::to_value(envelope) {
                        Ok(value) => JsonRpcResponse {
                            jsonrpc: "2.0",
                            id,
                            result: Some(value),
                            error: None,
                        },
                        Err(_) => jsonrpc_error(id, &ToolError::Serialization),
                    },
                    Err(err) => jsonrpc_error(id, &err),
                },
                Err(_) => JsonRpcResponse {
                    jsonrpc: "2.0",
                    id,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32602,
                        message: "invalid tool params".to_string(),
                    }),
                },
            }
        }
        _ => JsonRpcResponse {
            jsonrpc: "2.0",
            id: request.id,
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: "method not found".to_string(),
            }),
        },
    }
}

/// Builds a JSON-RPC error response for a tool failure.
fn jsonrpc_error(id: Value, error: &ToolError) -> JsonRpcResponse {
    let (code, message) = match error {
        ToolError::UnknownTool => (-32601, "unknown tool".to_string()),
        ToolError::InvalidParams(message) => (-32602, message.clone()),
        ToolError::Serialization => (-32060, "serialization failed".to_string()),
        ToolError::Collaborator(message) => (-32020, message.clone()),
        ToolError::Internal(message) => (-32050, message.clone()),
    };
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
        }),
    }
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// Reads a framed stdio payload using MCP Content-Length headers.
///
/// End of input at a frame boundary yields `None` for clean shutdown.
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
            if content_length.is_none() {
                return Ok(None);
            }
            return Err(McpServerError::Transport("stdio closed mid-frame".to_string()));
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
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only framing and dispatch assertions."
    )]

    use std::io::BufReader;
    use std::io::Cursor;
    use std::sync::Arc;

    use chain_porter_core::tool_definitions;
    use serde_json::Value;
    use serde_json::json;

    use super::JsonRpcRequest;
    use super::handle_request;
    use super::read_framed;
    use super::write_framed;
    use crate::audit::NoopAuditSink;
    use crate::tools::ToolRegistry;
    use crate::tools::ToolRouter;

    /// Builds a router with one stubbed text_list tool.
    fn stub_router() -> ToolRouter {
        let definition =
            tool_definitions().into_iter().find(|def| def.name.as_str() == "text_list").unwrap();
        let mut registry = ToolRegistry::new();
        registry.register(definition, Box::new(|_| Ok("No texts saved".to_string())));
        ToolRouter::new(registry, Arc::new(NoopAuditSink))
    }

    /// Frames a payload the way a client would.
    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_framed(&mut out, payload).unwrap();
        out
    }

    #[test]
    fn read_framed_round_trips_written_frame() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let mut reader = BufReader::new(Cursor::new(frame(payload)));
        let bytes = read_framed(&mut reader, payload.len()).unwrap().unwrap();
        assert_eq!(bytes, payload);
    }

    #[test]
    fn read_framed_rejects_payload_over_limit() {
        let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let mut reader = BufReader::new(Cursor::new(frame(payload)));
        assert!(read_framed(&mut reader, payload.len() - 1).is_err());
    }

    #[test]
    fn read_framed_yields_none_at_end_of_input() {
        let mut reader = BufReader::new(Cursor::new(Vec::new()));
        assert!(read_framed(&mut reader, 1024).unwrap().is_none());
    }

    #[test]
    fn tools_list_returns_definitions() {
        let router = stub_router();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            method: "tools/list".to_string(),
            params: None,
        };
        let response = handle_request(&router, request);
        let result = response.result.unwrap();
        let tools = result.get("tools").and_then(Value::as_array).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].get("name").and_then(Value::as_str), Some("text_list"));
        assert!(tools[0].get("inputSchema").is_some());
    }

    #[test]
    fn tools_call_wraps_handler_text_in_envelope() {
        let router = stub_router();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(2),
            method: "tools/call".to_string(),
            params: Some(json!({"name": "text_list", "arguments": {}})),
        };
        let response = handle_request(&router, request);
        let result = response.result.unwrap();
        let content = result.get("content").and_then(Value::as_array).unwrap();
        assert_eq!(content[0].get("type").and_then(Value::as_str), Some("text"));
        assert_eq!(content[0].get("text").and_then(Value::as_str), Some("No texts saved"));
    }

    #[test]
    fn unknown_tool_maps_to_method_not_found_code() {
        let router = stub_router();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(3),
            method: "tools/call".to_string(),
            params: Some(json!({"name": "no_such_tool", "arguments": {}})),
        };
        let response = handle_request(&router, request);
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let router = stub_router();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(4),
            method: "resources/list".to_string(),
            params: None,
        };
        let response = handle_request(&router, request);
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let router = stub_router();
        let request = JsonRpcRequest {
            jsonrpc: "1.0".to_string(),
            id: json!(5),
            method: "tools/list".to_string(),
            params: None,
        };
        let response = handle_request(&router, request);
        assert_eq!(response.error.unwrap().code, -32600);
    }
}
