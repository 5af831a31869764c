//! JSON-RPC 2.0 tool protocol
//!
//! # Protocol Overview
//!
//! - `initialize` → server info and capabilities
//! - `ping` → `{}`
//! - `tools/list` → every registered operation as `{name, description, inputSchema}`
//! - `tools/call` → dispatch; the result object is returned as a text block
//! - `notifications/*` → no response
//!
//! A failed dispatch is still a successful JSON-RPC exchange: the tool result
//! carries `isError: true` and the structured error payload. JSON-RPC errors
//! are reserved for malformed requests.

use std::sync::Arc;

use anf_application::{OperationRegistry, OperationSchemaPort};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// JSON-RPC request or notification (no `id`)
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

/// JSON-RPC response
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// `tools/call` parameters
#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Tool protocol handler over the operation registry
pub struct ToolServer {
    registry: Arc<OperationRegistry>,
    schema: Arc<dyn OperationSchemaPort>,
    name: String,
    version: String,
}

impl ToolServer {
    pub fn new(registry: Arc<OperationRegistry>, schema: Arc<dyn OperationSchemaPort>) -> Self {
        Self {
            registry,
            schema,
            name: "anf-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Handle one line of input; `None` when no response is due
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => {
                warn!("Failed to parse JSON-RPC message: {}", e);
                Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ))
            }
            Ok(value) => {
                let id = value.get("id").cloned();
                match serde_json::from_value::<JsonRpcRequest>(value) {
                    Ok(request) => self.handle(request).await,
                    Err(e) => Some(JsonRpcResponse::failure(
                        id.unwrap_or(Value::Null),
                        INVALID_REQUEST,
                        format!("Invalid request: {}", e),
                    )),
                }
            }
        };

        response.and_then(|response| match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                None
            }
        })
    }

    /// Handle a parsed request; notifications never get a response
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return request.id.map(|id| {
                JsonRpcResponse::failure(id, INVALID_REQUEST, "jsonrpc must be \"2.0\"")
            });
        }

        let Some(id) = request.id else {
            debug!("Notification: {}", request.method);
            if request.method == "notifications/initialized" {
                info!("Client initialized");
            }
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.list_tools()),
            "tools/call" => {
                let params = request
                    .params
                    .map(serde_json::from_value::<CallParams>)
                    .transpose();
                match params {
                    Ok(Some(params)) => {
                        JsonRpcResponse::success(id, self.call_tool(params).await)
                    }
                    Ok(None) => JsonRpcResponse::failure(
                        id,
                        INVALID_PARAMS,
                        "tools/call requires params",
                    ),
                    Err(e) => JsonRpcResponse::failure(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid tools/call params: {}", e),
                    ),
                }
            }
            method => {
                debug!("Unknown method: {}", method);
                JsonRpcResponse::failure(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                )
            }
        };
        Some(response)
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.name,
                "version": self.version,
            },
            "capabilities": {
                "tools": {"listChanged": false},
            },
        })
    }

    fn list_tools(&self) -> Value {
        json!({ "tools": self.schema.all_tools(self.registry.spec()) })
    }

    async fn call_tool(&self, params: CallParams) -> Value {
        info!("tools/call {}", params.name);
        let (payload, is_error) = match self.registry.dispatch(&params.name, params.arguments).await {
            Ok(outcome) => {
                let is_error = !outcome.is_success() && !outcome.is_placeholder();
                (outcome.to_json(), is_error)
            }
            Err(e) => {
                warn!("{} failed: {}", params.name, e);
                (e.to_result_json(), true)
            }
        };

        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        json!({
            "content": [{"type": "text", "text": text}],
            "isError": is_error,
        })
    }
}
