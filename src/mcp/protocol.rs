//! JSON-RPC 2.0 message types for the MCP protocol.
//!
//! Incoming lines are decoded leniently: any JSON object with a string
//! `method` is a request. The `jsonrpc` field is not checked and a missing
//! `id` is treated as `null`, which is echoed back verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "rdw-vehicle-mcp";

/// A JSON-RPC request ID.
///
/// Opaque: whatever the client sent (number, string, `null`, ...) is echoed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Value);

impl From<i32> for RequestId {
    fn from(n: i32) -> Self {
        Self(Value::from(n))
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(Value::from(s))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// The methods the server understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `initialize`.
    Initialize,
    /// `list_tools` (alias `tools/list`).
    ListTools,
    /// `call_tool` (alias `tools/call`).
    CallTool,
    /// Anything else. Never answered.
    Other(String),
}

impl Method {
    /// Classifies a method name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "initialize" => Self::Initialize,
            "list_tools" | "tools/list" => Self::ListTools,
            "call_tool" | "tools/call" => Self::CallTool,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A decoded JSON-RPC request.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Request identifier, `null` when absent.
    pub id: RequestId,

    /// The method to invoke.
    pub method: String,

    /// Optional parameters for the method.
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request with the given id, method and params.
    #[must_use]
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Returns the classified method.
    #[must_use]
    pub fn method(&self) -> Method {
        Method::parse(&self.method)
    }
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

/// JSON-RPC 2.0 error codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to.
    pub id: RequestId,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: RequestId, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            error,
        }
    }

    /// Creates an invalid params error response.
    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(id, JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message))
    }

    /// Creates an internal error response.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(id, JsonRpcErrorData::with_message(ErrorCode::InternalError, message))
    }
}

/// Decodes one input line into a request.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the line is not JSON, not an object, or has
/// no string `method`.
pub fn parse_message(line: &str) -> Result<JsonRpcRequest, DecodeError> {
    let value: Value = serde_json::from_str(line)?;

    let Value::Object(mut obj) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let Some(Value::String(method)) = obj.remove("method") else {
        return Err(DecodeError::MissingMethod);
    };

    Ok(JsonRpcRequest {
        id: RequestId(obj.remove("id").unwrap_or(Value::Null)),
        method,
        params: obj.remove("params"),
    })
}
