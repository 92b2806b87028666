//! # JSON-RPC 2.0 Envelopes
//!
//! Request and response envelopes exchanged with DID and DWN servers.
//!
//! Request ids are random UUIDs; they only need to be unique per call since every call
//! is a single request/response exchange.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 protocol version.
pub const JSON_RPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (always "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: String,
    /// Method name.
    pub method: String,
    /// Method parameters.
    pub params: Value,
}

impl JsonRpcRequest {
    /// Creates a new request envelope.
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Creates a new request envelope with a fresh random id.
    pub fn with_random_id(method: impl Into<String>, params: Value) -> Self {
        Self::new(random_request_id(), method, params)
    }
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request ID this response answers.
    #[serde(default)]
    pub id: Option<Value>,
    /// Result (present on success).
    #[serde(default)]
    pub result: Option<Value>,
    /// Error (present on failure).
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Parses a response envelope from text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parses a response envelope from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Splits the envelope into its outcome.
    ///
    /// An error object takes precedence over a result. An envelope with neither is
    /// answered with `Ok(Value::Null)`.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
    /// Additional error data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Parse error (-32700): Invalid JSON was received by the server.
    pub const PARSE_ERROR: i64 = -32700;

    /// Invalid request (-32600): The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i64 = -32600;

    /// Method not found (-32601): The method does not exist or is not available.
    pub const METHOD_NOT_FOUND: i64 = -32601;

    /// Invalid params (-32602): Invalid method parameter(s).
    pub const INVALID_PARAMS: i64 = -32602;

    /// Internal error (-32603): Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Creates an error with the given code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Generates a fresh random request id.
pub fn random_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
