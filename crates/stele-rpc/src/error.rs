//! JSON-RPC error codes and the gateway error type.

/// Parse error: the request body was not valid JSON.
pub const PARSE_ERROR: i64 = -32700;
/// The request envelope was not a valid JSON-RPC request.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// The parameters do not match what the method expects.
pub const INVALID_PARAMS: i64 = -32602;
/// The node failed internally while serving the request.
pub const INTERNAL_ERROR: i64 = -32603;

/// A structured JSON-RPC failure.
///
/// Carries the wire-level code so the dispatcher can render it straight
/// into the response error object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    /// JSON-RPC error code
    pub code: i64,
    /// Human-readable description
    pub message: String,
}

impl RpcError {
    /// The request body was not valid JSON.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: PARSE_ERROR,
            message: message.into(),
        }
    }

    /// The envelope was not a valid JSON-RPC request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: message.into(),
        }
    }

    /// The method is unknown.
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("method not found: {method}"),
        }
    }

    /// The parameters were malformed.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }

    /// The node failed internally.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.into(),
        }
    }
}
