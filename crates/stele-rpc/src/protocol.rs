//! JSON-RPC 2.0 request/response envelopes.

use crate::error::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn jsonrpc_version() -> String {
    "2.0".to_string()
}

/// An incoming JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version; clients send "2.0"
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    /// Request id, echoed back verbatim (null for notifications)
    #[serde(default)]
    pub id: Value,
    /// Method name, e.g. `eth_blockNumber`
    pub method: String,
    /// Positional or named parameters
    #[serde(default)]
    pub params: Value,
}

/// The error member of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// JSON-RPC error code
    pub code: i64,
    /// Human-readable description
    pub message: String,
}

impl From<RpcError> for ErrorObject {
    fn from(err: RpcError) -> Self {
        Self {
            code: err.code,
            message: err.message,
        }
    }
}

/// An outgoing JSON-RPC response: exactly one of result/error is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Id of the request this answers
    pub id: Value,
    /// Successful result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Structured failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl RpcResponse {
    /// A successful response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(id: Value, err: RpcError) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id,
            result: None,
            error: Some(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_parses_without_params() {
        let req: RpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "method": "eth_accounts"}))
                .unwrap();
        assert_eq!(req.method, "eth_accounts");
        assert!(req.params.is_null());
    }

    #[test]
    fn success_omits_error_member() {
        let rendered =
            serde_json::to_value(RpcResponse::success(json!(7), json!("0x1"))).unwrap();
        assert_eq!(rendered["result"], json!("0x1"));
        assert!(rendered.get("error").is_none());
        assert_eq!(rendered["id"], json!(7));
    }

    #[test]
    fn failure_carries_code_and_message() {
        let rendered = serde_json::to_value(RpcResponse::failure(
            json!(1),
            RpcError::method_not_found("eth_mystery"),
        ))
        .unwrap();
        assert_eq!(rendered["error"]["code"], json!(-32601));
        assert!(rendered.get("result").is_none());
    }
}
