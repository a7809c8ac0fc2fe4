//! JSON-RPC 2.0 error object, in the teacher's `perl-lsp-protocol` shape.

use serde::Serialize;
use serde_json::Value;

/// Request was cancelled by the client (LSP-reserved code).
pub const REQUEST_CANCELLED: i32 = -32800;
/// `RenameError::IllegalRename` (server-defined range).
pub const ILLEGAL_RENAME: i32 = -32001;
/// `RenameError::UnsupportedRename`.
pub const UNSUPPORTED_RENAME: i32 = -32002;
/// `RenameError::UnexpectedFailure`, or a wire-conversion failure that
/// prevented reporting a more specific error.
pub const UNEXPECTED_FAILURE: i32 = -32003;

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Additional structured data, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// An error with no additional data.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        JsonRpcError { code, message: message.into(), data: None }
    }

    /// An error carrying structured data.
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        JsonRpcError { code, message: message.into(), data: Some(data) }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}
