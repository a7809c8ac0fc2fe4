//! `RenameError` → JSON-RPC error mapping (spec §6 "Error shape", §7).

use rn_driver::RenameError;
use rn_workspace_index::SourceFileProvider;
use serde_json::json;

use crate::edits::{issues_to_wire, reasons_to_wire};
use crate::jsonrpc::{ILLEGAL_RENAME, JsonRpcError, REQUEST_CANCELLED, UNEXPECTED_FAILURE, UNSUPPORTED_RENAME};

/// Convert a failed rename into a JSON-RPC error response.
///
/// Cancellation gets its own reserved code rather than being folded into
/// the `illegalRename`/`unsupportedRename`/`unexpectedFailure` union (spec
/// §7: "Cancellation maps to a dedicated error, never `unexpectedFailure`")
/// — at the wire layer that distinction is exactly what the LSP-reserved
/// "request cancelled" code already exists for.
pub fn to_json_rpc_error(err: &RenameError, provider: &dyn SourceFileProvider) -> JsonRpcError {
    match err {
        RenameError::Cancelled => JsonRpcError::new(REQUEST_CANCELLED, "rename request was cancelled"),
        RenameError::IllegalRename(reasons) => match reasons_to_wire(reasons, provider) {
            Ok(wire_reasons) => {
                JsonRpcError::with_data(ILLEGAL_RENAME, "rename is illegal", json!({ "reasons": wire_reasons }))
            }
            Err(conversion_err) => JsonRpcError::new(UNEXPECTED_FAILURE, conversion_err.to_string()),
        },
        RenameError::UnsupportedRename(issues) => match issues_to_wire(issues, provider) {
            Ok(wire_issues) => JsonRpcError::with_data(
                UNSUPPORTED_RENAME,
                "rename is unsupported",
                json!({ "issues": wire_issues }),
            ),
            Err(conversion_err) => JsonRpcError::new(UNEXPECTED_FAILURE, conversion_err.to_string()),
        },
        RenameError::UnexpectedFailure(message) => JsonRpcError::new(UNEXPECTED_FAILURE, message.clone()),
    }
}
