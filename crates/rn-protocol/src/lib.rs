//! Wire format and top-level `renameSymbol`/`prepareRename` operations for
//! the rename engine (spec §2 component boundary, §6 "External Interfaces").

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod edits;
mod error;
mod jsonrpc;
pub mod methods;
mod progress;
mod range;
mod service;

pub use edits::{
    WireCapture, WireChangeAnnotation, WireDocumentEdit, WireEdits, WireIllegalReason, WireIssue,
    WireTextEdit, issues_to_wire, reasons_to_wire, to_wire,
};
pub use error::to_json_rpc_error;
pub use jsonrpc::{ILLEGAL_RENAME, JsonRpcError, REQUEST_CANCELLED, UNEXPECTED_FAILURE, UNSUPPORTED_RENAME};
pub use progress::{ProgressNotification, ProgressValue, WireProgressReporter, step_progress};
pub use range::{RangeConversionError, RangeConverter, WireLocation, WirePosition, WireRange};
pub use service::{RenameSymbolParams, prepare_rename, rename_symbol};
