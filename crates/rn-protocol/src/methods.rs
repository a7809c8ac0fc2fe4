//! Method name constants for the surface this crate exposes (spec §6),
//! in the teacher's `perl-lsp-protocol::methods` convention of centralizing
//! every wire method name as a typed constant.

/// Capability-check request: classify the cursor without committing to a
/// new name.
pub const PREPARE_RENAME: &str = "textDocument/prepareRename";

/// The rename request itself.
pub const RENAME: &str = "textDocument/rename";

/// Work-done-progress creation handshake.
pub const WORK_DONE_PROGRESS_CREATE: &str = "window/workDoneProgress/create";

/// Progress notification, sent once per [`rn_driver::RenameStep`].
pub const DOLLAR_PROGRESS: &str = "$/progress";

/// Client-initiated cancellation of an in-flight rename.
pub const CANCEL_REQUEST: &str = "$/cancelRequest";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_match_the_lsp_convention() {
        assert_eq!(PREPARE_RENAME, "textDocument/prepareRename");
        assert_eq!(RENAME, "textDocument/rename");
        assert_eq!(DOLLAR_PROGRESS, "$/progress");
    }
}
