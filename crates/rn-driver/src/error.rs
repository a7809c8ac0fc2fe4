//! Driver-level error shape (spec §6 "Error shape", §7).

use rn_core::{IllegalRenameReason, UnsupportedRenameIssue};

/// The outcome of a failed [`crate::driver::RenameDriver::rename`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    /// Legality Checker rejected the rename; every reason found, unioned
    /// across every resolved define (spec §4.5, §7: "legality reasons
    /// never abort per-file, aggregated to one `illegalRename` at pipeline
    /// end").
    #[error("rename is illegal: {} reason(s)", .0.len())]
    IllegalRename(Vec<IllegalRenameReason>),
    /// The cursor, or some location the Edit Planner needed, could not be
    /// mapped at all — a capability gap in the engine, not a legality
    /// rejection.
    #[error("rename is unsupported: {} issue(s)", .0.len())]
    UnsupportedRename(Vec<UnsupportedRenameIssue>),
    /// An oracle call failed (parse or type-check) on a file the rename
    /// could not safely ignore.
    #[error("rename failed unexpectedly: {0}")]
    UnexpectedFailure(String),
    /// The outer cancellation token fired at a suspension point (spec §5:
    /// "never `unexpectedFailure`").
    #[error("rename was cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_has_its_own_variant_distinct_from_unexpected_failure() {
        let err = RenameError::Cancelled;
        assert!(matches!(err, RenameError::Cancelled));
        assert_ne!(err, RenameError::UnexpectedFailure("cancelled".to_string()));
    }
}
