//! Cooperative cancellation (spec §5: "an outer cancellation token
//! propagates by marking pending futures interrupted; legality,
//! resolution, and edit-planning check the flag at each suspension
//! point").

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheap, cloneable flag checked at each oracle call boundary.
///
/// Mirrors the atomic-flag shape of a host LSP's per-request cancellation
/// token, stripped of the request-id/registry bookkeeping a full language
/// server needs: the driver owns exactly one token per `rename()` call and
/// has no multi-request registry to coordinate.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this token (and every clone of it) cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Fast check, safe to call at every suspension point.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_not_cancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn cancelling_one_clone_cancels_every_clone() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
