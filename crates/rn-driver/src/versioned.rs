//! Versioned cells for the broader host's per-file summaries (spec §5):
//! "diagnostics are stored in versioned cells that are updated by an
//! atomic compare-and-swap on `(version, value)`: a newer version always
//! wins, older completes are discarded."
//!
//! Grounded in the same staleness-discarding rule the teacher's document
//! sync path uses when a parse completes for a document that has since
//! moved on to a newer version: the result is silently dropped rather than
//! applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// A slot holding the most recent `(version, value)` pair written to it.
/// Writes from an older version than the one already stored are no-ops.
pub struct VersionedCell<T> {
    version: AtomicU64,
    value: RwLock<Option<Arc<T>>>,
}

impl<T> Default for VersionedCell<T> {
    fn default() -> Self {
        Self { version: AtomicU64::new(0), value: RwLock::new(None) }
    }
}

impl<T> VersionedCell<T> {
    /// An empty cell at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The version currently recorded, monotonically increasing.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Whether `candidate_version` is still current, i.e. no newer write
    /// has landed since a caller last observed `version()`. A debounced
    /// computation checks this immediately before running its expensive
    /// work and again immediately before publishing its result.
    pub fn is_current(&self, candidate_version: u64) -> bool {
        self.version.load(Ordering::Acquire) <= candidate_version
    }

    /// Publish `value` at `version`, unless a newer version has already
    /// been published, in which case this write is silently discarded.
    /// Returns whether the write took effect.
    pub fn publish(&self, version: u64, value: T) -> bool {
        loop {
            let current = self.version.load(Ordering::Acquire);
            if version < current {
                return false;
            }
            if self
                .version
                .compare_exchange(current, version, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                *self.value.write() = Some(Arc::new(value));
                return true;
            }
        }
    }

    /// The most recently published value, if any.
    pub fn get(&self) -> Option<Arc<T>> {
        self.value.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_version_always_wins() {
        let cell = VersionedCell::new();
        assert!(cell.publish(1, "first"));
        assert!(cell.publish(2, "second"));
        assert_eq!(cell.get().map(|v| *v), Some("second"));
        assert_eq!(cell.version(), 2);
    }

    #[test]
    fn older_completion_is_discarded() {
        let cell = VersionedCell::new();
        assert!(cell.publish(2, "second"));
        assert!(!cell.publish(1, "stale first"));
        assert_eq!(cell.get().map(|v| *v), Some("second"));
    }

    #[test]
    fn is_current_reflects_newer_writes() {
        let cell = VersionedCell::new();
        assert!(cell.is_current(0));
        cell.publish(5, ());
        assert!(!cell.is_current(3));
        assert!(cell.is_current(5));
    }
}
