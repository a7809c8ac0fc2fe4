//! The `loaded` state machine (spec §3 "WorkspaceInfo").

/// How much of the workspace a [`crate::WorkspaceIndex`] has imported so far.
///
/// Monotonic for the lifetime of one rename: `Empty` → `Preloaded` →
/// `Full`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loaded {
    /// Nothing has been parsed yet.
    Empty,
    /// Only the cursor file has been imported.
    Preloaded,
    /// Every workspace file that could mention the cursor name has been
    /// imported (files that provably do not are registered but skipped).
    Full,
}

impl Loaded {
    /// Advance to `Preloaded`, unless already further along.
    pub fn advance_to_preloaded(self) -> Self {
        match self {
            Loaded::Empty => Loaded::Preloaded,
            other => other,
        }
    }

    /// Advance to `Full`.
    pub fn advance_to_full(self) -> Self {
        Loaded::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_never_goes_backwards() {
        assert_eq!(Loaded::Full.advance_to_preloaded(), Loaded::Full);
        assert_eq!(Loaded::Empty.advance_to_preloaded(), Loaded::Preloaded);
    }
}
