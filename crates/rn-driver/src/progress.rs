//! Progress reporting (spec §6: "Progress: six discrete steps, each
//! reported as `(label, increment)`").

/// One discrete unit of work in [`crate::driver::RenameDriver::rename`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStep {
    /// Building the initial `WorkspaceInfo` via preload.
    Preload,
    /// Classifying the cursor (§4.3).
    Classify,
    /// Triggering (or skipping) a full workspace load (§4.2 item 2).
    FullLoad,
    /// Running the Overload & Reachability Resolver (§4.4).
    Resolve,
    /// Running the Legality Checker (§4.5).
    Legality,
    /// Running the Edit Planner (§4.6).
    EditPlanning,
}

impl RenameStep {
    /// This step's 1-based position among the six, for a `(n, 6)` style
    /// progress indicator.
    pub fn ordinal(self) -> u8 {
        match self {
            RenameStep::Preload => 1,
            RenameStep::Classify => 2,
            RenameStep::FullLoad => 3,
            RenameStep::Resolve => 4,
            RenameStep::Legality => 5,
            RenameStep::EditPlanning => 6,
        }
    }

    /// A short, user-visible label for this step.
    pub fn label(self) -> &'static str {
        match self {
            RenameStep::Preload => "loading cursor file",
            RenameStep::Classify => "classifying cursor",
            RenameStep::FullLoad => "scanning workspace",
            RenameStep::Resolve => "resolving overloads and reachability",
            RenameStep::Legality => "checking legality",
            RenameStep::EditPlanning => "planning edits",
        }
    }
}

/// Total number of discrete steps a `rename()` call reports.
pub const TOTAL_STEPS: u8 = 6;

/// Receives one report per [`RenameStep`] as `rename()` progresses.
///
/// Implemented as a trait rather than a bare closure so hosts can hold
/// additional state (a work-done-progress token, a UI handle) without an
/// extra capture-by-move closure at every call site.
pub trait ProgressReporter {
    /// Report that `step` has begun.
    fn report(&self, step: RenameStep);
}

/// A reporter that does nothing, for callers that don't need progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _step: RenameStep) {}
}

impl<F: Fn(RenameStep)> ProgressReporter for F {
    fn report(&self, step: RenameStep) {
        self(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_numbered_one_through_six() {
        let steps = [
            RenameStep::Preload,
            RenameStep::Classify,
            RenameStep::FullLoad,
            RenameStep::Resolve,
            RenameStep::Legality,
            RenameStep::EditPlanning,
        ];
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.ordinal(), (i + 1) as u8);
        }
        assert_eq!(TOTAL_STEPS, 6);
    }

    #[test]
    fn closures_implement_progress_reporter() {
        let mut seen = Vec::new();
        {
            let reporter = |step: RenameStep| seen.push(step);
            reporter.report(RenameStep::Preload);
        }
        assert_eq!(seen, vec![RenameStep::Preload]);
    }
}
