//! `$/progress` notification shape (spec §6: "Progress: six discrete steps,
//! each reported as `(label, increment)`"), grounded in the teacher's
//! `window/workDoneProgress` begin/report/end sequence.

use rn_driver::{ProgressReporter, RenameStep, TOTAL_STEPS};
use serde::{Deserialize, Serialize};

/// One `$/progress` notification's value, tagged by `kind` the way LSP's
/// work-done-progress payloads are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProgressValue {
    /// The operation has started.
    Begin {
        /// Title of the operation.
        title: String,
    },
    /// An intermediate step completed.
    Report {
        /// What just happened.
        message: String,
        /// 0-100, how far through the six steps this is.
        percentage: u32,
    },
    /// The operation finished (successfully or not — failure is reported
    /// separately via the call's `Result`, this just closes the progress UI).
    End {
        /// Final message.
        message: Option<String>,
    },
}

/// A full `$/progress` notification: a token plus its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressNotification {
    /// The work-done-progress token this notification belongs to.
    pub token: String,
    /// The notification body.
    pub value: ProgressValue,
}

/// `(label, increment)` for one [`RenameStep`] (spec §6's literal phrasing).
pub fn step_progress(step: RenameStep) -> (&'static str, u32) {
    (step.label(), (u32::from(step.ordinal()) * 100) / u32::from(TOTAL_STEPS))
}

/// Adapts a `$/progress`-emitting sink into the [`ProgressReporter`]
/// [`rn_driver::RenameDriver::rename`] expects, converting each
/// [`RenameStep`] into a `Report` notification against a fixed token.
pub struct WireProgressReporter<F: Fn(ProgressNotification)> {
    token: String,
    emit: F,
}

impl<F: Fn(ProgressNotification)> WireProgressReporter<F> {
    /// Build a reporter that calls `emit` for every step, tagging
    /// notifications with `token`.
    pub fn new(token: impl Into<String>, emit: F) -> Self {
        WireProgressReporter { token: token.into(), emit }
    }
}

impl<F: Fn(ProgressNotification)> ProgressReporter for WireProgressReporter<F> {
    fn report(&self, step: RenameStep) {
        let (message, percentage) = step_progress(step);
        (self.emit)(ProgressNotification {
            token: self.token.clone(),
            value: ProgressValue::Report { message: message.to_string(), percentage },
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn final_step_reports_one_hundred_percent() {
        let (_, percentage) = step_progress(RenameStep::EditPlanning);
        assert_eq!(percentage, 100);
    }

    #[test]
    fn first_step_reports_a_nonzero_partial_percentage() {
        let (_, percentage) = step_progress(RenameStep::Preload);
        assert!(percentage > 0 && percentage < 100);
    }

    #[test]
    fn wire_reporter_emits_one_notification_per_step() {
        let seen = RefCell::new(Vec::new());
        let reporter = WireProgressReporter::new("tok-1", |n: ProgressNotification| {
            seen.borrow_mut().push(n);
        });
        reporter.report(RenameStep::Preload);
        reporter.report(RenameStep::Classify);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[0].token, "tok-1");
    }
}
