//! Cursor classification, overload/reachability resolution, legality
//! checking, and edit planning for the rename engine (spec §2, components
//! C1, C3-C6; C2 and C7 live in `rn-workspace-index` and `rn-driver`).

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod classifier;
mod edit_planner;
mod escape;
mod legality;
mod locator;
mod resolver;
mod types;

pub use classifier::{ClassifyError, classify};
pub use edit_planner::plan;
pub use escape::escape;
pub use legality::check as check_legality;
pub use locator::{LocatorError, UnsupportedRenameIssue as LocatorIssue, identifier_sub_location, locate_all, smallest_named_node_at};
pub use resolver::{Resolved, resolve};
pub use types::{
    AnnotationId, Capture, ChangeAnnotation, DocumentEdit, IllegalRenameReason, PlannedEdits,
    RenameLocation, TextEdit, UnsupportedRenameIssue,
};
