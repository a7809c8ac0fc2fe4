//! Single-flow rename driver (spec §2 component C7, §4.7): wires cursor
//! classification, overload/reachability resolution, legality checking and
//! edit planning together over a workspace, plus the concurrency scaffolding
//! a host embeds it in (spec §5: cancellation and versioned per-file
//! summaries).

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod cancellation;
mod driver;
mod error;
mod progress;
mod versioned;

pub use cancellation::CancellationToken;
pub use driver::RenameDriver;
pub use error::RenameError;
pub use progress::{NoopProgress, ProgressReporter, RenameStep, TOTAL_STEPS};
pub use versioned::VersionedCell;
