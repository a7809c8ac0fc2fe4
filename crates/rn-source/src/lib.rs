//! Source locations and position mapping for the rename engine.
//!
//! This is the lowest tier of the rename workspace: every other crate
//! addresses program text through the [`SourceLocation`] and [`LineIndex`]
//! types defined here.

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod line_index;
mod location;

pub use line_index::LineIndex;
pub use location::{SourceLocation, is_path_prefix, longest_prefix_folder};
