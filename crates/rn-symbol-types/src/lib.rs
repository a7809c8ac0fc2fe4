//! Shared identifier-role, static-type, define, and cursor vocabulary for
//! the rename engine (spec §3 "DATA MODEL").
//!
//! Every other crate in the workspace builds on the types here rather than
//! inventing its own notion of "what a name is".

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod cursor;
mod define;
mod role;
mod ty;

pub use cursor::{Cursor, CursorKind, DataFieldKind};
pub use define::{Define, DefineId};
pub use role::IdentifierRole;
pub use ty::{CollectionKind, Type};
