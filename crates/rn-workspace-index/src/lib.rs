//! Lazily-populated workspace index for the rename engine (spec §3
//! "WorkspaceInfo", §4.2 "Workspace Index").
//!
//! A [`WorkspaceIndex`] is created per rename call, populated in two
//! phases (`preload` then, if needed, `full_load`), and discarded at
//! completion — it holds no state across renames.

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod index;
mod loaded;
mod path_config;
mod provider;

pub use error::WorkspaceIndexError;
pub use index::{WorkspaceIndex, WorkspaceInfo};
pub use loaded::Loaded;
pub use path_config::{PathConfigForFolder, WorkspacePathConfig};
pub use provider::{FsSourceProvider, InMemorySourceProvider, SOURCE_EXTENSION, SourceFileProvider};
