//! Test-only helpers shared across the rename engine's crates: panic-on-
//! failure replacements for `unwrap`/`expect` (denied by workspace lint
//! policy outside tests) and small fixture builders.

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod fixture;
mod must;

pub use fixture::{FileFixture, loc, loc_in};
pub use must::{must, must_err, must_some};
