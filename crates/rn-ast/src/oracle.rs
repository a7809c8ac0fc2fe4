//! Consumed-interface traits: the boundary between this crate's toy
//! grammar/analysis and a real language's parser and type checker.
//!
//! Spec §6 describes both as *consumed* interfaces: the rename engine
//! calls into them but does not own their implementation. `rn-ast` ships
//! a small illustrative parser/analyzer behind these traits so the rest
//! of the workspace can be built and tested without a production-grade
//! front end; a real deployment substitutes its own `ParserOracle` and
//! `TypeCheckerOracle`.

use std::collections::HashMap;

use rn_source::SourceLocation;
use rn_symbol_types::{Define, Type};
use thiserror::Error;

use crate::ast::Node;
use crate::parser::ParseError;

/// Failure modes an oracle may report, mirroring spec §7's error
/// taxonomy for the parse/analysis boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The parser could not produce a tree for this file.
    #[error("parse error in {file}: {source}")]
    Parse {
        /// The file that failed to parse.
        file: String,
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },
    /// The type checker could not resolve a type it needed.
    #[error("type resolution failed at {location:?}: {reason}")]
    TypeResolution {
        /// Where resolution failed.
        location: SourceLocation,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Parses one file's text into a tree. The only consumed interface the
/// Name/AST Locator (C1) needs directly.
pub trait ParserOracle {
    /// Parse `source`, attributing spans to `file`.
    fn parse(&self, file: &str, source: &str) -> Result<Node, OracleError>;
}

/// The static facts a type checker contributes about one file: its
/// `Define`s (spec §3) and the static [`Type`] of each.
///
/// `rn-core`'s Cursor Classifier and Overload & Reachability Resolver
/// consume this through [`TypeCheckerOracle::analyze`] rather than
/// walking trees themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileModel {
    /// Every definition introduced by this file, keyed by the location
    /// of the identifier occurrence that introduced it.
    pub defines: Vec<Define>,
    /// Maps a use-site location to the location of its resolved
    /// definition (spec §3 "Use→Def relation"), when resolvable within
    /// this single file.
    pub use_def: HashMap<SourceLocation, SourceLocation>,
    /// Maps every identifier occurrence (def or use) to its static
    /// type (spec §3 "Fact").
    pub facts: HashMap<SourceLocation, Type>,
    /// Maps each inner lexical scope to its immediately enclosing outer
    /// scope (spec §3 "scopes : relation<inner, outer>"). The file's own
    /// whole-file location is the root and has no entry.
    pub scopes: HashMap<SourceLocation, SourceLocation>,
    /// This file's module name and the module header's whole-file
    /// scope location, if it declares one.
    pub module: Option<(String, SourceLocation)>,
    /// Qualified names this file imports, textually as written.
    pub imports: Vec<String>,
}

impl FileModel {
    /// An empty model, for files with no recognizable declarations.
    pub fn empty() -> Self {
        FileModel::default()
    }
}

/// Produces the static facts a file contributes to the workspace index.
///
/// Spec §6 calls this the "type checker (consumed)" interface: given a
/// parsed tree, it resolves names to definitions and assigns static
/// types, feeding the workspace index's `Define`/`Fact`/`Use→Def` data.
pub trait TypeCheckerOracle {
    /// Analyze one already-parsed file.
    fn analyze(&self, tree: &Node) -> Result<FileModel, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_model_starts_empty() {
        let model = FileModel::empty();
        assert!(model.defines.is_empty());
        assert!(model.use_def.is_empty());
        assert!(model.facts.is_empty());
    }
}
