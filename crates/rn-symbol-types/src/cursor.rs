//! `Cursor` (spec §3): the classified entity a rename request targets.

use rn_source::SourceLocation;
use serde::{Deserialize, Serialize};

/// The sub-classification a data/collection field cursor resolves to
/// (spec §4.3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFieldKind {
    /// A field of a collection type (set/list/relation/tuple), or a
    /// container whose type is absent.
    Collection,
    /// A positional field of one ADT constructor.
    Positional,
    /// A keyword field declared on one ADT constructor.
    Keyword,
    /// A keyword field declared on the ADT itself, shared by all
    /// constructors.
    CommonKeyword,
}

/// The final kind produced by the cursor classifier's precedence table
/// (spec §4.3), after all ties are broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorKind {
    /// Cursor sits on (or inside) a module header's declared name.
    ModuleName,
    /// Cursor designates a data or collection field.
    DataField {
        /// Which field family this is.
        kind: DataFieldKind,
        /// The declaring ADT's location, when known (absent for
        /// `Collection`).
        container: Option<SourceLocation>,
    },
    /// Cursor sits on a definition occurrence.
    Definition,
    /// Cursor sits on a use occurrence.
    Use,
    /// Cursor sits on a type parameter occurrence.
    TypeParameter,
}

/// `<kind, location, name>`: the resolved smallest enclosing identifier
/// occurrence under the cursor, and its textual form with any escape
/// prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// The classified kind.
    pub kind: CursorKind,
    /// The identifier occurrence the cursor resolved to.
    pub location: SourceLocation,
    /// The textual name, with any leading escape (`\`) stripped.
    pub name: String,
}

impl Cursor {
    /// Construct a cursor, stripping a single leading backslash escape
    /// prefix from `raw_name` for comparison purposes (spec §3, §4.6
    /// "Escaping rule").
    pub fn new(kind: CursorKind, location: SourceLocation, raw_name: &str) -> Self {
        let name = raw_name.strip_prefix('\\').unwrap_or(raw_name).to_string();
        Cursor { kind, location, name }
    }
}
