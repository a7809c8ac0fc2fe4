//! `Define` records (spec §3): one declaration of one name at one location.

use std::sync::atomic::{AtomicU64, Ordering};

use rn_source::SourceLocation;
use serde::{Deserialize, Serialize};

use crate::role::IdentifierRole;
use crate::ty::Type;

/// A process-unique identifier for a `Define`, distinct from its source
/// location so overload-closure bookkeeping (`rn-core`'s resolver) can key
/// on identity even where two defines share a location (e.g. a constructor
/// field and its constructor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefineId(pub u64);

static NEXT_DEFINE_ID: AtomicU64 = AtomicU64::new(1);

impl DefineId {
    /// Allocate a fresh id. Used by oracle adapters and test fixtures when
    /// constructing `Define`s; a real type-checker oracle may instead derive
    /// ids deterministically from its own internal symbol table.
    pub fn fresh() -> Self {
        DefineId(NEXT_DEFINE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One declaration: `<scope, name, id, role, definedAt, type>` (spec §3).
///
/// # Invariant
/// `defined_at ⊑ scope` always holds; for module-scope definitions `scope`
/// equals the whole-file location of `defined_at`'s file. Constructors here
/// are infallible for ergonomics, matching the teacher's `Symbol` struct,
/// but `Define::well_formed` lets callers (tests, oracle adapters) assert
/// the invariant before trusting external input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Define {
    /// The enclosing lexical region in which this define is visible.
    pub scope: SourceLocation,
    /// The declared name, exactly as written (no escape stripping).
    pub name: String,
    /// Process-unique identity, independent of location.
    pub id: DefineId,
    /// What kind of entity this define introduces.
    pub role: IdentifierRole,
    /// The identifier occurrence itself.
    pub defined_at: SourceLocation,
    /// The static type of the defined entity.
    pub ty: Type,
}

impl Define {
    /// Construct a new define, asserting the `defined_at ⊑ scope` invariant
    /// in debug builds.
    pub fn new(
        scope: SourceLocation,
        name: impl Into<String>,
        role: IdentifierRole,
        defined_at: SourceLocation,
        ty: Type,
    ) -> Self {
        let define =
            Define { scope, name: name.into(), id: DefineId::fresh(), role, defined_at, ty };
        debug_assert!(define.well_formed(), "Define::new violated defined_at ⊑ scope");
        define
    }

    /// Does `defined_at ⊑ scope` hold for this define?
    pub fn well_formed(&self) -> bool {
        self.scope.contains(&self.defined_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(start: usize, end: usize) -> SourceLocation {
        SourceLocation::new("M.lang", start, end)
    }

    #[test]
    fn well_formed_define_contains_its_occurrence() {
        let d = Define::new(
            loc(0, 100),
            "f",
            IdentifierRole::Function,
            loc(4, 5),
            Type::Function { params: vec![], ret: Box::new(Type::Unknown) },
        );
        assert!(d.well_formed());
    }

    #[test]
    fn distinct_defines_get_distinct_ids() {
        let a = DefineId::fresh();
        let b = DefineId::fresh();
        assert_ne!(a, b);
    }
}
