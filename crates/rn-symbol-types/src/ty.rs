//! Static type expressions (spec §3 "Fact": "a mapping from any location to
//! its static type expression").
//!
//! The engine never computes these; it consumes them from the type-checker
//! oracle (spec §6). This module only fixes the algebraic shape so the rest
//! of the crates have something concrete to pattern-match on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A static type expression, as produced by the type-checker oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// A primitive or nominal type with no further structure the engine
    /// needs (`int`, `str`, a resolved alias target, ...).
    Simple(Arc<str>),
    /// A reference to an algebraic data type by its declared name.
    Adt(Arc<str>),
    /// A function type.
    Function {
        /// Parameter types, in declaration order.
        params: Vec<Type>,
        /// Return type.
        ret: Box<Type>,
    },
    /// A type parameter occurrence (the fact a `typeParameter` candidate
    /// query in §4.3 matches against).
    TypeParameter(Arc<str>),
    /// A collection type: set, list, relation, or a labelled tuple.
    Collection(CollectionKind, Vec<Type>),
    /// A module, matched by the `use`→moduleName disambiguation in §4.3.
    Module(Arc<str>),
    /// No type information available for this location.
    Unknown,
}

/// The collection type families the data-field sub-classifier (§4.3.1)
/// checks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    /// An unordered, duplicate-free collection.
    Set,
    /// An ordered collection.
    List,
    /// A relation (set of tuples).
    Relation,
    /// A tuple, possibly with labelled positions.
    Tuple,
}

impl Type {
    /// Is this a collection type, per the §4.3.1 test "type is a collection
    /// type ... or absent"?
    pub fn is_collection(&self) -> bool {
        matches!(self, Type::Collection(..))
    }

    /// Is this fact a type-parameter occurrence?
    pub fn is_type_parameter(&self) -> bool {
        matches!(self, Type::TypeParameter(_))
    }

    /// Does this fact denote a module (used by the `use`→`moduleName`
    /// disambiguation rule in §4.3)?
    pub fn is_module(&self) -> bool {
        matches!(self, Type::Module(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_type_is_not_a_collection() {
        assert!(!Type::Unknown.is_collection());
    }

    #[test]
    fn collection_variants_are_detected() {
        assert!(Type::Collection(CollectionKind::Set, vec![]).is_collection());
    }
}
