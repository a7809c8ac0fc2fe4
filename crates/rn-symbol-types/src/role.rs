//! The closed identifier-role taxonomy (spec §3 "Identifier role").

use serde::{Deserialize, Serialize};

/// Every kind of name the engine knows how to classify and rename.
///
/// This set is closed: the classifier (`rn-core`) never produces a role
/// outside it, and legality/resolution logic is allowed to match
/// exhaustively over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierRole {
    /// A lexically scoped local variable.
    Variable,
    /// A variable introduced by a pattern (destructuring, `case` arm).
    PatternVariable,
    /// A positional function parameter.
    Parameter,
    /// A keyword (named) function parameter.
    KeywordParameter,
    /// A function definition; may be one of several overloaded siblings.
    Function,
    /// An annotation attached to a value.
    AnnotationOnValue,
    /// An annotation attached to a function. Renaming these is unsupported
    /// (spec §9 open question (b)).
    AnnotationOnFunction,
    /// A module's declared name.
    ModuleName,
    /// A type or value alias.
    Alias,
    /// An algebraic data type's declared name.
    DataType,
    /// A constructor of an algebraic data type.
    Constructor,
    /// A field declared on one constructor (positional or keyword).
    ConstructorField,
    /// A field of a collection type (set/list/relation/tuple with labels).
    CollectionField,
    /// A type parameter on a function or data type.
    TypeParameter,
    /// A grammar nonterminal.
    Nonterminal,
    /// A label attached to a grammar nonterminal alternative.
    NonterminalLabel,
}

impl IdentifierRole {
    /// Two roles are "compatible" for overload purposes (spec §4.4 condition
    /// ii) when they belong to the same renameable family: functions
    /// overload with functions, ADTs with ADTs, constructors with
    /// constructors, and constructor/collection fields with fields of the
    /// same container.
    pub fn overload_compatible(self, other: Self) -> bool {
        use IdentifierRole::{ConstructorField, CollectionField, Constructor, DataType, Function};
        match (self, other) {
            (Function, Function) => true,
            (DataType, DataType) => true,
            (Constructor, Constructor) => true,
            (ConstructorField, ConstructorField) => true,
            (CollectionField, CollectionField) => true,
            _ => self == other,
        }
    }

    /// Whether this role is ever legally declared more than once under the
    /// same name without being a double declaration (§4.5 item 3) — true
    /// exactly for the overload-eligible families.
    pub fn can_overload(self) -> bool {
        matches!(
            self,
            IdentifierRole::Function
                | IdentifierRole::DataType
                | IdentifierRole::Constructor
                | IdentifierRole::ConstructorField
                | IdentifierRole::CollectionField
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions_overload_with_functions_only() {
        assert!(IdentifierRole::Function.overload_compatible(IdentifierRole::Function));
        assert!(!IdentifierRole::Function.overload_compatible(IdentifierRole::Variable));
    }

    #[test]
    fn variables_never_overload() {
        assert!(!IdentifierRole::Variable.can_overload());
    }
}
