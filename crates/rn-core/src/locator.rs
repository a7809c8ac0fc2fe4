//! Name/AST Locator (spec §4.1): maps a source position to the smallest
//! syntax tree carrying an identifier, and extracts identifier
//! sub-locations for a given declaration node.

use std::collections::HashMap;

use rn_ast::{Node, NodeKind};
use rn_source::SourceLocation;

/// One location the Locator could not map to an identifier sub-location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedRenameIssue {
    /// The location that could not be mapped.
    pub location: SourceLocation,
    /// A human-readable reason.
    pub message: String,
}

/// The Locator failed to map one or more locations (spec §4.1: "if any
/// member cannot be mapped it fails with `UnsupportedRename{missing-locations}`").
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("locator could not map {} location(s)", .0.len())]
pub struct LocatorError(pub Vec<UnsupportedRenameIssue>);

/// Given a node, return its "identifier sub-location" per the spec's
/// dispatch table keyed on production kind. Productions the table marks
/// "not a named form" (and productions that don't correspond to a
/// syntactic declaration at all, such as a call or a block) return `None`.
///
/// The table in the spec lists a handful of illustrative productions; this
/// dispatch extends it to every named form in the grammar so the Locator
/// has a total answer for every `IdentifierRole` the engine classifies.
pub fn identifier_sub_location(node: &Node) -> Option<SourceLocation> {
    match &node.kind {
        // simple name, type variable, nonterminal, nonterminal label -> own span
        NodeKind::Name(_) => Some(node.location.clone()),
        // qualified name -> last segment
        NodeKind::QualifiedName(segments) => {
            segments.last().map(|segment| segment.location.clone())
        }
        // function declaration -> the signature's name field
        NodeKind::FunctionDecl { name, .. } => Some(name.location.clone()),
        // variable declaration, keyword formal -> the `name` field
        NodeKind::VariableDecl { name, .. } => Some(name.location.clone()),
        NodeKind::KeywordParameter { name, .. } => Some(name.location.clone()),
        NodeKind::Parameter { name, .. } => Some(name.location.clone()),
        // alias, data -> the declared type's user name
        NodeKind::Alias { name, .. } => Some(name.location.clone()),
        NodeKind::Data { name, .. } => Some(name.location.clone()),
        // module header -> the header's name field
        NodeKind::Module { name, .. } => Some(name.location.clone()),
        // syntax rule -> the rule's defined non-terminal
        NodeKind::SyntaxRule { nonterminal, .. } => Some(nonterminal.location.clone()),
        // extensions beyond the illustrative table, needed to cover every
        // remaining `IdentifierRole` (constructor, constructor/collection
        // fields, type parameters, nonterminal labels)
        NodeKind::Constructor { name, .. } => Some(name.location.clone()),
        NodeKind::PositionalField { name, .. } => Some(name.location.clone()),
        NodeKind::KeywordField { name, .. } => Some(name.location.clone()),
        NodeKind::TypeParameter { name } => Some(name.location.clone()),
        NodeKind::SyntaxAlternative { label: Some(label), .. } => Some(label.location.clone()),
        // default -> not a named form
        _ => None,
    }
}

/// The defined non-terminals the Locator considers when hunting for the
/// smallest node at a position (spec §4.1: "the smallest sub-tree whose
/// root production is a defined non-terminal").
fn is_named_form(node: &Node) -> bool {
    identifier_sub_location(node).is_some()
}

/// Find the smallest named-form node whose span covers `position`.
///
/// This is what the Cursor Classifier (`rn-core`'s C3) uses to turn a raw
/// byte offset into a candidate identifier occurrence.
pub fn smallest_named_node_at(tree: &Node, position: usize) -> Option<&Node> {
    tree.walk()
        .into_iter()
        .filter(|node| node.location.covers(position) && is_named_form(node))
        .min_by(|a, b| a.location.smallest_first(&b.location))
}

/// Find the node in `tree` whose own span equals `location` exactly.
fn node_at_location<'a>(tree: &'a Node, location: &SourceLocation) -> Option<&'a Node> {
    tree.walk().into_iter().find(|node| &node.location == location)
}

/// Map each of `locations` to its identifier sub-location, per spec §4.1.
///
/// Every location is expected to name a node present in `tree` (the caller
/// typically passes `Define::defined_at` or `useDef` locations drawn from
/// the same file this tree was parsed from). If any location cannot be
/// resolved to a named-form node, the whole call fails with
/// [`LocatorError`] carrying every unmapped location, not just the first.
pub fn locate_all(
    tree: &Node,
    locations: &[SourceLocation],
) -> Result<HashMap<SourceLocation, SourceLocation>, LocatorError> {
    let mut out = HashMap::with_capacity(locations.len());
    let mut missing = Vec::new();
    for location in locations {
        let sub_location = node_at_location(tree, location).and_then(identifier_sub_location);
        match sub_location {
            Some(loc) => {
                out.insert(location.clone(), loc);
            }
            None => missing.push(UnsupportedRenameIssue {
                location: location.clone(),
                message: "location is not a named form the Locator recognizes".to_string(),
            }),
        }
    }
    if missing.is_empty() { Ok(out) } else { Err(LocatorError(missing)) }
}
