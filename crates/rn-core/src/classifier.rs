//! Cursor Classifier (spec §4.3) and data-field sub-classifier (§4.3.1).
//!
//! The toy grammar has no call-site keyword-argument syntax and no
//! exception clauses, so the `keywordArgument` and `exceptConstructor`
//! candidate queries spec §4.3 lists never produce a match here; a real
//! language's parser would wire them up the same way `field_access_candidate`
//! is wired below.

use rn_ast::{Node, NodeKind};
use rn_source::SourceLocation;
use rn_symbol_types::{Cursor, CursorKind, DataFieldKind, Define, IdentifierRole, Type};
use rn_workspace_index::WorkspaceInfo;

use crate::locator;
use crate::types::{IllegalRenameReason, UnsupportedRenameIssue};

/// Failure modes of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// The cursor does not designate any renameable entity, or the
    /// Locator could not map it to an identifier sub-location.
    #[error("cursor is not a renameable entity ({} issue(s))", .0.len())]
    Unsupported(Vec<UnsupportedRenameIssue>),
    /// The data-field sub-classifier (§4.3.1) could not find a matching
    /// field on the resolved ADT.
    #[error("cursor field does not resolve to a declared field")]
    Illegal(IllegalRenameReason),
}

/// Classify the cursor at `position` in `tree`, using the preloaded
/// `workspace` for semantic queries (spec §4.3).
pub fn classify(
    tree: &Node,
    workspace: &WorkspaceInfo,
    position: usize,
) -> Result<Cursor, ClassifyError> {
    tracing::debug!(file = %tree.location.file, position, "classifying cursor");
    let (cursor_loc, cursor_name) = cursor_occurrence(tree, position).ok_or_else(|| {
        ClassifyError::Unsupported(vec![UnsupportedRenameIssue {
            location: SourceLocation::new(tree.location.file.clone(), position, position),
            message: "cursor position is not inside a named form".to_string(),
        }])
    })?;

    if inside_module_header_name(tree, position) {
        return Ok(Cursor::new(CursorKind::ModuleName, cursor_loc, &cursor_name));
    }

    if let Some((base, field)) = field_access_candidate(tree, position) {
        let (kind, container) = data_field_sub_classify_by_name(tree, workspace, &base, &cursor_name)
            .map_err(ClassifyError::Illegal)?;
        return Ok(Cursor::new(CursorKind::DataField { kind, container }, field, &cursor_name));
    }

    if let Some(def) = def_candidate(workspace, position, &cursor_name) {
        if def.role == IdentifierRole::ConstructorField {
            if let Some((kind, container)) = field_declaration_kind(tree, &def.defined_at) {
                return Ok(Cursor::new(
                    CursorKind::DataField { kind, container: Some(container) },
                    def.defined_at.clone(),
                    &cursor_name,
                ));
            }
        }
        return Ok(Cursor::new(CursorKind::Definition, def.defined_at.clone(), &cursor_name));
    }

    if let Some(use_loc) = use_candidate(workspace, position) {
        if resolves_to_module(workspace, &use_loc) {
            return Ok(Cursor::new(CursorKind::ModuleName, use_loc, &cursor_name));
        }
        if qualified_prefix_extends_past_cursor(tree, workspace, &use_loc) {
            return Ok(Cursor::new(CursorKind::ModuleName, use_loc, &cursor_name));
        }
        if workspace.facts.get(&use_loc).map(Type::is_type_parameter).unwrap_or(false) {
            return Ok(Cursor::new(CursorKind::TypeParameter, use_loc, &cursor_name));
        }
        return Ok(Cursor::new(CursorKind::Use, use_loc, &cursor_name));
    }

    if let Some(tp_loc) = type_parameter_candidate(workspace, position, &cursor_name) {
        return Ok(Cursor::new(CursorKind::TypeParameter, tp_loc, &cursor_name));
    }

    Err(ClassifyError::Unsupported(vec![UnsupportedRenameIssue {
        location: cursor_loc,
        message: "cursor does not match any candidate query".to_string(),
    }]))
}

/// Resolve the cursor's own identifier occurrence: the smallest named-form
/// node at `position`, reduced through the Locator's dispatch table.
fn cursor_occurrence(tree: &Node, position: usize) -> Option<(SourceLocation, String)> {
    let node = locator::smallest_named_node_at(tree, position)?;
    let sub_location = locator::identifier_sub_location(node)?;
    let name_node = tree.walk().into_iter().find(|n| n.location == sub_location)?;
    let name = name_node.as_name()?.to_string();
    Some((sub_location, name))
}

fn inside_module_header_name(tree: &Node, position: usize) -> bool {
    matches!(&tree.kind, NodeKind::Module { name, .. } if name.location.covers(position))
}

/// smallest `Define.definedAt` covering `position` whose name equals the
/// cursor text (spec §4.3 "def").
fn def_candidate<'a>(
    workspace: &'a WorkspaceInfo,
    position: usize,
    cursor_name: &str,
) -> Option<&'a Define> {
    workspace
        .defines
        .iter()
        .filter(|d| d.defined_at.covers(position) && d.name == cursor_name)
        .min_by(|a, b| a.defined_at.smallest_first(&b.defined_at))
}

/// smallest `loc` in `domain(useDef)` containing `position` (spec §4.3 "use").
fn use_candidate(workspace: &WorkspaceInfo, position: usize) -> Option<SourceLocation> {
    workspace
        .use_def
        .keys()
        .filter(|loc| loc.covers(position))
        .min_by(|a, b| a.smallest_first(b))
        .cloned()
}

/// smallest `loc` in `facts` whose fact is a type parameter named
/// `cursor_name` (spec §4.3 "typeParameter").
fn type_parameter_candidate(
    workspace: &WorkspaceInfo,
    position: usize,
    cursor_name: &str,
) -> Option<SourceLocation> {
    workspace
        .facts
        .iter()
        .filter(|(loc, ty)| {
            loc.covers(position) && matches!(ty, Type::TypeParameter(n) if n.as_ref() == cursor_name)
        })
        .map(|(loc, _)| loc.clone())
        .min_by(|a, b| a.smallest_first(b))
}

/// Does `useDef[use_loc]` resolve to a module-typed define (spec §4.3
/// "use" disambiguation, first clause)?
fn resolves_to_module(workspace: &WorkspaceInfo, use_loc: &SourceLocation) -> bool {
    workspace
        .use_def
        .get(use_loc)
        .and_then(|target| workspace.facts.get(target))
        .map(Type::is_module)
        .unwrap_or(false)
}

/// Is `use_loc` on a non-final segment of a qualified name whose resolved
/// define is not a local variable (spec §4.3 "use" disambiguation, second
/// clause; spec §9 "Qualified-name disambiguation")?
fn qualified_prefix_extends_past_cursor(
    tree: &Node,
    workspace: &WorkspaceInfo,
    use_loc: &SourceLocation,
) -> bool {
    let qualified_name = tree
        .walk()
        .into_iter()
        .filter(|n| matches!(n.kind, NodeKind::QualifiedName(_)) && n.location.contains(use_loc))
        .min_by(|a, b| a.location.smallest_first(&b.location));
    let Some(qualified_name) = qualified_name else {
        return false;
    };
    let NodeKind::QualifiedName(segments) = &qualified_name.kind else {
        return false;
    };
    let Some(last) = segments.last() else {
        return false;
    };
    if &last.location == use_loc {
        return false;
    }
    match workspace.use_def.get(use_loc).and_then(|target| {
        workspace.defines.iter().find(|d| &d.defined_at == target)
    }) {
        Some(def) => !matches!(def.role, IdentifierRole::Variable | IdentifierRole::PatternVariable),
        None => true,
    }
}

/// smallest field-access `.field` occurrence covering `position`, paired
/// with its container (`base`) expression's location.
fn field_access_candidate(tree: &Node, position: usize) -> Option<(SourceLocation, SourceLocation)> {
    tree.walk()
        .into_iter()
        .filter_map(|n| match &n.kind {
            NodeKind::FieldAccess { base, field } if field.location.covers(position) => {
                Some((base.location.clone(), field.location.clone()))
            }
            _ => None,
        })
        .min_by(|a, b| a.1.smallest_first(&b.1))
}

/// Given the identifier sub-location of an already-known `constructorField`
/// define, find which field family (positional/keyword/common keyword) it
/// belongs to, and the declaring ADT's name location, by matching the
/// declaration shape syntactically.
fn field_declaration_kind(
    tree: &Node,
    defined_at: &SourceLocation,
) -> Option<(DataFieldKind, SourceLocation)> {
    for node in tree.walk() {
        let NodeKind::Data { name, constructors, common_keyword_fields } = &node.kind else {
            continue;
        };
        for field in common_keyword_fields {
            if let NodeKind::KeywordField { name: field_name, .. } = &field.kind {
                if &field_name.location == defined_at {
                    return Some((DataFieldKind::CommonKeyword, name.location.clone()));
                }
            }
        }
        for ctor in constructors {
            let NodeKind::Constructor { positional_fields, keyword_fields, .. } = &ctor.kind else {
                continue;
            };
            for field in positional_fields {
                if let NodeKind::PositionalField { name: field_name, .. } = &field.kind {
                    if &field_name.location == defined_at {
                        return Some((DataFieldKind::Positional, name.location.clone()));
                    }
                }
            }
            for field in keyword_fields {
                if let NodeKind::KeywordField { name: field_name, .. } = &field.kind {
                    if &field_name.location == defined_at {
                        return Some((DataFieldKind::Keyword, name.location.clone()));
                    }
                }
            }
        }
    }
    None
}

/// Data-field sub-classifier (spec §4.3.1), entered from a field-access
/// use site: given the container (base) expression's location and the
/// field name under the cursor, decide collection vs. ADT field family.
fn data_field_sub_classify_by_name(
    tree: &Node,
    workspace: &WorkspaceInfo,
    base_loc: &SourceLocation,
    field_name: &str,
) -> Result<(DataFieldKind, Option<SourceLocation>), IllegalRenameReason> {
    let base_ty = workspace.facts.get(base_loc);
    let is_collection_or_absent = base_ty.map(Type::is_collection).unwrap_or(true);
    if is_collection_or_absent {
        return Ok((DataFieldKind::Collection, None));
    }
    let Some(Type::Adt(adt_name)) = base_ty else {
        return Err(IllegalRenameReason::DefinitionsOutsideWorkspace {
            locations: vec![base_loc.clone()],
        });
    };

    for node in tree.walk() {
        let NodeKind::Data { name, constructors, common_keyword_fields } = &node.kind else {
            continue;
        };
        if name.as_name() != Some(adt_name.as_ref()) {
            continue;
        }
        let container = name.location.clone();
        for field in common_keyword_fields {
            if let NodeKind::KeywordField { name: field_name_node, .. } = &field.kind {
                if field_name_node.as_name() == Some(field_name) {
                    return Ok((DataFieldKind::CommonKeyword, Some(container)));
                }
            }
        }
        for ctor in constructors {
            let NodeKind::Constructor { keyword_fields, positional_fields, .. } = &ctor.kind else {
                continue;
            };
            for field in keyword_fields {
                if let NodeKind::KeywordField { name: field_name_node, .. } = &field.kind {
                    if field_name_node.as_name() == Some(field_name) {
                        return Ok((DataFieldKind::Keyword, Some(container)));
                    }
                }
            }
            for field in positional_fields {
                if let NodeKind::PositionalField { name: field_name_node, .. } = &field.kind {
                    if field_name_node.as_name() == Some(field_name) {
                        return Ok((DataFieldKind::Positional, Some(container)));
                    }
                }
            }
        }
    }
    Err(IllegalRenameReason::DefinitionsOutsideWorkspace { locations: vec![base_loc.clone()] })
}
