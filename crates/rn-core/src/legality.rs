//! Legality Checker (spec §4.5): four independent checks, results unioned.

use rn_symbol_types::{Define, IdentifierRole};
use rn_workspace_index::WorkspaceInfo;

use crate::escape::escape;
use crate::resolver::Resolved;
use crate::types::{Capture, IllegalRenameReason};

/// Run all four checks and return every reason the rename is illegal.
/// An empty result means the rename is legal.
pub fn check(workspace: &WorkspaceInfo, resolved: &Resolved, new_name: &str) -> Vec<IllegalRenameReason> {
    let mut reasons = Vec::new();

    if let Some(reason) = legal_identifier(new_name) {
        reasons.push(reason);
    }
    if let Some(reason) = out_of_workspace(workspace, resolved) {
        reasons.push(reason);
    }
    reasons.extend(double_declarations(workspace, resolved, new_name));

    let captures = captures(workspace, resolved, new_name);
    if !captures.is_empty() {
        reasons.push(IllegalRenameReason::CaptureChange { captures });
    }

    reasons
}

/// Spec §4.5 item 1: parse the escaped new name as the syntactic category
/// the role requires. The toy grammar has one identifier shape shared by
/// every named form, so a single lex-and-check stands in for a richer
/// grammar's per-role dispatch.
fn legal_identifier(new_name: &str) -> Option<IllegalRenameReason> {
    let escaped = escape(new_name);
    if rn_ast::is_legal_identifier(&escaped) {
        None
    } else {
        Some(IllegalRenameReason::InvalidName { new_name: new_name.to_string() })
    }
}

/// Spec §4.5 item 2: any resolved define outside `sourceFiles`.
fn out_of_workspace(workspace: &WorkspaceInfo, resolved: &Resolved) -> Option<IllegalRenameReason> {
    let locations: Vec<_> = resolved
        .defs
        .iter()
        .filter(|d| !workspace.source_files.contains(&d.defined_at.file))
        .map(|d| d.defined_at.clone())
        .collect();
    if locations.is_empty() {
        None
    } else {
        Some(IllegalRenameReason::DefinitionsOutsideWorkspace { locations })
    }
}

/// Spec §4.5 item 3: for each pair `(currentDef, existingDefOfNewName)`
/// where `currentDef ⊑ existingDef.scope` and the pair is not legally
/// overloadable. Specialisations (a) field defs of the same ADT collide if
/// they share their container (approximated here by scope equality, since
/// a constructor's fields all share its scope); (b) type-parameter defs
/// collide the same way, approximated by the same scope test — two type
/// parameters only ever satisfy the containment precondition when their
/// signatures overlap, since unrelated functions don't share a scope.
fn double_declarations(
    workspace: &WorkspaceInfo,
    resolved: &Resolved,
    new_name: &str,
) -> Vec<IllegalRenameReason> {
    let mut out = Vec::new();
    for current in &resolved.defs {
        for existing in &workspace.defines {
            if existing.name != new_name || existing.id == current.id {
                continue;
            }
            if !existing.scope.contains(&current.defined_at) {
                continue;
            }
            if is_double_declaration(current, existing) {
                out.push(IllegalRenameReason::DoubleDeclaration {
                    current: current.defined_at.clone(),
                    existing: existing.defined_at.clone(),
                });
            }
        }
    }
    out
}

fn is_double_declaration(current: &Define, existing: &Define) -> bool {
    if !current.role.can_overload() || !existing.role.can_overload() {
        return true;
    }
    if current.role != existing.role {
        return true;
    }
    match current.role {
        IdentifierRole::ConstructorField | IdentifierRole::CollectionField => {
            current.scope == existing.scope
        }
        _ => false,
    }
}

/// Spec §4.5 item 4: the union of the three capture sub-cases.
fn captures(workspace: &WorkspaceInfo, resolved: &Resolved, new_name: &str) -> Vec<Capture> {
    let mut out = Vec::new();
    out.extend(implicit_becomes_use(workspace, resolved, new_name));
    out.extend(use_shadowing(workspace, resolved, new_name));
    out
}

/// "An implicit definition of the new name inside the scope of a current
/// definition would turn into a use of that current definition after
/// rename." Implicit definitions (spec §9) are variable-role defines whose
/// `definedAt` already appears as a use in `useDef`, plus pattern-variable
/// defines in qualified-name/multi-variable/becomes-pattern position; the
/// toy grammar has no pattern syntax, so only the first clause ever fires.
fn implicit_becomes_use(
    workspace: &WorkspaceInfo,
    resolved: &Resolved,
    new_name: &str,
) -> Vec<Capture> {
    let mut out = Vec::new();
    for current in &resolved.defs {
        for implicit in implicit_definitions(workspace) {
            if implicit.name == new_name
                && implicit.id != current.id
                && current.scope.contains(&implicit.defined_at)
            {
                out.push(Capture::ImplicitBecomesUse {
                    implicit_definition: implicit.defined_at.clone(),
                    absorbed_by: current.defined_at.clone(),
                });
            }
        }
    }
    out
}

fn implicit_definitions(workspace: &WorkspaceInfo) -> Vec<&Define> {
    workspace
        .defines
        .iter()
        .filter(|d| d.role == IdentifierRole::Variable && workspace.use_def.contains_key(&d.defined_at))
        .collect()
}

/// The other two capture sub-cases share one scan: a use of `new_name`
/// that lies in some resolved define's scope, and whose current target is
/// some *other* existing define named `new_name`. Whether that target's
/// scope strictly contains the resolved define's scope distinguishes
/// "current-use-shadowed" (the use currently reaches an enclosing
/// definition, which the rename would newly shadow) from
/// "new-use-shadowed" (the use currently reaches a peer or nested
/// definition that the rename, being at least as local, would newly take
/// precedence over).
fn use_shadowing(workspace: &WorkspaceInfo, resolved: &Resolved, new_name: &str) -> Vec<Capture> {
    let mut out = Vec::new();
    for current in &resolved.defs {
        for (use_loc, target) in &workspace.use_def {
            if resolved.uses.contains(use_loc) || !current.scope.contains(use_loc) {
                continue;
            }
            let Some(existing) = workspace.defines.iter().find(|d| &d.defined_at == target) else {
                continue;
            };
            if existing.name != new_name || existing.id == current.id {
                continue;
            }
            if existing.scope.strictly_contains(&current.scope) {
                out.push(Capture::CurrentUseShadowed {
                    use_location: use_loc.clone(),
                    new_definer: current.defined_at.clone(),
                });
            } else {
                out.push(Capture::NewUseShadowed {
                    use_location: use_loc.clone(),
                    new_definer: current.defined_at.clone(),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use rn_ast::{ParserOracle, ToyAnalyzer, ToyParser};
    use rn_symbol_types::{Cursor, CursorKind};
    use rn_test_support::must;
    use rn_workspace_index::{InMemorySourceProvider, WorkspaceIndex};

    use super::*;
    use crate::resolver::resolve;

    struct NoConfig;
    impl rn_workspace_index::PathConfigForFolder for NoConfig {
        fn path_config_for_folder(
            &self,
            _folder: &Path,
        ) -> Option<rn_workspace_index::WorkspacePathConfig> {
            None
        }
    }

    fn index(files: Vec<(&str, &str)>) -> WorkspaceIndex {
        let provider = InMemorySourceProvider::new(
            files.into_iter().map(|(p, t)| (PathBuf::from(p), t.to_string())),
        );
        WorkspaceIndex::new(
            Arc::new(provider),
            Arc::new(ToyParser),
            Arc::new(ToyAnalyzer),
            Arc::new(NoConfig),
        )
    }

    #[test]
    fn reserved_word_new_name_is_escaped_and_accepted() {
        assert!(legal_identifier("data").is_none());
        assert!(legal_identifier("foo").is_none());
    }

    #[test]
    fn empty_new_name_is_invalid() {
        assert!(legal_identifier("").is_some());
    }

    #[test]
    fn renaming_a_top_level_variable_onto_a_sibling_is_a_double_declaration() {
        let source = "module M;\nint a = 1;\nint b = 2;\n";
        let idx = index(vec![("/ws/M.lang", source)]);
        must(idx.preload(Path::new("/ws/M.lang"), &[PathBuf::from("/ws")]));
        must(idx.full_load("a"));
        let info = idx.snapshot();
        let a = must(info.defines.iter().find(|d| d.name == "a").ok_or("a missing"));
        let cursor = Cursor::new(CursorKind::Definition, a.defined_at.clone(), "a");
        let reachable = idx.reachable_defs(&[cursor.location.clone()]);
        let resolved = resolve(&info, &reachable, &cursor, "b");
        let reasons = check(&info, &resolved, "b");
        assert!(
            reasons.iter().any(|r| matches!(r, IllegalRenameReason::DoubleDeclaration { .. })),
            "expected a double declaration, got {reasons:?}"
        );
    }

    #[test]
    fn renaming_a_parameter_to_a_fresh_name_is_legal() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let idx = index(vec![("/ws/M.lang", source)]);
        must(idx.preload(Path::new("/ws/M.lang"), &[PathBuf::from("/ws")]));
        must(idx.full_load("a"));
        let info = idx.snapshot();
        let param = must(info.defines.iter().find(|d| d.name == "a").ok_or("param a missing"));
        let cursor = Cursor::new(CursorKind::Definition, param.defined_at.clone(), "a");
        let reachable = idx.reachable_defs(&[cursor.location.clone()]);
        let resolved = resolve(&info, &reachable, &cursor, "x");
        let reasons = check(&info, &resolved, "x");
        assert!(reasons.is_empty(), "expected no reasons, got {reasons:?}");
    }
}
