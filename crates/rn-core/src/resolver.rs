//! Overload & Reachability Resolver (spec §4.4).

use std::sync::Arc;

use rn_source::SourceLocation;
use rn_symbol_types::{Cursor, CursorKind, DataFieldKind, Define, IdentifierRole};
use rn_workspace_index::WorkspaceInfo;

/// `(defs, uses, renamesForFiles)` plus the function-locality verdict the
/// Driver (§4.7 step 3) uses to decide whether `fullLoad()` is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    /// The closure of the cursor's initial defines under the overload
    /// relation.
    pub defs: Vec<Define>,
    /// `invert(useDef)[defs]`: every use resolving to a member of `defs`.
    pub uses: Vec<SourceLocation>,
    /// File renames implied by a `moduleName` rename, `(from, to)`.
    pub renames_for_files: Vec<(Arc<str>, Arc<str>)>,
    /// Whether every resolved define lies inside a function, letting the
    /// Driver skip `fullLoad()`.
    pub function_local: bool,
}

/// Resolve the cursor's definition set, given the candidates already
/// transitively reachable from it (`reachable`, as returned by
/// [`rn_workspace_index::WorkspaceIndex::reachable_defs`] seeded from the
/// cursor's own define/use location).
pub fn resolve(
    workspace: &WorkspaceInfo,
    reachable: &[Define],
    cursor: &Cursor,
    new_name: &str,
) -> Resolved {
    tracing::debug!(name = %cursor.name, reachable = reachable.len(), "resolving overload/reachability set");
    let seed = find_cursor_define(workspace, cursor);

    let defs: Vec<Define> = match &seed {
        Some(seed) => overload_closure(reachable, seed),
        None => Vec::new(),
    };

    let uses: Vec<SourceLocation> = workspace
        .use_def
        .iter()
        .filter(|(_, target)| defs.iter().any(|d| &d.defined_at == *target))
        .map(|(use_loc, _)| use_loc.clone())
        .collect();

    let renames_for_files = if matches!(cursor.kind, CursorKind::ModuleName) {
        renames_for_files(&defs, new_name)
    } else {
        Vec::new()
    };

    let function_local = match &cursor.kind {
        CursorKind::ModuleName => false,
        CursorKind::DataField { kind: DataFieldKind::Collection, .. } => false,
        _ => is_function_local(workspace, &defs),
    };

    Resolved { defs, uses, renames_for_files, function_local }
}

/// The define the cursor itself designates, as a seed for overload
/// expansion. `Use` cursors resolve through `useDef` first; every other
/// kind's `location` already equals a `defined_at` (set by the Classifier).
/// A `collectionField` cursor has no backing define in the relational
/// model (the toy grammar has no labelled-tuple syntax to declare one
/// against); resolving to `None` there is intentional, not an oversight.
fn find_cursor_define(workspace: &WorkspaceInfo, cursor: &Cursor) -> Option<Define> {
    let target_loc = match &cursor.kind {
        CursorKind::Use => {
            workspace.use_def.get(&cursor.location).cloned().unwrap_or_else(|| cursor.location.clone())
        }
        _ => cursor.location.clone(),
    };
    workspace.defines.iter().find(|d| d.defined_at == target_loc).cloned()
}

/// Two defines are potentially overloaded iff they share a name and a
/// compatible role (spec §4.4 conditions i, ii); condition iii (mutual
/// reachability) is already enforced by the caller restricting `reachable`
/// to the scope/import graph's closure from the cursor.
fn overload_closure(reachable: &[Define], seed: &Define) -> Vec<Define> {
    reachable
        .iter()
        .filter(|d| d.name == seed.name && d.role.overload_compatible(seed.role))
        .cloned()
        .collect()
}

/// Spec §4.4: "if every resolved define lies strictly inside some
/// function-typed define, the rename is function-local". The toy grammar
/// only ever records a `scopes` edge for a function's body/declaration
/// pair (§4.1's named-form set has no other construct that nests scopes),
/// so "d's scope is a key of `scopes`" is exactly "d is lexically nested
/// inside a function" for this grammar.
fn is_function_local(workspace: &WorkspaceInfo, defs: &[Define]) -> bool {
    !defs.is_empty() && defs.iter().all(|d| workspace.scopes.contains_key(&d.scope))
}

/// File renames implied by renaming every `moduleName` define in `defs`
/// (there is ordinarily exactly one) to `new_name`, following the same
/// directory-plus-stem convention the loader uses to map a module's
/// qualified name onto a file path.
fn renames_for_files(defs: &[Define], new_name: &str) -> Vec<(Arc<str>, Arc<str>)> {
    defs.iter()
        .filter(|d| d.role == IdentifierRole::ModuleName)
        .map(|d| {
            let from = d.defined_at.file.clone();
            let to = derive_renamed_path(&from, new_name);
            (from, to)
        })
        .collect()
}

fn derive_renamed_path(path: &Arc<str>, new_name: &str) -> Arc<str> {
    let source_path = std::path::Path::new(path.as_ref());
    let ext = source_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(rn_workspace_index::SOURCE_EXTENSION);
    let renamed = match source_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(format!("{new_name}.{ext}")),
        _ => std::path::PathBuf::from(format!("{new_name}.{ext}")),
    };
    renamed.to_string_lossy().into_owned().into()
}

#[cfg(test)]
mod tests {
    use rn_ast::{ParserOracle, ToyAnalyzer, ToyParser, TypeCheckerOracle};
    use rn_symbol_types::Cursor;
    use rn_test_support::must;

    use super::*;

    fn model(source: &str) -> rn_ast::FileModel {
        let tree = must(ToyParser.parse("/ws/M.lang", source));
        must(ToyAnalyzer.analyze(&tree))
    }

    fn workspace_info(source: &str) -> WorkspaceInfo {
        let file_model = model(source);
        let mut info = WorkspaceInfo::default();
        let file: Arc<str> = "/ws/M.lang".into();
        info.source_files.insert(file.clone());
        info.defines.extend(file_model.defines);
        info.use_def.extend(file_model.use_def);
        info.facts.extend(file_model.facts);
        info.scopes.extend(file_model.scopes);
        if let Some((name, loc)) = file_model.module {
            info.modules.insert(name, loc);
        }
        info
    }

    #[test]
    fn overloaded_functions_resolve_together() {
        let info = workspace_info(
            "module M;\nint f(int a) { return a; }\nint f(int a, int b) { return a; }\n",
        );
        let f1 = must(info.defines.iter().find(|d| d.name == "f").ok_or("expected a function define"));
        let cursor = Cursor::new(rn_symbol_types::CursorKind::Definition, f1.defined_at.clone(), "f");
        let resolved = resolve(&info, &info.defines.clone(), &cursor, "g");
        let function_defines: Vec<_> = resolved.defs.iter().filter(|d| d.name == "f").collect();
        assert_eq!(function_defines.len(), 2);
    }

    #[test]
    fn parameter_rename_is_function_local() {
        let info = workspace_info("module M;\nint f(int a) { return a; }\n");
        let param = must(info.defines.iter().find(|d| d.name == "a").ok_or("param a missing"));
        let cursor = Cursor::new(rn_symbol_types::CursorKind::Definition, param.defined_at.clone(), "a");
        let resolved = resolve(&info, &info.defines.clone(), &cursor, "x");
        assert!(resolved.function_local);
        assert_eq!(resolved.defs.len(), 1);
    }

    #[test]
    fn module_rename_is_never_function_local_and_emits_file_rename() {
        let info = workspace_info("module M;\n");
        let module_define = must(info.defines.iter().find(|d| d.name == "M").ok_or("module M missing"));
        let cursor = Cursor::new(rn_symbol_types::CursorKind::ModuleName, module_define.defined_at.clone(), "M");
        let resolved = resolve(&info, &info.defines.clone(), &cursor, "N");
        assert!(!resolved.function_local);
        assert_eq!(resolved.renames_for_files, vec![("/ws/M.lang".into(), "/ws/N.lang".into())]);
    }
}
