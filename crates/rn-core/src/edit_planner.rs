//! Edit Planner (spec §4.6).

use std::collections::HashMap;
use std::sync::Arc;

use rn_ast::Node;
use rn_source::SourceLocation;
use rn_symbol_types::CursorKind;

use crate::escape::escape;
use crate::locator;
use crate::resolver::Resolved;
use crate::types::{DocumentEdit, PlannedEdits, TextEdit, UnsupportedRenameIssue};

/// Plan every edit implied by `resolved`, given the parsed syntax tree for
/// each file it touches. `trees` must contain an entry for every file
/// `resolved.defs`/`resolved.uses` names; a missing tree is reported as an
/// `UnsupportedRename` issue rather than panicking, since a production
/// oracle may legitimately fail to parse a touched file (spec §7
/// propagation policy is the Driver's concern, not this function's).
pub fn plan(
    trees: &HashMap<Arc<str>, Node>,
    resolved: &Resolved,
    cursor_kind: &CursorKind,
    new_name: &str,
) -> Result<PlannedEdits, Vec<UnsupportedRenameIssue>> {
    let new_text = escape(new_name);
    let locations_by_file = group_by_file(resolved);

    let mut edits = Vec::new();
    let mut issues = Vec::new();

    for (file, locations) in locations_by_file {
        let Some(tree) = trees.get(&file) else {
            issues.push(UnsupportedRenameIssue {
                location: SourceLocation::new(file.clone(), 0, 0),
                message: "no parsed syntax tree available for this file".to_string(),
            });
            continue;
        };
        match locator::locate_all(tree, &locations) {
            Ok(sub_locations) => {
                let file_edits = locations
                    .iter()
                    .map(|loc| TextEdit {
                        range: sub_locations[loc].clone(),
                        new_text: new_text.clone(),
                        annotation: None,
                    })
                    .collect();
                edits.push(DocumentEdit::Changed { file: file.clone(), edits: file_edits });
            }
            Err(locator::LocatorError(missing)) => {
                issues.extend(missing.into_iter().map(UnsupportedRenameIssue::from));
            }
        }
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    if matches!(cursor_kind, CursorKind::ModuleName) {
        for (from, to) in &resolved.renames_for_files {
            edits.push(DocumentEdit::Renamed { from: from.clone(), to: to.clone() });
        }
    }

    Ok(PlannedEdits { edits, annotations: HashMap::new() })
}

/// Every def and use occurrence in `resolved`, grouped by file.
fn group_by_file(resolved: &Resolved) -> HashMap<Arc<str>, Vec<SourceLocation>> {
    let mut by_file: HashMap<Arc<str>, Vec<SourceLocation>> = HashMap::new();
    for def in &resolved.defs {
        by_file.entry(def.defined_at.file.clone()).or_default().push(def.defined_at.clone());
    }
    for use_loc in &resolved.uses {
        by_file.entry(use_loc.file.clone()).or_default().push(use_loc.clone());
    }
    by_file
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use rn_ast::{ParserOracle, ToyAnalyzer, ToyParser};
    use rn_symbol_types::Cursor;
    use rn_test_support::{must, must_err};
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
    fn parameter_rename_emits_one_changed_edit_with_two_replacements() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let idx = index(vec![("/ws/M.lang", source)]);
        must(idx.preload(Path::new("/ws/M.lang"), &[PathBuf::from("/ws")]));
        let info = idx.snapshot();
        let param = must(info.defines.iter().find(|d| d.name == "a").ok_or("param a missing"));
        let cursor = Cursor::new(rn_symbol_types::CursorKind::Definition, param.defined_at.clone(), "a");
        let reachable = idx.reachable_defs(&[cursor.location.clone()]);
        let resolved = resolve(&info, &reachable, &cursor, "x");

        let mut trees = HashMap::new();
        trees.insert(
            Arc::<str>::from("/ws/M.lang"),
            must(ToyParser.parse("/ws/M.lang", source)),
        );

        let planned = must(plan(&trees, &resolved, &cursor.kind, "x"));
        assert_eq!(planned.edits.len(), 1);
        match &planned.edits[0] {
            DocumentEdit::Changed { file, edits } => {
                assert_eq!(file.as_ref(), "/ws/M.lang");
                assert_eq!(edits.len(), 2);
                assert!(edits.iter().all(|e| e.new_text == "x"));
            }
            other => panic!("expected a Changed edit, got {other:?}"),
        }
    }

    #[test]
    fn missing_tree_is_reported_as_unsupported() {
        let source = "module M;\nint a = 1;\n";
        let idx = index(vec![("/ws/M.lang", source)]);
        must(idx.preload(Path::new("/ws/M.lang"), &[PathBuf::from("/ws")]));
        let info = idx.snapshot();
        let a = must(info.defines.iter().find(|d| d.name == "a").ok_or("a missing"));
        let cursor = Cursor::new(rn_symbol_types::CursorKind::Definition, a.defined_at.clone(), "a");
        let reachable = idx.reachable_defs(&[cursor.location.clone()]);
        let resolved = resolve(&info, &reachable, &cursor, "x");

        let trees = HashMap::new();
        let err = must_err(plan(&trees, &resolved, &cursor.kind, "x"));
        assert_eq!(err.len(), 1);
    }
}
