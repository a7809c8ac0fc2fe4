//! Rename Driver (spec §4.7): the single `rename()` entry point that wires
//! Classifier, Resolver, Legality Checker and Edit Planner together over a
//! transient, per-call [`WorkspaceIndex`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rn_ast::{Node, ParserOracle, TypeCheckerOracle};
use rn_source::SourceLocation;
use rn_workspace_index::{PathConfigForFolder, SourceFileProvider, WorkspaceIndex};

use crate::cancellation::CancellationToken;
use crate::error::RenameError;
use crate::progress::{ProgressReporter, RenameStep};

/// Orchestrates one rename request (spec §5: "the rename engine itself is
/// single-flow per request... each [call] owns its own transient
/// `WorkspaceInfo` with no shared mutable state").
///
/// Holds the same consumed interfaces [`WorkspaceIndex`] does, plus its own
/// copies of the parser and file provider: `WorkspaceIndex::merge_text`
/// discards every tree it parses once the type-checker has extracted a
/// `FileModel` from it, so the Edit Planner's need for live `Node` trees
/// (§4.6 step 1) has to be served by re-reading and re-parsing, not by
/// asking the index for a cache it doesn't keep.
pub struct RenameDriver {
    provider: Arc<dyn SourceFileProvider>,
    parser: Arc<dyn ParserOracle + Send + Sync>,
    checker: Arc<dyn TypeCheckerOracle + Send + Sync>,
    path_config: Arc<dyn PathConfigForFolder + Send + Sync>,
}

impl RenameDriver {
    /// Bind a driver to its consumed interfaces (spec §6).
    pub fn new(
        provider: Arc<dyn SourceFileProvider>,
        parser: Arc<dyn ParserOracle + Send + Sync>,
        checker: Arc<dyn TypeCheckerOracle + Send + Sync>,
        path_config: Arc<dyn PathConfigForFolder + Send + Sync>,
    ) -> Self {
        RenameDriver { provider, parser, checker, path_config }
    }

    fn new_index(&self) -> WorkspaceIndex {
        WorkspaceIndex::new(
            self.provider.clone(),
            self.parser.clone(),
            self.checker.clone(),
            self.path_config.clone(),
        )
    }

    fn file_id(path: &Path) -> Arc<str> {
        path.to_string_lossy().into_owned().into()
    }

    fn read_and_parse(&self, path: &Path) -> Result<(Arc<str>, Node), RenameError> {
        let file = Self::file_id(path);
        let text = self
            .provider
            .read(path)
            .map_err(|err| RenameError::UnexpectedFailure(format!("{}: {err}", file)))?;
        let tree = self
            .parser
            .parse(&file, &text)
            .map_err(|err| RenameError::UnexpectedFailure(format!("{}: {err}", file)))?;
        Ok((file, tree))
    }

    /// `prepareRename`-style capability check: can the cursor at `position`
    /// be renamed at all? Returns the identifier's own location and current
    /// name without running resolution, legality, or edit planning.
    pub fn can_rename_at(
        &self,
        cursor_file: &Path,
        workspace_folders: &[PathBuf],
        position: usize,
    ) -> Result<Option<(SourceLocation, String)>, RenameError> {
        let idx = self.new_index();
        idx.preload(cursor_file, workspace_folders)
            .map_err(|err| RenameError::UnexpectedFailure(err.to_string()))?;
        let (_, tree) = self.read_and_parse(cursor_file)?;
        let snapshot = idx.snapshot();
        match rn_core::classify(&tree, &snapshot, position) {
            Ok(cursor) => Ok(Some((cursor.location, cursor.name))),
            Err(rn_core::ClassifyError::Unsupported(_)) => Ok(None),
            Err(rn_core::ClassifyError::Illegal(reason)) => Err(RenameError::IllegalRename(vec![reason])),
        }
    }

    /// `rename(cursorTree, workspaceFolders, newName, pathConfigForFolder)`
    /// (spec §4.7), driven by a `cursorFile`/`position` pair instead of a
    /// pre-parsed tree, since the driver — not its caller — owns parsing.
    pub fn rename(
        &self,
        cursor_file: &Path,
        position: usize,
        workspace_folders: &[PathBuf],
        new_name: &str,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<rn_core::PlannedEdits, RenameError> {
        progress.report(RenameStep::Preload);
        check_cancelled(cancel)?;
        let idx = self.new_index();
        idx.preload(cursor_file, workspace_folders)
            .map_err(|err| RenameError::UnexpectedFailure(err.to_string()))?;

        progress.report(RenameStep::Classify);
        check_cancelled(cancel)?;
        let (cursor_file_id, cursor_tree) = self.read_and_parse(cursor_file)?;
        let mut snapshot = idx.snapshot();
        let cursor = rn_core::classify(&cursor_tree, &snapshot, position).map_err(|err| match err {
            rn_core::ClassifyError::Unsupported(issues) => RenameError::UnsupportedRename(issues),
            rn_core::ClassifyError::Illegal(reason) => RenameError::IllegalRename(vec![reason]),
        })?;

        // Identity rename (spec §8 invariant 1): always legal, always a
        // no-op, and never worth resolving or full-loading for.
        if cursor.name == new_name {
            return Ok(rn_core::PlannedEdits::default());
        }

        progress.report(RenameStep::FullLoad);
        check_cancelled(cancel)?;
        let seed = [cursor.location.clone()];
        let reachable = idx.reachable_defs(&seed);
        let preliminary = rn_core::resolve(&snapshot, &reachable, &cursor, new_name);
        let mut resolved = if preliminary.function_local {
            preliminary
        } else {
            idx.full_load(&cursor.name).map_err(|err| RenameError::UnexpectedFailure(err.to_string()))?;
            snapshot = idx.snapshot();
            let reachable = idx.reachable_defs(&seed);
            rn_core::resolve(&snapshot, &reachable, &cursor, new_name)
        };

        progress.report(RenameStep::Resolve);
        check_cancelled(cancel)?;

        progress.report(RenameStep::Legality);
        let reasons = rn_core::check_legality(&snapshot, &resolved, new_name);
        if !reasons.is_empty() {
            return Err(RenameError::IllegalRename(reasons));
        }
        check_cancelled(cancel)?;

        progress.report(RenameStep::EditPlanning);
        let trees = self.trees_for(&mut resolved, &cursor_file_id, cursor_tree, &cursor.name, new_name)?;
        rn_core::plan(&trees, &resolved, &cursor.kind, new_name).map_err(RenameError::UnsupportedRename)
    }

    /// Gather a parsed tree for every file the resolved defs/uses touch
    /// (spec §7's propagation policy: a non-cursor file whose parse fails
    /// is an `unexpectedFailure` only if its text mentions the old or new
    /// name; otherwise it is silently dropped from the rename rather than
    /// aborting the whole request).
    fn trees_for(
        &self,
        resolved: &mut rn_core::Resolved,
        cursor_file: &Arc<str>,
        cursor_tree: Node,
        old_name: &str,
        new_name: &str,
    ) -> Result<HashMap<Arc<str>, Node>, RenameError> {
        let mut trees = HashMap::new();
        trees.insert(cursor_file.clone(), cursor_tree);

        let mut files: Vec<Arc<str>> = resolved
            .defs
            .iter()
            .map(|d| d.defined_at.file.clone())
            .chain(resolved.uses.iter().map(|u| u.file.clone()))
            .collect();
        files.sort();
        files.dedup();

        let mut skipped: HashSet<Arc<str>> = HashSet::new();
        for file in files {
            if trees.contains_key(&file) {
                continue;
            }
            let path = PathBuf::from(file.as_ref());
            let text = self
                .provider
                .read(&path)
                .map_err(|err| RenameError::UnexpectedFailure(format!("{file}: {err}")))?;
            match self.parser.parse(&file, &text) {
                Ok(tree) => {
                    trees.insert(file.clone(), tree);
                }
                Err(err) => {
                    if text.contains(old_name) || text.contains(new_name) {
                        return Err(RenameError::UnexpectedFailure(format!("{file}: {err}")));
                    }
                    tracing::debug!(
                        %file,
                        %err,
                        "skipping unparsable file with no textual mention of old or new name"
                    );
                    skipped.insert(file);
                }
            }
        }

        if !skipped.is_empty() {
            resolved.defs.retain(|d| !skipped.contains(&d.defined_at.file));
            resolved.uses.retain(|u| !skipped.contains(&u.file));
        }
        Ok(trees)
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), RenameError> {
    if cancel.is_cancelled() { Err(RenameError::Cancelled) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use rn_ast::{ToyAnalyzer, ToyParser};
    use rn_test_support::{must, must_err};
    use rn_workspace_index::{InMemorySourceProvider, WorkspacePathConfig};

    use super::*;
    use crate::progress::NoopProgress;

    struct NoConfig;
    impl PathConfigForFolder for NoConfig {
        fn path_config_for_folder(&self, _folder: &Path) -> Option<WorkspacePathConfig> {
            None
        }
    }

    fn driver(files: Vec<(&str, &str)>) -> RenameDriver {
        let provider = InMemorySourceProvider::new(
            files.into_iter().map(|(p, t)| (PathBuf::from(p), t.to_string())),
        );
        RenameDriver::new(Arc::new(provider), Arc::new(ToyParser), Arc::new(ToyAnalyzer), Arc::new(NoConfig))
    }

    #[test]
    fn parameter_rename_produces_two_replacements_without_full_load() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let driver = driver(vec![("/ws/M.lang", source)]);
        let param_pos = source.find("int a)").map(|p| p + 4).expect("param a present");
        let plan = must(driver.rename(
            Path::new("/ws/M.lang"),
            param_pos,
            &[PathBuf::from("/ws")],
            "x",
            &NoopProgress,
            &CancellationToken::new(),
        ));
        assert_eq!(plan.edits.len(), 1);
        match &plan.edits[0] {
            rn_core::DocumentEdit::Changed { edits, .. } => assert_eq!(edits.len(), 2),
            other => panic!("expected a Changed edit, got {other:?}"),
        }
    }

    #[test]
    fn identity_rename_is_a_no_op() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let driver = driver(vec![("/ws/M.lang", source)]);
        let param_pos = source.find("int a)").map(|p| p + 4).expect("param a present");
        let plan = must(driver.rename(
            Path::new("/ws/M.lang"),
            param_pos,
            &[PathBuf::from("/ws")],
            "a",
            &NoopProgress,
            &CancellationToken::new(),
        ));
        assert!(plan.edits.is_empty());
    }

    #[test]
    fn cross_module_rename_triggers_full_load_and_rewrites_both_files() {
        let main = "module Main;\nimport M;\nint g(D x) { return x.foo; }\n";
        let data = "module M;\ndata D = d(int foo);\n";
        let driver = driver(vec![("/ws/Main.lang", main), ("/ws/M.lang", data)]);
        let field_pos = main.rfind("x.foo").map(|p| p + 2).expect("field access present");
        let plan = must(driver.rename(
            Path::new("/ws/Main.lang"),
            field_pos,
            &[PathBuf::from("/ws")],
            "bar",
            &NoopProgress,
            &CancellationToken::new(),
        ));
        let touched: HashSet<_> = plan
            .edits
            .iter()
            .filter_map(|e| match e {
                rn_core::DocumentEdit::Changed { file, .. } => Some(file.clone()),
                _ => None,
            })
            .collect();
        assert!(touched.contains(&Arc::<str>::from("/ws/Main.lang")));
        assert!(touched.contains(&Arc::<str>::from("/ws/M.lang")));
    }

    #[test]
    fn already_cancelled_token_aborts_before_any_work() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let driver = driver(vec![("/ws/M.lang", source)]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let param_pos = source.find("int a)").map(|p| p + 4).expect("param a present");
        let err = must_err(driver.rename(
            Path::new("/ws/M.lang"),
            param_pos,
            &[PathBuf::from("/ws")],
            "x",
            &NoopProgress,
            &cancel,
        ));
        assert_eq!(err, RenameError::Cancelled);
    }

    #[test]
    fn can_rename_at_reports_the_current_name_without_planning_edits() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let driver = driver(vec![("/ws/M.lang", source)]);
        let param_pos = source.find("int a)").map(|p| p + 4).expect("param a present");
        let found = must(driver.can_rename_at(Path::new("/ws/M.lang"), &[PathBuf::from("/ws")], param_pos));
        let (_, name) = must(found.ok_or("expected a renameable cursor"));
        assert_eq!(name, "a");
    }
}
