//! End-to-end scenarios from spec §8, driven through [`RenameDriver`]
//! rather than any one component in isolation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rn_ast::{ToyAnalyzer, ToyParser};
use rn_core::{DocumentEdit, IllegalRenameReason};
use rn_driver::{CancellationToken, NoopProgress, RenameDriver, RenameError};
use rn_test_support::{must, must_err};
use rn_workspace_index::{InMemorySourceProvider, PathConfigForFolder, WorkspacePathConfig};

struct NoConfig;
impl PathConfigForFolder for NoConfig {
    fn path_config_for_folder(&self, _folder: &Path) -> Option<WorkspacePathConfig> {
        None
    }
}

fn driver(files: Vec<(&str, &str)>) -> RenameDriver {
    let provider =
        InMemorySourceProvider::new(files.into_iter().map(|(p, t)| (PathBuf::from(p), t.to_string())));
    RenameDriver::new(Arc::new(provider), Arc::new(ToyParser), Arc::new(ToyAnalyzer), Arc::new(NoConfig))
}

fn changed_files(edits: &[DocumentEdit]) -> HashSet<Arc<str>> {
    edits
        .iter()
        .filter_map(|e| match e {
            DocumentEdit::Changed { file, .. } => Some(file.clone()),
            _ => None,
        })
        .collect()
}

/// S2: renaming top-level `a` onto a sibling `b` is a double declaration.
#[test]
fn s2_renaming_top_level_variable_onto_a_sibling_is_illegal() {
    let source = "module M;\nint a = 1;\nint b = 2;\nint f(int a) { return a; }\n";
    let driver = driver(vec![("/ws/M.lang", source)]);
    let a_pos = source.find("int a = 1").map(|p| p + 4).expect("top-level a present");

    let err = must_err(driver.rename(
        Path::new("/ws/M.lang"),
        a_pos,
        &[PathBuf::from("/ws")],
        "b",
        &NoopProgress,
        &CancellationToken::new(),
    ));
    match err {
        RenameError::IllegalRename(reasons) => {
            assert!(reasons.iter().any(|r| matches!(r, IllegalRenameReason::DoubleDeclaration { .. })));
        }
        other => panic!("expected IllegalRename, got {other:?}"),
    }
}

/// S3, the non-overloadable branch: `a` (a variable) and `f` (a function)
/// are distinct, non-overloadable roles, so renaming `a` to `f` is a
/// double declaration rather than a capture.
#[test]
fn s3_renaming_variable_onto_a_differently_rolled_name_is_a_double_declaration_not_a_capture() {
    let source = "module M;\nint a = 1;\nint f(int x) { return x; }\n";
    let driver = driver(vec![("/ws/M.lang", source)]);
    let a_pos = source.find("int a = 1").map(|p| p + 4).expect("top-level a present");

    let err = must_err(driver.rename(
        Path::new("/ws/M.lang"),
        a_pos,
        &[PathBuf::from("/ws")],
        "f",
        &NoopProgress,
        &CancellationToken::new(),
    ));
    match err {
        RenameError::IllegalRename(reasons) => {
            assert_eq!(reasons.len(), 1);
            assert!(matches!(reasons[0], IllegalRenameReason::DoubleDeclaration { .. }));
        }
        other => panic!("expected IllegalRename, got {other:?}"),
    }
}

/// S4: renaming to the current name is always a legal no-op, even when a
/// same-named sibling exists elsewhere that would otherwise collide.
#[test]
fn s4_identity_rename_of_top_level_variable_is_a_no_op() {
    let source = "module M;\nint a = 1;\nint b = 2;\n";
    let driver = driver(vec![("/ws/M.lang", source)]);
    let a_pos = source.find("int a = 1").map(|p| p + 4).expect("top-level a present");

    let plan = must(driver.rename(
        Path::new("/ws/M.lang"),
        a_pos,
        &[PathBuf::from("/ws")],
        "a",
        &NoopProgress,
        &CancellationToken::new(),
    ));
    assert!(plan.edits.is_empty());
}

/// S6: renaming a module rewrites every import site across the workspace
/// and emits a file rename, without ever full-loading files that never
/// mention the module at all.
#[test]
fn s6_module_rename_rewrites_import_sites_and_renames_the_file() {
    let data = "module M;\ndata D = d(int foo);\n";
    let main = "module Main;\nimport M;\nint g(D x) { return x.foo; }\n";
    let driver = driver(vec![("/ws/M.lang", data), ("/ws/Main.lang", main)]);
    let module_pos = data.find('M').expect("module name present");

    let plan = must(driver.rename(
        Path::new("/ws/M.lang"),
        module_pos,
        &[PathBuf::from("/ws")],
        "N",
        &NoopProgress,
        &CancellationToken::new(),
    ));

    let touched = changed_files(&plan.edits);
    assert!(touched.contains(&Arc::<str>::from("/ws/Main.lang")), "import site must be rewritten");

    let renamed = plan.edits.iter().any(|e| {
        matches!(e, DocumentEdit::Renamed { from, to }
            if from.as_ref() == "/ws/M.lang" && to.as_ref() == "/ws/N.lang")
    });
    assert!(renamed, "expected a Renamed(/ws/M.lang, /ws/N.lang) edit, got {:?}", plan.edits);
}

/// Invariant 2 (determinism): two independent calls over the same
/// workspace snapshot and inputs produce the same edit set, modulo order.
#[test]
fn determinism_repeated_calls_over_the_same_snapshot_agree() {
    let source = "module M;\nint f(int a) { return a; }\n";
    let driver = driver(vec![("/ws/M.lang", source)]);
    let param_pos = source.find("int a)").map(|p| p + 4).expect("param a present");

    let first = must(driver.rename(
        Path::new("/ws/M.lang"),
        param_pos,
        &[PathBuf::from("/ws")],
        "x",
        &NoopProgress,
        &CancellationToken::new(),
    ));
    let second = must(driver.rename(
        Path::new("/ws/M.lang"),
        param_pos,
        &[PathBuf::from("/ws")],
        "x",
        &NoopProgress,
        &CancellationToken::new(),
    ));

    let mut first_edits = first.edits;
    let mut second_edits = second.edits;
    first_edits.sort_by_key(|e| format!("{e:?}"));
    second_edits.sort_by_key(|e| format!("{e:?}"));
    assert_eq!(first_edits, second_edits);
}

/// Invariant 5 (no-op on failure): a rename that fails legality never
/// leaks a partial edit list alongside the error.
#[test]
fn no_op_on_failure_illegal_rename_returns_only_the_error() {
    let source = "module M;\nint a = 1;\nint b = 2;\n";
    let driver = driver(vec![("/ws/M.lang", source)]);
    let a_pos = source.find("int a = 1").map(|p| p + 4).expect("top-level a present");

    let result = driver.rename(
        Path::new("/ws/M.lang"),
        a_pos,
        &[PathBuf::from("/ws")],
        "b",
        &NoopProgress,
        &CancellationToken::new(),
    );
    assert!(result.is_err(), "double declaration must be rejected, not partially planned");
}

/// Invariant 6 (escape round-trip): renaming to a reserved word produces
/// an edit whose replacement text is the backslash-escaped form, not the
/// bare reserved word.
#[test]
fn escape_round_trip_reserved_word_new_name_is_escaped_in_the_edit() {
    let source = "module M;\nint f(int a) { return a; }\n";
    let driver = driver(vec![("/ws/M.lang", source)]);
    let param_pos = source.find("int a)").map(|p| p + 4).expect("param a present");

    let plan = must(driver.rename(
        Path::new("/ws/M.lang"),
        param_pos,
        &[PathBuf::from("/ws")],
        "data",
        &NoopProgress,
        &CancellationToken::new(),
    ));
    match &plan.edits[0] {
        DocumentEdit::Changed { edits, .. } => {
            assert!(edits.iter().all(|e| e.new_text == "\\data"));
        }
        other => panic!("expected a Changed edit, got {other:?}"),
    }
}
