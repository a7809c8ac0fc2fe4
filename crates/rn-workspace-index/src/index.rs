//! `WorkspaceInfo` and `WorkspaceIndex` (spec §3, §4.2).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rn_ast::{ParserOracle, TypeCheckerOracle};
use rn_source::{SourceLocation, longest_prefix_folder};
use rn_symbol_types::Define;
use rn_symbol_types::Type;
use tracing::{debug, trace};

use crate::error::WorkspaceIndexError;
use crate::loaded::Loaded;
use crate::path_config::PathConfigForFolder;
use crate::provider::{SOURCE_EXTENSION, SourceFileProvider};

/// The lazily-populated union of facts gathered about a workspace during
/// one rename (spec §3 "WorkspaceInfo").
#[derive(Debug, Clone, Default)]
pub struct WorkspaceInfo {
    /// Every definition imported from any loaded file.
    pub defines: Vec<Define>,
    /// Use→def relation, merged across every loaded file.
    pub use_def: HashMap<SourceLocation, SourceLocation>,
    /// Static-type facts, merged across every loaded file.
    pub facts: HashMap<SourceLocation, Type>,
    /// Inner→outer scope relation, merged across every loaded file.
    pub scopes: HashMap<SourceLocation, SourceLocation>,
    /// The set of workspace-reachable source files (as file ids).
    pub source_files: HashSet<Arc<str>>,
    /// Qualified module name → the module header's scope location.
    pub modules: HashMap<String, SourceLocation>,
    /// How much of the workspace has been imported so far.
    pub loaded: Loaded,
    /// Bookkeeping for the import half of the scope/import graph:
    /// `(importing module's scope, imported qualified name)`. Resolved
    /// against `modules` lazily by `reachable_defs`, since the imported
    /// module may not be loaded yet at merge time.
    pending_imports: Vec<(SourceLocation, String)>,
}

impl WorkspaceInfo {
    fn merge(&mut self, file: &Arc<str>, model: rn_ast::FileModel) {
        self.source_files.insert(file.clone());
        self.defines.extend(model.defines);
        self.use_def.extend(model.use_def);
        self.facts.extend(model.facts);
        self.scopes.extend(model.scopes);
        if let Some((name, loc)) = model.module {
            self.modules.insert(name, loc.clone());
            for imported in model.imports {
                self.pending_imports.push((loc.clone(), imported));
            }
        }
    }

    /// Build the bidirectional scope/import adjacency used by
    /// [`WorkspaceIndex::reachable_defs`].
    fn scope_graph(&self) -> HashMap<SourceLocation, Vec<SourceLocation>> {
        let mut graph: HashMap<SourceLocation, Vec<SourceLocation>> = HashMap::new();
        let mut add_edge = |a: SourceLocation, b: SourceLocation| {
            graph.entry(a.clone()).or_default().push(b.clone());
            graph.entry(b).or_default().push(a);
        };
        for (inner, outer) in &self.scopes {
            add_edge(inner.clone(), outer.clone());
        }
        for (module_loc, imported_name) in &self.pending_imports {
            if let Some(target) = self.modules.get(imported_name) {
                add_edge(module_loc.clone(), target.clone());
            }
        }
        graph
    }
}

struct KnownFile {
    loaded: bool,
}

/// Operations over a [`WorkspaceInfo`] (spec §4.2): lazy preload/full-load,
/// name-containment screening, and reachability queries.
pub struct WorkspaceIndex {
    info: RwLock<WorkspaceInfo>,
    known_files: RwLock<HashMap<PathBuf, KnownFile>>,
    workspace_folders: RwLock<Vec<PathBuf>>,
    provider: Arc<dyn SourceFileProvider>,
    parser: Arc<dyn ParserOracle + Send + Sync>,
    checker: Arc<dyn TypeCheckerOracle + Send + Sync>,
    path_config: Arc<dyn PathConfigForFolder + Send + Sync>,
}

impl WorkspaceIndex {
    /// Build an empty index bound to the given consumed interfaces.
    pub fn new(
        provider: Arc<dyn SourceFileProvider>,
        parser: Arc<dyn ParserOracle + Send + Sync>,
        checker: Arc<dyn TypeCheckerOracle + Send + Sync>,
        path_config: Arc<dyn PathConfigForFolder + Send + Sync>,
    ) -> Self {
        WorkspaceIndex {
            info: RwLock::new(WorkspaceInfo::default()),
            known_files: RwLock::new(HashMap::new()),
            workspace_folders: RwLock::new(Vec::new()),
            provider,
            parser,
            checker,
            path_config,
        }
    }

    /// `preload(cursorFile, rootFolder)` (spec §4.2 item 1): parse just the
    /// cursor file and import its model. `workspace_folders` is the full
    /// set of folders the driver was given; the folder with the longest
    /// matching prefix of `cursor_file` becomes this index's root for a
    /// later `full_load`.
    pub fn preload(
        &self,
        cursor_file: &Path,
        workspace_folders: &[PathBuf],
    ) -> Result<(), WorkspaceIndexError> {
        let folders: Vec<&Path> = workspace_folders.iter().map(PathBuf::as_path).collect();
        longest_prefix_folder(folders, cursor_file).ok_or_else(|| {
            WorkspaceIndexError::NoEnclosingFolder { file: cursor_file.display().to_string() }
        })?;
        *self.workspace_folders.write() = workspace_folders.to_vec();

        debug!(file = %cursor_file.display(), "preloading cursor file");
        self.load_file(cursor_file)?;
        self.info.write().loaded = Loaded::Empty.advance_to_preloaded();
        Ok(())
    }

    /// `fullLoad()` (spec §4.2 item 2): import every candidate file under
    /// any workspace folder whose text mentions `cursor_name` or its
    /// escaped form `\cursor_name`, skipping files already loaded.
    pub fn full_load(&self, cursor_name: &str) -> Result<(), WorkspaceIndexError> {
        if matches!(self.info.read().loaded, Loaded::Full) {
            return Ok(());
        }
        debug!(cursor_name, "starting full workspace load");
        let escaped = format!("\\{cursor_name}");
        let folders = self.workspace_folders.read().clone();

        for folder in &folders {
            let config = self.path_config.path_config_for_folder(folder).unwrap_or_default();
            let roots = if config.source_roots.is_empty() {
                vec![folder.clone()]
            } else {
                config.source_roots.clone()
            };
            for root in roots {
                let candidates = self
                    .provider
                    .discover(&root)
                    .map_err(|_| WorkspaceIndexError::NoEnclosingFolder {
                        file: root.display().to_string(),
                    })?;
                for candidate in candidates {
                    if config.is_ignored(&candidate) {
                        continue;
                    }
                    if self.known_files.read().contains_key(&candidate) {
                        continue;
                    }
                    self.screen_and_maybe_load(&candidate, cursor_name, &escaped)?;
                }
            }
        }
        self.info.write().loaded = Loaded::Full;
        Ok(())
    }

    fn screen_and_maybe_load(
        &self,
        path: &Path,
        name: &str,
        escaped_name: &str,
    ) -> Result<(), WorkspaceIndexError> {
        let text = self.provider.read(path).map_err(|_| WorkspaceIndexError::NoEnclosingFolder {
            file: path.display().to_string(),
        })?;
        if !text.contains(name) && !text.contains(escaped_name) {
            trace!(file = %path.display(), "screened out: no textual mention of cursor name");
            self.known_files.write().insert(path.to_path_buf(), KnownFile { loaded: false });
            return Ok(());
        }
        trace!(file = %path.display(), "loading: name-containment screen matched");
        self.merge_text(path, text)
    }

    fn load_file(&self, path: &Path) -> Result<(), WorkspaceIndexError> {
        if self.known_files.read().get(path).is_some_and(|k| k.loaded) {
            return Ok(());
        }
        let text =
            self.provider.read(path).map_err(|_| WorkspaceIndexError::NoEnclosingFolder {
                file: path.display().to_string(),
            })?;
        self.merge_text(path, text)
    }

    fn merge_text(&self, path: &Path, text: String) -> Result<(), WorkspaceIndexError> {
        let file_id: Arc<str> = path.to_string_lossy().into_owned().into();
        let tree = self.parser.parse(&file_id, &text).map_err(|source| {
            WorkspaceIndexError::Load { file: file_id.to_string(), source }
        })?;
        let model = self.checker.analyze(&tree).map_err(|source| WorkspaceIndexError::Load {
            file: file_id.to_string(),
            source,
        })?;
        self.info.write().merge(&file_id, model);
        self.known_files.write().insert(path.to_path_buf(), KnownFile { loaded: true });
        Ok(())
    }

    /// `getDefs(loc)` (spec §4.2 item 3).
    pub fn get_defs(&self, loc: &SourceLocation) -> Vec<SourceLocation> {
        let info = self.info.read();
        match info.use_def.get(loc) {
            Some(def) => vec![def.clone()],
            None => vec![loc.clone()],
        }
    }

    /// `reachableDefs(seed)` (spec §4.2 item 4): the transitive closure of
    /// defines reachable via the scope and import relations from any
    /// element of `seed`.
    pub fn reachable_defs(&self, seed: &[SourceLocation]) -> Vec<Define> {
        let info = self.info.read();
        let graph = info.scope_graph();

        let mut roots: HashSet<SourceLocation> = HashSet::new();
        for loc in seed {
            if let Some(define) = info.defines.iter().find(|d| &d.defined_at == loc) {
                roots.insert(define.scope.clone());
            } else {
                roots.insert(loc.clone());
            }
        }

        let mut visited: HashSet<SourceLocation> = HashSet::new();
        let mut worklist: Vec<SourceLocation> = roots.into_iter().collect();
        while let Some(loc) = worklist.pop() {
            if !visited.insert(loc.clone()) {
                continue;
            }
            if let Some(neighbors) = graph.get(&loc) {
                for n in neighbors {
                    if !visited.contains(n) {
                        worklist.push(n.clone());
                    }
                }
            }
        }

        info.defines
            .iter()
            .filter(|d| visited.iter().any(|root| *root == d.scope || root.contains(&d.scope)))
            .cloned()
            .collect()
    }

    /// A consistent clone of the current `WorkspaceInfo`, for consumers
    /// (the Classifier, Resolver, Legality Checker) that run several
    /// queries over a stable snapshot rather than re-locking per query.
    pub fn snapshot(&self) -> WorkspaceInfo {
        self.info.read().clone()
    }

    /// The current `loaded` phase.
    pub fn loaded(&self) -> Loaded {
        self.info.read().loaded
    }

    /// The set of workspace-reachable source files registered so far.
    pub fn source_files(&self) -> HashSet<Arc<str>> {
        self.info.read().source_files.clone()
    }

    /// All currently-known defines (used by the Resolver/Legality Checker
    /// to scan for name collisions without re-deriving reachability).
    pub fn all_defines(&self) -> Vec<Define> {
        self.info.read().defines.clone()
    }

    /// Fact lookup (static type at a location), if known.
    pub fn fact_at(&self, loc: &SourceLocation) -> Option<Type> {
        self.info.read().facts.get(loc).cloned()
    }

    /// `SOURCE_EXTENSION` the index treats as a source file.
    pub fn source_extension(&self) -> &'static str {
        SOURCE_EXTENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_config::WorkspacePathConfig;
    use crate::provider::InMemorySourceProvider;
    use rn_ast::{ToyAnalyzer, ToyParser};
    use rn_test_support::must;

    struct NoConfig;
    impl PathConfigForFolder for NoConfig {
        fn path_config_for_folder(&self, _folder: &Path) -> Option<WorkspacePathConfig> {
            None
        }
    }

    fn index(files: Vec<(PathBuf, String)>) -> WorkspaceIndex {
        WorkspaceIndex::new(
            Arc::new(InMemorySourceProvider::new(files)),
            Arc::new(ToyParser),
            Arc::new(ToyAnalyzer),
            Arc::new(NoConfig),
        )
    }

    #[test]
    fn preload_imports_only_the_cursor_file() {
        let idx = index(vec![
            (PathBuf::from("/ws/A.lang"), "module A;\nint f(int a) { return a; }\n".to_string()),
            (PathBuf::from("/ws/B.lang"), "module B;\n".to_string()),
        ]);
        must(idx.preload(Path::new("/ws/A.lang"), &[PathBuf::from("/ws")]));
        assert_eq!(idx.loaded(), Loaded::Preloaded);
        assert_eq!(idx.source_files().len(), 1);
    }

    #[test]
    fn full_load_screens_out_files_without_the_cursor_name() {
        let idx = index(vec![
            (PathBuf::from("/ws/A.lang"), "module A;\nint f(int a) { return a; }\n".to_string()),
            (PathBuf::from("/ws/B.lang"), "module B;\nint g(int b) { return b; }\n".to_string()),
        ]);
        must(idx.preload(Path::new("/ws/A.lang"), &[PathBuf::from("/ws")]));
        must(idx.full_load("f"));
        assert_eq!(idx.loaded(), Loaded::Full);
        // B.lang never mentions "f", so it must not have been merged.
        assert_eq!(idx.source_files().len(), 1);
    }

    #[test]
    fn full_load_is_idempotent() {
        let idx = index(vec![(PathBuf::from("/ws/A.lang"), "module A;\n".to_string())]);
        must(idx.preload(Path::new("/ws/A.lang"), &[PathBuf::from("/ws")]));
        must(idx.full_load("A"));
        must(idx.full_load("A"));
        assert_eq!(idx.source_files().len(), 1);
    }

    #[test]
    fn get_defs_returns_loc_itself_when_not_a_use() {
        let idx = index(vec![(PathBuf::from("/ws/A.lang"), "module A;\n".to_string())]);
        must(idx.preload(Path::new("/ws/A.lang"), &[PathBuf::from("/ws")]));
        let loc = SourceLocation::new("/ws/A.lang", 0, 100);
        assert_eq!(idx.get_defs(&loc), vec![loc]);
    }

    #[test]
    fn reachable_defs_includes_nested_function_locals() {
        let idx = index(vec![(
            PathBuf::from("/ws/A.lang"),
            "module A;\nint f(int a) { return a; }\n".to_string(),
        )]);
        must(idx.preload(Path::new("/ws/A.lang"), &[PathBuf::from("/ws")]));
        let module_define = must(
            idx.all_defines().into_iter().find(|d| d.name == "A").ok_or("module define missing"),
        );
        let reached = idx.reachable_defs(&[module_define.scope]);
        assert!(reached.iter().any(|d| d.name == "f"));
        assert!(reached.iter().any(|d| d.name == "a"));
    }
}
