//! Workspace/path configuration (spec §6 "Workspace/path config (consumed)").

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-folder source roots and ignore patterns, as the host supplies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspacePathConfig {
    /// Directories under the folder that hold source files to consider.
    pub source_roots: Vec<PathBuf>,
    /// Glob-style patterns identifying paths to exclude from full-load.
    pub ignore_patterns: Vec<String>,
}

impl WorkspacePathConfig {
    /// Does `path` match one of this config's ignore patterns?
    ///
    /// Patterns are plain substrings, not full globs: the toy workspace
    /// index only needs "does this path contain `target/` or similar",
    /// matching the coarse-grained ignoring a production implementation
    /// would layer a real glob matcher underneath.
    pub fn is_ignored(&self, path: &std::path::Path) -> bool {
        let path_str = path.to_string_lossy();
        self.ignore_patterns.iter().any(|pat| path_str.contains(pat.as_str()))
    }
}

/// Yields the `(sourceRoots, ignorePatterns)` for one workspace folder.
pub trait PathConfigForFolder {
    /// Look up the path config for `folder`, if the host has one.
    fn path_config_for_folder(&self, folder: &std::path::Path) -> Option<WorkspacePathConfig>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_pattern_matches_substring() {
        let cfg = WorkspacePathConfig {
            source_roots: vec![],
            ignore_patterns: vec!["generated/".to_string()],
        };
        assert!(cfg.is_ignored(std::path::Path::new("/ws/generated/Foo.lang")));
        assert!(!cfg.is_ignored(std::path::Path::new("/ws/src/Foo.lang")));
    }
}
