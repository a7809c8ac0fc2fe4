//! Source file discovery and reading, abstracted so tests never touch a
//! real filesystem.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// File extension the index treats as a source file worth considering for
/// full-load (spec §4.2: "every `*.rsc`-like file").
pub const SOURCE_EXTENSION: &str = "lang";

/// Reads and enumerates source files under a workspace folder.
pub trait SourceFileProvider: Send + Sync {
    /// Read one file's full text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// List every file with [`SOURCE_EXTENSION`] under `root`, recursively.
    fn discover(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// A real filesystem-backed provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSourceProvider;

impl SourceFileProvider for FsSourceProvider {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn discover(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        discover_into(root, &mut found)?;
        Ok(found)
    }
}

fn discover_into(dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            discover_into(&path, found)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION) {
            found.push(path);
        }
    }
    Ok(())
}

/// An in-memory provider for tests: a fixed map of path to text, with
/// `discover` returning every path under the queried root.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceProvider {
    files: BTreeMap<PathBuf, String>,
}

impl InMemorySourceProvider {
    /// Build a provider from `(path, text)` pairs.
    pub fn new(files: impl IntoIterator<Item = (PathBuf, String)>) -> Self {
        InMemorySourceProvider { files: files.into_iter().collect() }
    }
}

impl SourceFileProvider for InMemorySourceProvider {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn discover(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self.files.keys().filter(|p| p.starts_with(root)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_provider_discovers_files_under_root() {
        let provider = InMemorySourceProvider::new([
            (PathBuf::from("/ws/A.lang"), "module A;".to_string()),
            (PathBuf::from("/other/B.lang"), "module B;".to_string()),
        ]);
        let found = provider.discover(Path::new("/ws")).expect("discover should succeed");
        assert_eq!(found, vec![PathBuf::from("/ws/A.lang")]);
    }
}
