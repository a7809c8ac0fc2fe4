//! Source locations and the containment/prefix relations the rename engine
//! reasons over (spec §3 "Source location").

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A byte-offset span `(file, offset, length)` plus a cached line/column
/// range for wire-format consumption.
///
/// Two locations may be compared for *containment* (`a.contains(b)` iff `b`
/// falls inside `a`'s byte span, reflexively) and *strict containment*
/// (`a.strictly_contains(b)`, which excludes equality).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Absolute path of the file this location belongs to.
    pub file: std::sync::Arc<str>,
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

impl SourceLocation {
    /// Construct a location from a file path and byte span.
    pub fn new(file: impl Into<std::sync::Arc<str>>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "location start must not exceed end");
        Self { file: file.into(), start, end }
    }

    /// Number of bytes spanned.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `A ⊑ B`: does `self` contain `other`, reflexively?
    ///
    /// Both locations must name the same file; containment across files is
    /// always false.
    pub fn contains(&self, other: &SourceLocation) -> bool {
        self.file == other.file && self.start <= other.start && other.end <= self.end
    }

    /// Strict containment: `self.contains(other)` and `self != other`.
    pub fn strictly_contains(&self, other: &SourceLocation) -> bool {
        self.contains(other) && self != other
    }

    /// Does this location's byte span overlap `position` (inclusive start,
    /// exclusive end, degenerate zero-width spans match only their own
    /// offset)?
    pub fn covers(&self, position: usize) -> bool {
        if self.is_empty() {
            self.start == position
        } else {
            self.start <= position && position < self.end
        }
    }

    /// Order two locations by containment-then-size, so that `min_by`-style
    /// reductions over a set of candidate locations yield the *smallest*
    /// containing one, which is what every "smallest containing X" query in
    /// §4.1/§4.3 needs.
    pub fn smallest_first(&self, other: &SourceLocation) -> Ordering {
        self.len().cmp(&other.len()).then_with(|| self.start.cmp(&other.start))
    }
}

/// Is `ancestor` a prefix directory of `path` (or equal to it)?
///
/// Used by the driver to pick the workspace folder with the longest prefix
/// of the cursor file (spec §4.7 step 1).
pub fn is_path_prefix(ancestor: &Path, path: &Path) -> bool {
    path.starts_with(ancestor)
}

/// Among `folders`, return the one with the longest matching prefix of
/// `file`, or `None` if no folder contains it.
pub fn longest_prefix_folder<'a>(
    folders: impl IntoIterator<Item = &'a Path>,
    file: &Path,
) -> Option<&'a Path> {
    folders
        .into_iter()
        .filter(|folder| is_path_prefix(folder, file))
        .max_by_key(|folder| folder.as_os_str().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(start: usize, end: usize) -> SourceLocation {
        SourceLocation::new("a.lang", start, end)
    }

    #[test]
    fn containment_is_reflexive() {
        let a = loc(0, 10);
        assert!(a.contains(&a));
        assert!(!a.strictly_contains(&a));
    }

    #[test]
    fn strict_containment_excludes_equality() {
        let outer = loc(0, 10);
        let inner = loc(2, 5);
        assert!(outer.strictly_contains(&inner));
        assert!(!inner.strictly_contains(&outer));
    }

    #[test]
    fn containment_requires_same_file() {
        let a = SourceLocation::new("a.lang", 0, 10);
        let b = SourceLocation::new("b.lang", 0, 10);
        assert!(!a.contains(&b));
    }

    #[test]
    fn covers_handles_zero_width_span() {
        let zero = loc(5, 5);
        assert!(zero.covers(5));
        assert!(!zero.covers(4));
        assert!(!zero.covers(6));
    }

    #[test]
    fn longest_prefix_picks_deepest_folder() {
        use std::path::PathBuf;
        let a: PathBuf = "/ws".into();
        let b: PathBuf = "/ws/pkg".into();
        let folders = [a.as_path(), b.as_path()];
        let file: PathBuf = "/ws/pkg/Mod.lang".into();
        assert_eq!(longest_prefix_folder(folders, &file), Some(b.as_path()));
    }
}
