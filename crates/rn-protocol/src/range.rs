//! Byte-offset `SourceLocation` → UTF-16 wire range conversion (spec §6:
//! "Ranges are expressed in UTF-16 offsets").

use std::path::Path;
use std::sync::Arc;

use rn_source::{LineIndex, SourceLocation};
use rn_workspace_index::SourceFileProvider;
use serde::{Deserialize, Serialize};

/// A zero-indexed `(line, UTF-16 column)` pair, the wire format's position
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    /// Zero-indexed line number.
    pub line: u32,
    /// Zero-indexed UTF-16 code unit offset within the line.
    pub character: u32,
}

/// A half-open `[start, end)` range, in wire positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRange {
    /// Inclusive start.
    pub start: WirePosition,
    /// Exclusive end.
    pub end: WirePosition,
}

/// A wire location: the file it names plus its UTF-16 range within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLocation {
    /// The file's id (its path, as the engine's `SourceLocation::file` holds it).
    pub file: Arc<str>,
    /// The range within that file.
    pub range: WireRange,
}

/// Converts byte-offset [`SourceLocation`]s to UTF-16 [`WireLocation`]s,
/// caching one [`LineIndex`] (and its source text) per file so a multi-edit
/// plan only reads and re-indexes each touched file once.
///
/// Grounded in the teacher's per-document line-starts cache
/// (`perl-position-tracking`), scoped down to the handful of files one
/// rename call touches rather than a whole open-document set.
pub struct RangeConverter<'a> {
    provider: &'a dyn SourceFileProvider,
    cache: std::collections::HashMap<Arc<str>, (String, LineIndex)>,
}

/// A file named by a [`SourceLocation`] could not be read back to build its
/// line index.
#[derive(Debug, Clone, thiserror::Error)]
#[error("could not read {file} to convert its offsets to a wire range: {reason}")]
pub struct RangeConversionError {
    /// The file that failed to read.
    pub file: Arc<str>,
    /// The underlying I/O failure's message.
    pub reason: String,
}

impl<'a> RangeConverter<'a> {
    /// Build a converter reading source text through `provider` as needed.
    pub fn new(provider: &'a dyn SourceFileProvider) -> Self {
        RangeConverter { provider, cache: std::collections::HashMap::new() }
    }

    fn entry(&mut self, file: &Arc<str>) -> Result<&(String, LineIndex), RangeConversionError> {
        if let std::collections::hash_map::Entry::Vacant(vacant) = self.cache.entry(file.clone()) {
            let text = self.provider.read(Path::new(file.as_ref())).map_err(|err| {
                RangeConversionError { file: file.clone(), reason: err.to_string() }
            })?;
            let index = LineIndex::new(&text);
            vacant.insert((text, index));
        }
        Ok(&self.cache[file])
    }

    /// Convert a byte-offset location to its wire form.
    pub fn convert(&mut self, location: &SourceLocation) -> Result<WireLocation, RangeConversionError> {
        let file = location.file.clone();
        let (text, index) = self.entry(&file)?;
        let (start_line, start_col) = index.offset_to_position(text, location.start);
        let (end_line, end_col) = index.offset_to_position(text, location.end);
        Ok(WireLocation {
            file,
            range: WireRange {
                start: WirePosition { line: start_line, character: start_col },
                end: WirePosition { line: end_line, character: end_col },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rn_test_support::must;
    use rn_workspace_index::InMemorySourceProvider;

    use super::*;

    #[test]
    fn converts_a_mid_line_span() {
        let provider = InMemorySourceProvider::new(vec![(
            PathBuf::from("/ws/M.lang"),
            "module M;\nint f(int a) { return a; }\n".to_string(),
        )]);
        let mut converter = RangeConverter::new(&provider);
        let loc = SourceLocation::new("/ws/M.lang", 14, 15);
        let wire = must(converter.convert(&loc));
        assert_eq!(wire.range.start, WirePosition { line: 1, character: 10 });
        assert_eq!(wire.range.end, WirePosition { line: 1, character: 11 });
    }

    #[test]
    fn repeated_conversions_in_the_same_file_reuse_the_cached_index() {
        let provider = InMemorySourceProvider::new(vec![(
            PathBuf::from("/ws/M.lang"),
            "module M;\n".to_string(),
        )]);
        let mut converter = RangeConverter::new(&provider);
        let a = SourceLocation::new("/ws/M.lang", 0, 1);
        let b = SourceLocation::new("/ws/M.lang", 7, 8);
        must(converter.convert(&a));
        must(converter.convert(&b));
        assert_eq!(converter.cache.len(), 1);
    }
}
