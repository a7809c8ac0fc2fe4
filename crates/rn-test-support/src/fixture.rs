//! Small builders for constructing test fixtures without repeating
//! `SourceLocation::new` boilerplate at every call site.

use rn_source::SourceLocation;

/// Build a `SourceLocation` in a fixed test file, `"fixture.lang"`.
pub fn loc(start: usize, end: usize) -> SourceLocation {
    SourceLocation::new("fixture.lang", start, end)
}

/// Build a `SourceLocation` in a named file.
pub fn loc_in(file: &str, start: usize, end: usize) -> SourceLocation {
    SourceLocation::new(file, start, end)
}

/// A `(path, text)` pair, the grain of an in-memory workspace fixture.
#[derive(Debug, Clone)]
pub struct FileFixture {
    /// The file's workspace-relative path.
    pub path: String,
    /// The file's full text.
    pub text: String,
}

impl FileFixture {
    /// Build a fixture file.
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        FileFixture { path: path.into(), text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loc_builds_a_span_in_the_fixture_file() {
        let span = loc(0, 3);
        assert_eq!(span.len(), 3);
    }
}
