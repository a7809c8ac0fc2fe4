//! Codepoint-to-UTF-16 column mapping.
//!
//! The edit wire format (spec §6) expresses ranges in UTF-16 offsets, the
//! host protocol's standard, while the engine itself reasons in byte
//! offsets. `LineIndex` is the per-file mapper between the two, grounded in
//! the teacher's `perl-position-tracking` line-starts cache.

/// Byte-offset line starts for one file's source text, with UTF-16 column
/// conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text_len: usize,
}

impl LineIndex {
    /// Build a line index for `text`. Recognizes `\n` and `\r\n` as line
    /// terminators.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\n' {
                line_starts.push(i + 1);
            } else if bytes[i] == b'\r' {
                if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                    line_starts.push(i + 2);
                    i += 1;
                } else {
                    line_starts.push(i + 1);
                }
            }
            i += 1;
        }
        Self { line_starts, text_len: text.len() }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    fn line_end(&self, line: usize, text: &str) -> usize {
        if line + 1 < self.line_starts.len() {
            let mut end = self.line_starts[line + 1];
            let bytes = text.as_bytes();
            while end > self.line_starts[line] && matches!(bytes.get(end - 1), Some(b'\n' | b'\r'))
            {
                end -= 1;
            }
            end
        } else {
            self.text_len
        }
    }

    /// Convert a byte offset to a zero-indexed `(line, utf16_column)` pair.
    pub fn offset_to_position(&self, text: &str, offset: usize) -> (u32, u32) {
        let offset = offset.min(text.len());
        let line = self.line_of(offset);
        let line_start = self.line_starts[line];
        let column =
            text[line_start..offset].chars().map(char::len_utf16).sum::<usize>() as u32;
        (line as u32, column)
    }

    /// Convert a zero-indexed `(line, utf16_column)` pair back to a byte
    /// offset.
    pub fn position_to_offset(&self, text: &str, line: u32, character: u32) -> usize {
        let line = line as usize;
        if line >= self.line_starts.len() {
            return text.len();
        }
        let line_start = self.line_starts[line];
        let line_end = self.line_end(line, text);
        let line_text = &text[line_start..line_end];

        let mut utf16_count = 0usize;
        let mut byte_offset = 0usize;
        for ch in line_text.chars() {
            if utf16_count >= character as usize {
                break;
            }
            utf16_count += ch.len_utf16();
            byte_offset += ch.len_utf8();
        }
        line_start + byte_offset.min(line_text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let text = "line one\nline two\nline three";
        let idx = LineIndex::new(text);
        let offset = text.find("two").unwrap();
        let (line, col) = idx.offset_to_position(text, offset);
        assert_eq!((line, col), (1, 5));
        assert_eq!(idx.position_to_offset(text, line, col), offset);
    }

    #[test]
    fn astral_characters_count_as_two_utf16_units() {
        // U+1F600 (grinning face) is 4 bytes UTF-8, 2 units UTF-16.
        let text = "a😀b\nsecond";
        let idx = LineIndex::new(text);
        let b_offset = text.find('b').unwrap();
        let (_, col) = idx.offset_to_position(text, b_offset);
        assert_eq!(col, 3); // 'a' (1) + surrogate pair (2)
        assert_eq!(idx.position_to_offset(text, 0, col), b_offset);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = "first\r\nsecond\r\nthird";
        let idx = LineIndex::new(text);
        let offset = text.find("second").unwrap();
        let (line, col) = idx.offset_to_position(text, offset);
        assert_eq!(line, 1);
        assert_eq!(col, 0);
    }

    #[test]
    fn out_of_range_offset_clamps_to_end() {
        let text = "short";
        let idx = LineIndex::new(text);
        let (line, col) = idx.offset_to_position(text, 1000);
        assert_eq!(idx.position_to_offset(text, line, col), text.len());
    }
}
