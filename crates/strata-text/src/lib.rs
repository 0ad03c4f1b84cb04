//! Source text, file identities and locations.

use std::fmt;
use std::sync::{Arc, OnceLock};

pub use line_index::{LineCol, LineIndex};
pub use text_size::{TextLen, TextRange, TextSize};

/// Identity of one source file inside a compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Immutable source text with an on-demand line index.
#[derive(Clone)]
pub struct SourceText {
    text: Arc<str>,
    line_index: Arc<OnceLock<LineIndex>>,
}

impl SourceText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into(), line_index: Arc::default() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> TextSize {
        self.text.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the text covered by `range`, or `None` if it is out of bounds or splits a
    /// character.
    pub fn slice(&self, range: TextRange) -> Option<&str> {
        self.text.get(std::ops::Range::<usize>::from(range))
    }

    pub fn line_index(&self) -> &LineIndex {
        self.line_index.get_or_init(|| LineIndex::new(&self.text))
    }

    /// Projects `offset` onto a zero-based line and column.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index().line_col(offset)
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText").field("len", &self.text.len()).finish_non_exhaustive()
    }
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for SourceText {}

/// A span inside one specific tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: FileId,
    pub range: TextRange,
}

impl Location {
    pub const fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    pub fn len(self) -> TextSize {
        self.range.len()
    }

    pub fn is_empty(self) -> bool {
        self.range.is_empty()
    }

    pub fn with_range(self, range: TextRange) -> Self {
        Self { range, ..self }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.file, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_projection() {
        let text = SourceText::new("class C\n{\n  int i;\n}\n");

        let brace = text.line_col(TextSize::new(8));
        assert_eq!((brace.line, brace.col), (1, 0));

        let field = text.line_col(TextSize::new(12));
        assert_eq!((field.line, field.col), (2, 2));
    }

    #[test]
    fn slice_respects_bounds() {
        let text = SourceText::new("int i;");
        assert_eq!(text.slice(TextRange::new(0.into(), 3.into())), Some("int"));
        assert_eq!(text.slice(TextRange::new(4.into(), 10.into())), None);
    }

    #[test]
    fn location_with_range_keeps_file() {
        let file = FileId::new(3);
        let location = Location::new(file, TextRange::new(1.into(), 4.into()));
        let moved = location.with_range(TextRange::empty(7.into()));

        assert_eq!(moved.file, file);
        assert!(moved.is_empty());
        assert_eq!(location.len(), TextSize::new(3));
    }
}
