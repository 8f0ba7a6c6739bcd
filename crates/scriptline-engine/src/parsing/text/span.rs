use serde::{Deserialize, Serialize};

/// A byte range `[start, end)` into a line's text.
///
/// Syntax found inside a line (notes, omission markers, forced scene numbers)
/// is stored as spans relative to the start of the line, so it stays valid
/// while the line moves around the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Slices `text` with this span, clamping to the text bounds.
    pub fn slice(self, text: &str) -> &str {
        let end = self.end.min(text.len());
        let start = self.start.min(end);
        text.get(start..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_saturates_for_inverted_spans() {
        assert_eq!(Span::new(5, 3).len(), 0);
        assert!(Span::new(5, 3).is_empty());
    }

    #[test]
    fn contains_is_end_exclusive() {
        let span = Span::new(2, 4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(3));
        assert!(!span.contains(4));
    }

    #[test]
    fn slice_clamps_to_text() {
        assert_eq!(Span::new(6, 11).slice("hello world"), "world");
        assert_eq!(Span::new(6, 40).slice("hello world"), "world");
        assert_eq!(Span::new(40, 50).slice("hello world"), "");
    }
}
