use super::span::Span;

/// A reference to a single logical line of the document with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef<'a> {
    /// Byte span of the line text in the document (newline excluded).
    pub span: Span,
    pub text: &'a str,
}

/// Returns an iterator over the logical lines of `text` with their spans.
///
/// Lines are separated by `\n`. A trailing newline yields a final empty line,
/// so the spans plus their separators always cover the whole input.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split('\n').map(move |line| {
        let start = offset;
        offset += line.len() + 1;
        LineRef {
            span: Span {
                start,
                end: start + line.len(),
            },
            text: line,
        }
    })
}
