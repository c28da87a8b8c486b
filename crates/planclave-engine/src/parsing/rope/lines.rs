use xi_rope::Rope;

use super::span::Span;

/// A reference to a single source line with its position.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// 1-based line number in the document.
    pub number: usize,
    /// Byte span of this line in the rope (includes the newline if present).
    pub span: Span,
    /// The line text without its `\n` / `\r\n` terminator.
    pub text: String,
    /// The line as written, minus only the `\n`; a `\r` before it is kept.
    pub raw: String,
}

/// Returns an iterator over lines with their numbers and byte spans.
///
/// Uses `lines_raw` so spans include the terminator; `text` has it stripped.
/// A trailing newline does not yield an extra empty line, which only ever
/// drops a blank line and so never changes the block sequence.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(idx, line)| {
        let start = offset;
        offset += line.len();
        let raw = line.strip_suffix('\n').unwrap_or(&line[..]);
        LineRef {
            number: idx + 1,
            span: Span { start, end: offset },
            text: raw.strip_suffix('\r').unwrap_or(raw).to_string(),
            raw: raw.to_string(),
        }
    })
}

/// Splits block content back into its lines, dropping any `\r` left from a
/// CRLF source.
pub fn content_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}
