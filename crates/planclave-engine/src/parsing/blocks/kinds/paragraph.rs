/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters - they collect consecutive plain lines
/// when no other block opener matches.
pub struct Paragraph;

impl Paragraph {
    /// Separator used when a paragraph is rendered line by line.
    pub const LINE_BREAK: &'static str = "<br />";
}
