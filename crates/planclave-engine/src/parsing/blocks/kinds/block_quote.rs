/// Block quote line (`> text`).
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    pub fn matches(line: &str) -> bool {
        line.trim_start().starts_with(Self::PREFIX)
    }

    /// Strips leading whitespace, the `>` and at most one following space.
    ///
    /// Only the first `>` is removed: `>> nested` keeps its inner marker,
    /// since nested quotes are rendered flat.
    pub fn strip_prefix(line: &str) -> &str {
        match line.trim_start().strip_prefix(Self::PREFIX) {
            Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
            None => line,
        }
    }
}
