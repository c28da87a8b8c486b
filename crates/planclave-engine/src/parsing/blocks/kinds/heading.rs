/// ATX heading (`# Title` .. `###### Title`).
pub struct Heading;

impl Heading {
    /// The heading marker character.
    pub const MARKER: char = '#';
    /// Deepest heading level recognised.
    pub const MAX_LEVEL: usize = 6;

    /// Returns the heading level when `line` starts with 1-6 `#` followed by whitespace.
    ///
    /// Leading indentation is not allowed: `  # x` is not a heading.
    pub fn level(line: &str) -> Option<u8> {
        let hashes = line.chars().take_while(|c| *c == Self::MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL {
            return None;
        }
        let next = line[hashes..].chars().next()?;
        next.is_whitespace().then_some(hashes as u8)
    }

    /// Strips the `#` run and the whitespace after it.
    pub fn strip_marker(line: &str) -> &str {
        match Self::level(line) {
            Some(level) => line[level as usize..].trim_start(),
            None => line,
        }
    }
}
