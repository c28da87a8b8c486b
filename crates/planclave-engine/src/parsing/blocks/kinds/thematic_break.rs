/// Horizontal rule: a line made only of three or more `-`, `*` or `_`.
pub struct ThematicBreak;

impl ThematicBreak {
    /// Characters that may form a rule.
    pub const CHARS: [char; 3] = ['-', '*', '_'];
    /// Minimum run length.
    pub const MIN_RUN: usize = 3;

    /// True when the trimmed line is one repeated rule character, at least `MIN_RUN` long.
    ///
    /// Mixed characters (`-*-`) and interior spaces (`- - -`) do not count.
    pub fn matches(line: &str) -> bool {
        let t = line.trim();
        let mut chars = t.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        Self::CHARS.contains(&first)
            && chars.all(|c| c == first)
            && t.chars().count() >= Self::MIN_RUN
    }
}
