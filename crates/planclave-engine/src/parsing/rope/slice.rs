use xi_rope::Rope;

use super::lines::lines_with_spans;

/// Joins lines `start..=end` (1-based) with `\n`, clamped to the document.
///
/// Out-of-range or inverted ranges yield an empty string rather than failing,
/// since thread anchors may point past the end of a newer version.
pub fn line_range_text(rope: &Rope, start: usize, end: usize) -> String {
    let first = start.max(1);
    lines_with_spans(rope)
        .skip(first - 1)
        .take_while(|l| l.number <= end)
        .map(|l| l.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
