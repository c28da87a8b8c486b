/// The marker that opens a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `-` or `*`.
    Bullet(char),
    /// `1.`, `42.` and so on.
    Ordered(u64),
}

/// Facts extracted from a single list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    pub marker: ListMarker,
    /// Indent level: one step per two leading whitespace characters.
    pub level: usize,
    /// `Some` only when a `[ ]`, `[x]` or `[X]` literal follows the marker.
    pub checked: Option<bool>,
    /// Byte offset of the item text, after the marker and any checkbox.
    pub text_start: usize,
}

/// List item line (`- x`, `* x`, `1. x`, optionally with a checkbox).
pub struct ListItem;

impl ListItem {
    pub const BULLETS: [char; 2] = ['-', '*'];
    pub const ORDERED_DELIM: char = '.';
    pub const INDENT_WIDTH: usize = 2;

    pub fn parse(line: &str) -> Option<ListLine> {
        let indent_bytes = line.len() - line.trim_start().len();
        let indent = line[..indent_bytes].chars().count();
        let rest = &line[indent_bytes..];

        let (marker, marker_len) = Self::marker(rest)?;
        let after_marker = &rest[marker_len..];
        // The marker must be followed by whitespace.
        if !after_marker.starts_with(char::is_whitespace) {
            return None;
        }
        let body = after_marker.trim_start();
        let mut text_start = line.len() - body.len();

        let checked = Self::checkbox(body);
        if checked.is_some() {
            let after_box = &body[3..];
            text_start += 3 + (after_box.len() - after_box.trim_start().len());
        }

        Some(ListLine {
            marker,
            level: indent / Self::INDENT_WIDTH,
            checked,
            text_start,
        })
    }

    /// Item text with indentation, marker and checkbox removed.
    pub fn strip_prefix(line: &str) -> &str {
        match Self::parse(line) {
            Some(parsed) => &line[parsed.text_start..],
            None => line,
        }
    }

    fn marker(rest: &str) -> Option<(ListMarker, usize)> {
        let first = rest.chars().next()?;
        if Self::BULLETS.contains(&first) {
            return Some((ListMarker::Bullet(first), first.len_utf8()));
        }
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with(Self::ORDERED_DELIM) {
            return None;
        }
        // Oversized numbers still mark a list; only the value saturates.
        let n = rest[..digits].parse().unwrap_or(u64::MAX);
        Some((ListMarker::Ordered(n), digits + 1))
    }

    fn checkbox(body: &str) -> Option<bool> {
        match body.get(..3)? {
            "[ ]" => Some(false),
            "[x]" | "[X]" => Some(true),
            _ => None,
        }
    }
}
