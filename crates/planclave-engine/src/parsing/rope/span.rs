/// A byte range `[start, end)` into the rope.
///
/// Blocks keep the span of source text they were built from, so slicing the
/// rope with a block span reproduces its lines exactly (line terminators included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
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

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        let sp = Span { start: 3, end: 8 };
        assert_eq!(sp.len(), 5);
        assert!(!sp.is_empty());
        assert!(Span { start: 4, end: 4 }.is_empty());
    }

    #[test]
    fn inverted_span_is_empty() {
        assert_eq!(Span { start: 9, end: 2 }.len(), 0);
    }

    #[test]
    fn cover_joins_adjacent_lines() {
        let a = Span { start: 0, end: 6 };
        let b = Span { start: 6, end: 12 };
        assert_eq!(a.cover(b), Span { start: 0, end: 12 });
    }
}
