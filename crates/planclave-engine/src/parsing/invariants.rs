use xi_rope::Rope;

use crate::parsing::{blocks::Block, rope::lines_with_spans};

/// Validates parser output invariants.
///
/// Asserts that:
/// - Every block has `start_line <= end_line` and an id derived from its start line
/// - Blocks are in strictly increasing line order and never overlap
/// - Every non-blank line belongs to exactly one block
/// - Block spans lie within the rope
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(rope: &Rope, blocks: &[Block]) {
    let n = rope.len();
    let mut prev_end = 0usize;
    for b in blocks {
        assert!(
            b.start_line <= b.end_line,
            "inverted line range on {}: {}..{}",
            b.id,
            b.start_line,
            b.end_line
        );
        assert_eq!(b.id.start_line(), Some(b.start_line), "id/start mismatch");
        assert!(
            b.start_line > prev_end,
            "block {} overlaps or precedes previous block ending at {}",
            b.id,
            prev_end
        );
        assert!(
            b.span.start <= b.span.end && b.span.end <= n,
            "block span out of bounds: {:?} (rope len: {})",
            b.span,
            n
        );
        prev_end = b.end_line;
    }

    for line in lines_with_spans(rope) {
        let owners = blocks.iter().filter(|b| b.contains_line(line.number)).count();
        if line.text.trim().is_empty() {
            assert!(owners <= 1, "blank line {} in {owners} blocks", line.number);
        } else {
            assert_eq!(
                owners, 1,
                "line {} ({:?}) owned by {owners} blocks",
                line.number, line.text
            );
        }
    }
}
