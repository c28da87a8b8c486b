use crate::models::{Anchor, Thread};
use crate::parsing::blocks::{Block, BlockKind};
use crate::render::{CodeView, TableView};

/// An anchor covering a whole block.
pub fn block_anchor(block: &Block) -> Anchor {
    Anchor::new(block.id.clone(), block.start_line, block.end_line)
}

/// A one-line anchor for a code line or table body row inside `block`.
///
/// `None` when the block has no per-line targets (headings, paragraphs, ...)
/// or `line` is not one of them: fences and table header rows do not count.
pub fn line_anchor(block: &Block, line: usize) -> Option<Anchor> {
    let targetable = match block.kind {
        BlockKind::Code { .. } => {
            CodeView::from_block(block).is_some_and(|code| code.lines.iter().any(|l| l.line == line))
        }
        BlockKind::Table => {
            TableView::from_block(block).is_some_and(|table| table.rows.iter().any(|r| r.line == line))
        }
        _ => false,
    };
    targetable.then(|| Anchor::line(block.id.clone(), line))
}

/// The block of this parse that `anchor` names, if it still exists.
pub fn resolve_anchor<'a>(blocks: &'a [Block], anchor: &Anchor) -> Option<&'a Block> {
    blocks.iter().find(|b| b.id == anchor.block_id)
}

/// Threads whose block id names no block of this parse.
pub fn dangling<'t>(blocks: &[Block], threads: &'t [Thread]) -> Vec<&'t Thread> {
    threads
        .iter()
        .filter(|t| resolve_anchor(blocks, &t.anchor).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;
    use crate::tests::thread;
    use rstest::rstest;

    const DOC: &str = "# Plan\n\n```sh\nmake\nmake test\n```\n\n| k | v |\n|---|---|\n| a | 1 |";

    #[test]
    fn whole_block_anchor() {
        let blocks = parse(DOC);
        assert_eq!(block_anchor(&blocks[1]), Anchor::new("block-3", 3, 6));
    }

    #[rstest]
    #[case(1, 4, Some(4))]
    #[case(1, 5, Some(5))]
    #[case(1, 3, None)]
    #[case(1, 6, None)]
    #[case(2, 10, Some(10))]
    #[case(2, 8, None)]
    #[case(0, 1, None)]
    fn per_line_targets(#[case] block: usize, #[case] line: usize, #[case] expected: Option<usize>) {
        let blocks = parse(DOC);
        let anchor = line_anchor(&blocks[block], line);
        assert_eq!(anchor.map(|a| (a.start_line, a.end_line)), expected.map(|l| (l, l)));
    }

    #[test]
    fn line_anchor_reuses_block_id() {
        let blocks = parse(DOC);
        let anchor = line_anchor(&blocks[1], 4).unwrap();
        assert_eq!(anchor.block_id, blocks[1].id);
    }

    #[test]
    fn anchors_resolve_only_against_matching_ids() {
        // Version 2 pushed the paragraph down a line.
        let v2 = parse("# Plan\nsub\n\nbody");
        let on_v1 = vec![
            thread(1, Anchor::new("block-1", 1, 1), 0),
            thread(1, Anchor::new("block-3", 3, 3), 0),
        ];

        assert!(resolve_anchor(&v2, &on_v1[0].anchor).is_some());
        let missing = dangling(&v2, &on_v1);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].anchor.block_id.as_str(), "block-3");
    }
}
