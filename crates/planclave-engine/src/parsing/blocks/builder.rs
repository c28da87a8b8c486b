use crate::parsing::rope::span::Span;

use super::{
    classify::{LineClass, LineKind},
    types::{Block, BlockId, BlockKind},
};

/// Lines collected so far for a multi-line block.
#[derive(Debug, Clone)]
struct OpenLines {
    start_line: usize,
    end_line: usize,
    span: Span,
    lines: Vec<String>,
}

impl OpenLines {
    fn start(c: &LineClass) -> Self {
        Self {
            start_line: c.number,
            end_line: c.number,
            span: c.line,
            lines: vec![c.raw.clone()],
        }
    }

    fn extend(&mut self, c: &LineClass) {
        self.end_line = c.number;
        self.span = self.span.cover(c.line);
        self.lines.push(c.raw.clone());
    }

    fn into_block(self, kind: BlockKind) -> Block {
        Block {
            id: BlockId::for_start_line(self.start_line),
            kind,
            content: self.lines.join("\n"),
            start_line: self.start_line,
            end_line: self.end_line,
            span: self.span,
        }
    }
}

#[derive(Debug, Clone)]
enum LeafState {
    None,
    Paragraph(OpenLines),
    Fence {
        language: Option<String>,
        lines: OpenLines,
    },
    Table(OpenLines),
    Quote(OpenLines),
}

/// Single-pass block segmenter.
///
/// Fed one classified line at a time; emits a block as soon as the line that
/// ends it is seen. Fenced code is a raw zone: inside it, only another fence
/// delimiter is significant.
pub struct BlockBuilder {
    leaf: LeafState,
    out: Vec<Block>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        if self.in_fence() {
            self.consume_fence_line(c);
            return;
        }

        match &c.kind {
            LineKind::Blank => self.flush(),
            LineKind::CodeFence { language } => {
                self.flush();
                self.leaf = LeafState::Fence {
                    language: language.clone(),
                    lines: OpenLines::start(c),
                };
            }
            LineKind::Heading { level } => {
                self.emit_single(c, BlockKind::Heading { level: *level });
            }
            LineKind::ThematicBreak => self.emit_single(c, BlockKind::ThematicBreak),
            LineKind::ListItem { level, checked } => self.emit_single(
                c,
                BlockKind::ListItem {
                    level: *level,
                    checked: *checked,
                },
            ),
            LineKind::TableRow => match &mut self.leaf {
                LeafState::Table(lines) => lines.extend(c),
                _ => {
                    self.flush();
                    self.leaf = LeafState::Table(OpenLines::start(c));
                }
            },
            LineKind::BlockQuote => match &mut self.leaf {
                LeafState::Quote(lines) => lines.extend(c),
                _ => {
                    self.flush();
                    self.leaf = LeafState::Quote(OpenLines::start(c));
                }
            },
            LineKind::Plain => match &mut self.leaf {
                LeafState::Paragraph(lines) => lines.extend(c),
                _ => {
                    self.flush();
                    self.leaf = LeafState::Paragraph(OpenLines::start(c));
                }
            },
        }
    }

    pub fn finish(mut self) -> Vec<Block> {
        // EOF flush; an unterminated fence closes here too.
        self.flush();
        self.out
    }

    fn in_fence(&self) -> bool {
        matches!(self.leaf, LeafState::Fence { .. })
    }

    fn consume_fence_line(&mut self, c: &LineClass) {
        let LeafState::Fence { lines, .. } = &mut self.leaf else {
            return;
        };
        lines.extend(c);

        // Any delimiter closes, whatever its info string.
        if matches!(c.kind, LineKind::CodeFence { .. }) {
            self.flush();
        }
    }

    fn emit_single(&mut self, c: &LineClass, kind: BlockKind) {
        self.flush();
        self.out.push(OpenLines::start(c).into_block(kind));
    }

    fn flush(&mut self) {
        let block = match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => return,
            LeafState::Paragraph(lines) => lines.into_block(BlockKind::Paragraph),
            LeafState::Fence { language, lines } => lines.into_block(BlockKind::Code { language }),
            LeafState::Table(lines) => lines.into_block(BlockKind::Table),
            LeafState::Quote(lines) => lines.into_block(BlockKind::BlockQuote),
        };
        self.out.push(block);
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::classify::LineClassifier;
    use crate::parsing::rope::lines_with_spans;
    use xi_rope::Rope;

    fn build(md: &str) -> Vec<Block> {
        let rope = Rope::from(md);
        let mut builder = BlockBuilder::new();
        for lr in lines_with_spans(&rope) {
            builder.push(&LineClassifier.classify(&lr));
        }
        builder.finish()
    }

    fn lines_of(blocks: &[Block]) -> Vec<(&'static str, usize, usize)> {
        blocks
            .iter()
            .map(|b| (b.kind.name(), b.start_line, b.end_line))
            .collect()
    }

    #[test]
    fn fence_swallows_other_kinds() {
        let blocks = build("```\n# not heading\n- not list\n```");
        assert_eq!(lines_of(&blocks), vec![("code", 1, 4)]);
    }

    #[test]
    fn closing_fence_with_info_string_still_closes() {
        let blocks = build("```js\nx\n```rust\nafter");
        assert_eq!(lines_of(&blocks), vec![("code", 1, 3), ("paragraph", 4, 4)]);
    }

    #[test]
    fn fence_keeps_blank_lines() {
        let blocks = build("```\na\n\nb\n```");
        assert_eq!(blocks[0].content, "```\na\n\nb\n```");
    }

    #[test]
    fn paragraph_interrupted_by_list() {
        let blocks = build("one\ntwo\n- three");
        assert_eq!(
            lines_of(&blocks),
            vec![("paragraph", 1, 2), ("list-item", 3, 3)]
        );
        assert_eq!(blocks[0].content, "one\ntwo");
    }

    #[test]
    fn quote_then_table_are_separate() {
        let blocks = build("> a\n> b\n| x | y |\n|---|---|");
        assert_eq!(
            lines_of(&blocks),
            vec![("blockquote", 1, 2), ("table", 3, 4)]
        );
    }

    #[test]
    fn spans_cover_block_lines() {
        let blocks = build("para\n\n> q1\n> q2\n");
        assert_eq!(blocks[0].span, Span { start: 0, end: 5 });
        assert_eq!(blocks[1].span, Span { start: 6, end: 16 });
    }

    #[test]
    fn blank_line_ends_a_table() {
        let blocks = build("| a | b |\n| 1 | 2 |\n\n| c | d |");
        assert_eq!(lines_of(&blocks), vec![("table", 1, 2), ("table", 4, 4)]);
    }

    #[test]
    fn list_items_across_blank_lines_stay_separate() {
        let blocks = build("- top\n\n  - nested\n\n- back");
        assert_eq!(
            lines_of(&blocks),
            vec![("list-item", 1, 1), ("list-item", 3, 3), ("list-item", 5, 5)]
        );
        let levels: Vec<_> = blocks
            .iter()
            .map(|b| match b.kind {
                BlockKind::ListItem { level, .. } => level,
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(levels, vec![0, 1, 0]);
    }

    #[test]
    fn crlf_content_is_kept_verbatim() {
        let blocks = build("# Title\r\n\r\none\r\ntwo\r\n```sh\r\nls\r\n```\r\n");
        assert_eq!(
            lines_of(&blocks),
            vec![("heading", 1, 1), ("paragraph", 3, 4), ("code", 5, 7)]
        );
        assert_eq!(blocks[0].content, "# Title\r");
        assert_eq!(blocks[1].content, "one\r\ntwo\r");
        assert_eq!(blocks[2].content, "```sh\r\nls\r\n```\r");
        assert_eq!(
            blocks[2].kind,
            BlockKind::Code {
                language: Some("sh".into())
            }
        );
    }
}
