use crate::parsing::blocks::{Block, BlockKind, kinds::CodeFence};

/// One line of code inside a fence, tied back to its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine {
    /// 1-based source line, usable as a one-line thread anchor.
    pub line: usize,
    pub text: String,
}

/// A code block with its fences removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeView {
    pub language: Option<String>,
    pub lines: Vec<CodeLine>,
}

impl CodeView {
    /// Builds the view for a code block; `None` for any other kind.
    pub fn from_block(block: &Block) -> Option<Self> {
        let BlockKind::Code { language } = &block.kind else {
            return None;
        };
        // The first body line sits right after the opening fence.
        let lines = CodeFence::body_lines(&block.content)
            .into_iter()
            .enumerate()
            .map(|(idx, text)| CodeLine {
                line: block.start_line + 1 + idx,
                text: text.to_string(),
            })
            .collect();
        Some(Self {
            language: language.clone(),
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;

    #[test]
    fn body_lines_carry_source_numbers() {
        let blocks = parse("# t\n\n```sh\necho a\necho b\n```");
        let code = CodeView::from_block(&blocks[1]).unwrap();
        assert_eq!(code.language.as_deref(), Some("sh"));
        let numbered: Vec<_> = code.lines.iter().map(|l| (l.line, l.text.as_str())).collect();
        assert_eq!(numbered, vec![(4, "echo a"), (5, "echo b")]);
    }

    #[test]
    fn unterminated_fence_keeps_last_line() {
        let blocks = parse("```\nlast");
        let code = CodeView::from_block(&blocks[0]).unwrap();
        assert_eq!(code.lines.len(), 1);
        assert_eq!(code.lines[0].line, 2);
    }
}
