use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{BlockQuote, CodeFence, Heading, ListItem, TableRow, ThematicBreak};

/// What a single line looks like in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Whitespace only.
    Blank,
    /// A fence delimiter; opens or closes a code block depending on state.
    CodeFence { language: Option<String> },
    Heading { level: u8 },
    ThematicBreak,
    TableRow,
    ListItem { level: usize, checked: Option<bool> },
    BlockQuote,
    Plain,
}

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// 1-based line number.
    pub number: usize,
    /// Full byte span of this line in the rope.
    pub line: Span,
    /// Line text without its terminator.
    pub text: String,
    /// Line text as written; differs from `text` only by a CRLF `\r`.
    pub raw: String,
    pub kind: LineKind,
}

/// Classifies individual lines for the block parsing phase.
pub struct LineClassifier;

impl LineClassifier {
    /// Classifies a line reference into a [`LineClass`].
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        LineClass {
            number: lr.number,
            line: lr.span,
            text: lr.text.clone(),
            raw: lr.raw.clone(),
            kind: Self::kind_of(&lr.text),
        }
    }

    /// Classifies raw line text.
    ///
    /// When several predicates match, the first in this order wins:
    /// fence, heading, rule, table row, list item, quote, plain.
    pub fn kind_of(line: &str) -> LineKind {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }
        if let Some(language) = CodeFence::sig(line) {
            return LineKind::CodeFence { language };
        }
        if let Some(level) = Heading::level(line) {
            return LineKind::Heading { level };
        }
        if ThematicBreak::matches(line) {
            return LineKind::ThematicBreak;
        }
        if TableRow::matches(line) {
            return LineKind::TableRow;
        }
        if let Some(item) = ListItem::parse(line) {
            return LineKind::ListItem {
                level: item.level,
                checked: item.checked,
            };
        }
        if BlockQuote::matches(line) {
            return LineKind::BlockQuote;
        }
        LineKind::Plain
    }
}
