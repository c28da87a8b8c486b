use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::parsing::rope::span::Span;

/// Position-derived block identifier: `"block-" + start_line`.
///
/// Unique within one parse, but any edit that shifts lines above a block
/// changes its id. Threads store the id verbatim, so a value that does not
/// follow the `block-N` shape is still a valid (if unresolvable) key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub const PREFIX: &'static str = "block-";

    /// Derives the id of a block starting at `start_line` (1-based).
    pub fn for_start_line(start_line: usize) -> Self {
        Self(format!("{}{start_line}", Self::PREFIX))
    }

    /// The start line encoded in the id, if it has the `block-N` shape.
    pub fn start_line(&self) -> Option<usize> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Orders by start line, so `block-9` sorts before `block-10`. Ids without
/// the `block-N` shape sort after all others, by text.
impl Ord for BlockId {
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |id: &Self| {
            let line = id.start_line();
            (line.is_none(), line)
        };
        key(self).cmp(&key(other)).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for BlockId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// The kind of a block, with only the metadata that kind carries.
///
/// Serializes flat into the owning [`Block`]: a kebab-case `type` tag plus
/// `level` / `language` / `checked` where they apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockKind {
    Heading {
        /// 1-6.
        level: u8,
    },
    Paragraph,
    Code {
        /// Fence info string; `None` for a bare fence.
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    ListItem {
        /// Indent level, 0-based.
        level: usize,
        /// Only present when the item carries a checkbox literal.
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    #[serde(rename = "blockquote")]
    BlockQuote,
    #[serde(rename = "hr")]
    ThematicBreak,
    Table,
}

impl BlockKind {
    /// The wire name of this kind (`"list-item"`, `"hr"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Heading { .. } => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Code { .. } => "code",
            BlockKind::ListItem { .. } => "list-item",
            BlockKind::BlockQuote => "blockquote",
            BlockKind::ThematicBreak => "hr",
            BlockKind::Table => "table",
        }
    }
}

/// A parsed block: a contiguous run of source lines forming one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Verbatim source lines joined with `\n`, markers included.
    pub content: String,
    /// 1-based, inclusive.
    pub start_line: usize,
    /// 1-based, inclusive; never less than `start_line`.
    pub end_line: usize,
    /// Byte span of the block's lines in the source.
    #[serde(skip)]
    pub span: Span,
}

impl Block {
    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}
