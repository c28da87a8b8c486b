use crate::parsing::{
    blocks::{Block, BlockKind, kinds::TableRow},
    rope::content_lines,
};

/// One body row of a table, tied back to its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBodyRow {
    /// 1-based source line, usable as a one-line thread anchor.
    pub line: usize,
    pub cells: Vec<String>,
}

/// A table block split into header and body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<String>,
    /// Whether the second line was a `|---|` separator (and so skipped).
    pub has_separator: bool,
    pub rows: Vec<TableBodyRow>,
}

impl TableView {
    /// Builds the view for a table block; `None` for any other kind.
    ///
    /// The first line is always the header. Cells are raw source text; the
    /// renderer applies inline markup to them.
    pub fn from_block(block: &Block) -> Option<Self> {
        if block.kind != BlockKind::Table {
            return None;
        }
        let lines: Vec<&str> = content_lines(&block.content).collect();
        let (first, rest) = lines.split_first()?;
        let has_separator = rest.first().is_some_and(|l| TableRow::is_separator(l));
        let body_offset = if has_separator { 2 } else { 1 };

        let rows = lines
            .iter()
            .enumerate()
            .skip(body_offset)
            .map(|(idx, line)| TableBodyRow {
                line: block.start_line + idx,
                cells: TableRow::cells(line),
            })
            .collect();

        Some(Self {
            header: TableRow::cells(first),
            has_separator,
            rows,
        })
    }
}
