use std::collections::BTreeSet;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::parsing::{
    blocks::{
        Block, BlockId, BlockKind,
        kinds::{BlockQuote, Heading, ListItem, Paragraph},
    },
    rope::content_lines,
};

use super::{code::CodeView, inline::render_inline, table::TableView};

/// Gutter label for a block's line range: `L3` or `L3-7`.
pub fn gutter_label(start_line: usize, end_line: usize) -> String {
    if start_line == end_line {
        format!("L{start_line}")
    } else {
        format!("L{start_line}-{end_line}")
    }
}

/// Renders one block to semantic HTML, without any wrapper.
pub fn render_block(block: &Block) -> String {
    match &block.kind {
        BlockKind::Heading { level } => {
            let text = render_inline(Heading::strip_marker(single_line(&block.content)));
            format!("<h{level}>{text}</h{level}>")
        }
        BlockKind::Paragraph => {
            format!("<p>{}</p>", render_lines(content_lines(&block.content)))
        }
        BlockKind::ListItem { level, checked } => {
            let text = render_inline(ListItem::strip_prefix(single_line(&block.content)));
            let checkbox = match checked {
                Some(true) => r#"<input type="checkbox" disabled checked /> "#,
                Some(false) => r#"<input type="checkbox" disabled /> "#,
                None => "",
            };
            format!(r#"<li data-level="{level}">{checkbox}{text}</li>"#)
        }
        BlockKind::BlockQuote => {
            let lines = content_lines(&block.content).map(BlockQuote::strip_prefix);
            format!("<blockquote>{}</blockquote>", render_lines(lines))
        }
        BlockKind::ThematicBreak => "<hr />".to_string(),
        BlockKind::Code { .. } => CodeView::from_block(block)
            .map(|code| render_code(&code))
            .unwrap_or_default(),
        BlockKind::Table => TableView::from_block(block)
            .map(|table| render_table(&table))
            .unwrap_or_default(),
    }
}

/// Renders a whole version: every block wrapped in a `<section>` carrying its
/// id and gutter label, flagged when `open_threads` contains its id.
pub fn render_document(blocks: &[Block], open_threads: &BTreeSet<BlockId>) -> String {
    blocks
        .iter()
        .map(|block| {
            let flag = if open_threads.contains(&block.id) {
                " data-open-thread"
            } else {
                ""
            };
            format!(
                r#"<section data-block="{}" data-gutter="{}"{flag}>{}</section>"#,
                encode_double_quoted_attribute(block.id.as_str()),
                gutter_label(block.start_line, block.end_line),
                render_block(block),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Content of a one-line block without a CRLF `\r`.
fn single_line(content: &str) -> &str {
    content.strip_suffix('\r').unwrap_or(content)
}

fn render_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines
        .map(render_inline)
        .collect::<Vec<_>>()
        .join(Paragraph::LINE_BREAK)
}

fn render_code(code: &CodeView) -> String {
    let class = code
        .language
        .as_deref()
        .map(|lang| {
            format!(
                r#" class="language-{}""#,
                encode_double_quoted_attribute(lang)
            )
        })
        .unwrap_or_default();
    let body = code
        .lines
        .iter()
        .map(|l| format!(r#"<span data-line="{}">{}</span>"#, l.line, encode_text(&l.text)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<pre><code{class}>{body}</code></pre>")
}

fn render_table(table: &TableView) -> String {
    let head: String = table
        .header
        .iter()
        .map(|cell| format!("<th>{}</th>", render_inline(cell)))
        .collect();
    let body: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .cells
                .iter()
                .map(|cell| format!("<td>{}</td>", render_inline(cell)))
                .collect();
            format!(r#"<tr data-line="{}">{cells}</tr>"#, row.line)
        })
        .collect();
    format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;
    use insta::assert_snapshot;
    use rstest::rstest;

    fn render_first(md: &str) -> String {
        render_block(&parse(md)[0])
    }

    #[rstest]
    #[case(1, 1, "L1")]
    #[case(3, 7, "L3-7")]
    fn gutter_labels(#[case] start: usize, #[case] end: usize, #[case] expected: &str) {
        assert_eq!(gutter_label(start, end), expected);
    }

    #[test]
    fn heading_strips_marker() {
        assert_snapshot!(render_first("### Step **one**"), @"<h3>Step <strong>one</strong></h3>");
    }

    #[test]
    fn paragraph_lines_join_with_breaks() {
        assert_snapshot!(render_first("first line\nsecond _line_"), @"<p>first line<br />second <em>line</em></p>");
    }

    #[test]
    fn checked_list_item() {
        assert_snapshot!(
            render_first("  - [x] ship `v2`"),
            @r#"<li data-level="1"><input type="checkbox" disabled checked /> ship <code>v2</code></li>"#
        );
    }

    #[test]
    fn plain_ordered_item() {
        assert_snapshot!(render_first("2. second"), @r#"<li data-level="0">second</li>"#);
    }

    #[test]
    fn quote_strips_prefix_per_line() {
        assert_snapshot!(render_first("> one\n>two"), @"<blockquote>one<br />two</blockquote>");
    }

    #[test]
    fn rule() {
        assert_eq!(render_first("***"), "<hr />");
    }

    #[test]
    fn crlf_source_renders_like_lf() {
        let crlf = "## Goal\r\n\r\n- [ ] one\r\n\r\n> a\r\n> b\r\n\r\n| A |\r\n| 1 |\r\n\r\n```\r\nx\r\n```\r\n";
        let lf = crlf.replace('\r', "");
        let render_all = |md: &str| parse(md).iter().map(render_block).collect::<Vec<_>>();
        assert_eq!(render_all(crlf), render_all(&lf));
    }

    #[test]
    fn code_is_escaped_not_inlined() {
        assert_snapshot!(
            render_first("```html\n<b>**x**</b>\n```"),
            @r#"<pre><code class="language-html"><span data-line="2">&lt;b&gt;**x**&lt;/b&gt;</span></code></pre>"#
        );
    }

    #[test]
    fn code_language_is_attribute_escaped() {
        let html = render_first("```a\"b\nx");
        assert!(html.contains(r#"class="language-a&quot;b""#), "{html}");
    }

    #[test]
    fn table_rows_carry_lines() {
        assert_snapshot!(
            render_first("| A | B |\n|---|---|\n| *1* | 2 |"),
            @r#"<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr data-line="3"><td><em>1</em></td><td>2</td></tr></tbody></table>"#
        );
    }

    #[test]
    fn document_flags_blocks_with_open_threads() {
        let blocks = parse("# T\n\nbody\nmore");
        let open = BTreeSet::from([BlockId::for_start_line(3)]);
        assert_snapshot!(
            render_document(&blocks, &open),
            @r#"
        <section data-block="block-1" data-gutter="L1"><h1>T</h1></section>
        <section data-block="block-3" data-gutter="L3-4" data-open-thread><p>body<br />more</p></section>
        "#
        );
    }
}
