use planclave_engine::parsing::{
    blocks::{Block, BlockKind},
    invariants, parse, parse_document,
};
use planclave_engine::render::{TableView, render_inline};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn checked(md: &str) -> Vec<Block> {
    let rope = xi_rope::Rope::from(md);
    let blocks = parse_document(&rope);
    invariants::check(&rope, &blocks);
    blocks
}

fn summary(blocks: &[Block]) -> Vec<(&'static str, usize, usize)> {
    blocks
        .iter()
        .map(|b| (b.kind.name(), b.start_line, b.end_line))
        .collect()
}

#[test]
fn fixture_rollout_plan() {
    let blocks = checked(&fixture("rollout_plan"));
    assert_eq!(
        summary(&blocks),
        vec![
            ("heading", 1, 1),
            ("paragraph", 3, 4),
            ("heading", 6, 6),
            ("list-item", 8, 8),
            ("list-item", 9, 9),
            ("list-item", 10, 10),
            ("list-item", 11, 11),
            ("code", 13, 17),
            ("blockquote", 19, 20),
            ("table", 22, 25),
            ("hr", 27, 27),
            ("paragraph", 29, 29),
        ]
    );
    assert_eq!(blocks[4].kind, BlockKind::ListItem { level: 0, checked: Some(true) });
    assert_eq!(blocks[5].kind, BlockKind::ListItem { level: 1, checked: None });
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("plain")]
#[case("a\n\nb\n\n\nc\n")]
#[case("```\nunterminated\n\n# not a heading")]
#[case("| a |\n> q\n- l\n# h\n---\np")]
#[case("  \t\n- x\n  - y\n    - z\n")]
#[case("line\r\nnext\r\n\r\n# crlf\r\n")]
#[case("```a\n```\n```b\n```")]
#[case("> one\n>\n> three")]
#[case("***\n___\n- - -")]
fn blocks_cover_every_non_blank_line_once(#[case] md: &str) {
    checked(md);
}

#[test]
fn fixture_respects_invariants_line_by_line() {
    let md = fixture("rollout_plan");
    // Every prefix of the document is itself a document.
    let lines: Vec<&str> = md.split('\n').collect();
    for n in 0..=lines.len() {
        checked(&lines[..n].join("\n"));
    }
}

#[rstest]
#[case("```rust\nfn main() {}\n```")]
#[case("```python\nprint(1)")]
#[case("```\n\n# inside\n\n```")]
#[case("| A | B |\n|---|---|\n| 1 | 2 |")]
#[case("> quoted\n>  more")]
fn reparsing_block_content_keeps_kind(#[case] md: &str) {
    let first = parse(md);
    assert_eq!(first.len(), 1);
    let again = parse(&first[0].content);
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].kind, first[0].kind);
    assert_eq!(again[0].content, first[0].content);
}

#[test]
fn reparsing_fixture_blocks_keeps_kind() {
    for block in parse(&fixture("rollout_plan")) {
        if matches!(
            block.kind,
            BlockKind::Code { .. } | BlockKind::Table | BlockKind::BlockQuote
        ) {
            let again = parse(&block.content);
            assert_eq!(again.len(), 1, "{}", block.id);
            assert_eq!(again[0].kind, block.kind);
        }
    }
}

#[rstest]
#[case("plain text with nothing special")]
#[case("numbers 1, 2 and 3; punctuation!?")]
#[case("")]
fn render_inline_idempotent_on_plain_text(#[case] text: &str) {
    let once = render_inline(text);
    assert_eq!(render_inline(&once), once);
}

#[test]
fn escaping_precedes_substitution() {
    let html = render_inline("<b>**x**</b>");
    assert_eq!(html, "&lt;b&gt;<strong>x</strong>&lt;/b&gt;");
    assert!(!html.contains("<b>"));
}

#[test]
fn unterminated_python_fence() {
    let blocks = checked("```python\nprint(1)");
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].kind,
        BlockKind::Code {
            language: Some("python".into())
        }
    );
    assert_eq!(blocks[0].end_line, 2);
}

#[test]
fn mixed_checkbox_list() {
    let blocks = checked("- [ ] todo\n- [x] done");
    assert_eq!(
        blocks.iter().map(|b| b.kind.clone()).collect::<Vec<_>>(),
        vec![
            BlockKind::ListItem { level: 0, checked: Some(false) },
            BlockKind::ListItem { level: 0, checked: Some(true) },
        ]
    );
    assert_eq!(summary(&blocks), vec![("list-item", 1, 1), ("list-item", 2, 2)]);
}

#[test]
fn table_with_separator() {
    let blocks = checked("| A | B |\n|---|---|\n| 1 | 2 |");
    assert_eq!(blocks.len(), 1);
    let table = TableView::from_block(&blocks[0]).unwrap();
    assert_eq!(table.header, vec!["A", "B"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells, vec!["1", "2"]);
    assert_eq!(table.rows[0].line, blocks[0].start_line + 2);
}

#[test]
fn block_json_shape() {
    let blocks = parse("## Two\n\n- [x] done\n\n```\nraw\n```");
    let json = serde_json::to_value(&blocks).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"id": "block-1", "type": "heading", "level": 2, "content": "## Two", "startLine": 1, "endLine": 1},
            {"id": "block-3", "type": "list-item", "level": 0, "checked": true, "content": "- [x] done", "startLine": 3, "endLine": 3},
            {"id": "block-5", "type": "code", "content": "```\nraw\n```", "startLine": 5, "endLine": 7}
        ])
    );
}
