pub mod blocks;
pub mod invariants;
pub mod rope;

use xi_rope::Rope;

use blocks::{Block, BlockBuilder, LineClassifier};
use rope::lines_with_spans;

/// A parsed version: the source rope alongside its blocks.
pub struct ParsedDoc {
    pub rope: Rope,
    pub blocks: Vec<Block>,
}

/// Segments a document into blocks.
///
/// Total: every input parses, and every non-blank line lands in exactly one block.
pub fn parse(document: &str) -> Vec<Block> {
    parse_document(&Rope::from(document))
}

pub fn parse_document(rope: &Rope) -> Vec<Block> {
    let classifier = LineClassifier;
    let mut builder = BlockBuilder::new();

    for lr in lines_with_spans(rope) {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }

    let blocks = builder.finish();
    log::debug!("parsed {} bytes into {} blocks", rope.len(), blocks.len());
    blocks
}

impl ParsedDoc {
    /// Parses `document`, keeping the rope for later slicing.
    pub fn new(document: &str) -> Self {
        let rope = Rope::from(document);
        let blocks = parse_document(&rope);
        Self { rope, blocks }
    }

    pub fn block(&self, id: &blocks::BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocks::BlockId;

    #[test]
    fn parsed_doc_looks_up_blocks() {
        let doc = ParsedDoc::new("# T\n\npara\nmore\n\n- item");
        invariants::check(&doc.rope, &doc.blocks);

        assert_eq!(doc.block(&BlockId::from("block-3")).map(|b| b.end_line), Some(4));
        assert!(doc.block(&BlockId::from("block-4")).is_none());
        assert_eq!(
            doc.block(&BlockId::from("block-6")).map(|b| b.kind.name()),
            Some("list-item")
        );
    }
}
