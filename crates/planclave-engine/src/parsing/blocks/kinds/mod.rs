//! # Block Kinds
//!
//! Each kind owns its delimiters and the predicate that recognises its lines.
//! The classifier asks these types; it never hardcodes `#`, `|` or `>` itself.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod list_item;
pub mod paragraph;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use heading::Heading;
pub use list_item::{ListItem, ListLine, ListMarker};
pub use paragraph::Paragraph;
pub use table::TableRow;
pub use thematic_break::ThematicBreak;
