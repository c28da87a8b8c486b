//! # Rendering
//!
//! Turns parsed blocks into semantic HTML. Inline markup is handled by a fixed
//! sequence of substitutions over escaped text; block markup is one exhaustive
//! `match` over [`BlockKind`](crate::parsing::blocks::BlockKind).
//!
//! Code and table blocks also expose line-level views ([`CodeView`],
//! [`TableView`]) so threads can target a single source line inside them.

pub mod block;
pub mod code;
pub mod inline;
pub mod table;

pub use block::{gutter_label, render_block, render_document};
pub use code::{CodeLine, CodeView};
pub use inline::render_inline;
pub use table::{TableBodyRow, TableView};
