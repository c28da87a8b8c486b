pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{LineRef, content_lines, lines_with_spans};
pub use slice::{line_range_text, truncate_chars};
pub use span::Span;
