//! # Block Parsing
//!
//! Two-phase block parsing over the lines of one document version.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified on its own
//!    into a `LineKind` (fence, heading, rule, table row, list item, quote,
//!    plain or blank), in that precedence order.
//!
//! 2. **Block Construction** (`builder`): a `BlockBuilder` state machine consumes
//!    the classified lines once, front to back, and emits `Block`s as they close.
//!
//! ## Modules
//!
//! - **`types`**: `Block`, `BlockKind`, `BlockId`
//! - **`kinds`**: per-kind delimiter knowledge (`CodeFence`, `Heading`, `ListItem`, ...)
//! - **`classify`**: `LineClassifier` producing `LineClass` for each line
//! - **`builder`**: `BlockBuilder` segmentation state machine
//!
//! ## Key Invariants
//!
//! - Blocks come out in line order, never overlap, and cover every non-blank line once
//! - Fenced code blocks are raw zones: no classification inside them
//! - An unterminated fence runs to end of input instead of failing

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

pub use builder::BlockBuilder;
pub use classify::{LineClass, LineClassifier, LineKind};
pub use types::{Block, BlockId, BlockKind};
