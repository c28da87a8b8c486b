//! # Thread Anchoring
//!
//! Threads are bound once to `(plan, version, block id, line span)`. Block ids
//! are derived from start lines, so they are only meaningful against the parse
//! of the version the thread was created on.
//!
//! - **`group`**: filter a plan's threads to one version and bucket them by block
//! - **`resolve`**: look anchors up in a parse, and build block or per-line anchors
//!
//! Nothing here moves an anchor. A thread whose block is gone from a parse is
//! reported as dangling and left as it was.

pub mod group;
pub mod resolve;

pub use group::{ThreadsByBlock, group_by_block, open_block_ids};
pub use resolve::{block_anchor, dangling, line_anchor, resolve_anchor};
