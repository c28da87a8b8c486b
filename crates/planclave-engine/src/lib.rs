pub mod anchoring;
pub mod export;
pub mod models;
pub mod parsing;
pub mod render;
pub mod service;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use anchoring::{ThreadsByBlock, group_by_block};
pub use export::export_report;
pub use models::*;
pub use parsing::{ParsedDoc, blocks::{Block, BlockId, BlockKind}, parse};
pub use render::{render_block, render_document, render_inline};
pub use service::{NewPlan, NewThread, PlanDetail, ReviewError, ReviewService, VersionView};
pub use store::{MemoryStore, ReviewStore, SqliteStore, StoreError};
