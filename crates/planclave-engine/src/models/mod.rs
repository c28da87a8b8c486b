pub mod plan;
pub mod reviewer;
pub mod thread;

pub use plan::{Identity, Plan, Version};
pub use reviewer::Reviewer;
pub use thread::{Anchor, Comment, Thread, ThreadStatus, UnknownStatus};
