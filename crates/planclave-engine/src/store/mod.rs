//! # Review Storage
//!
//! [`ReviewStore`] is the persistence seam of the review service. The process
//! entry point creates one store value and hands it to [`ReviewService`]; there
//! is no global connection.
//!
//! Implementations own the multi-row guarantees:
//! - appending a version also bumps the plan's `updated_at`, atomically
//! - deleting a thread removes its comments first, then the thread, atomically
//!
//! [`ReviewService`]: crate::service::ReviewService

pub mod memory;
pub mod sqlite;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Comment, Plan, Reviewer, Thread, ThreadStatus, Version};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// A unique key (plan id, version number, reviewer assignment) already exists.
    #[error("already exists: {0}")]
    Duplicate(String),
    /// A row refers to a plan or thread that does not exist.
    #[error("missing parent: {0}")]
    MissingParent(String),
}

/// Persistence for plans, versions, reviewers, threads and comments.
///
/// Lookups return `Ok(None)` / `Ok(false)` for unknown keys; deciding whether
/// that is an error is the caller's business.
pub trait ReviewStore {
    /// Inserts a new plan together with its first version.
    fn insert_plan(&mut self, plan: &Plan, first: &Version) -> Result<(), StoreError>;
    fn plan(&self, id: &str) -> Result<Option<Plan>, StoreError>;
    /// All plans, most recently updated first.
    fn plans(&self) -> Result<Vec<Plan>, StoreError>;
    /// Sets the title and `updated_at`; `false` when the plan is unknown.
    fn rename_plan(&mut self, id: &str, title: &str, at: DateTime<Utc>)
    -> Result<bool, StoreError>;

    /// Appends a version and sets the plan's `updated_at` to its timestamp.
    fn append_version(&mut self, version: &Version) -> Result<(), StoreError>;
    fn latest_version(&self, plan_id: &str) -> Result<Option<Version>, StoreError>;
    /// All versions of a plan, newest first.
    fn versions(&self, plan_id: &str) -> Result<Vec<Version>, StoreError>;
    fn version(&self, plan_id: &str, number: u32) -> Result<Option<Version>, StoreError>;

    fn add_reviewer(&mut self, reviewer: &Reviewer) -> Result<(), StoreError>;
    fn reviewers(&self, plan_id: &str, version: u32) -> Result<Vec<Reviewer>, StoreError>;
    /// Sets or clears `completed_at`; `false` when there is no such assignment.
    fn set_review_completed(
        &mut self,
        plan_id: &str,
        version: u32,
        email: &str,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError>;

    /// Inserts a thread and the comments it carries.
    fn insert_thread(&mut self, thread: &Thread) -> Result<(), StoreError>;
    /// Threads of a plan with their comments, oldest first, optionally for one version.
    fn threads(&self, plan_id: &str, version: Option<u32>) -> Result<Vec<Thread>, StoreError>;
    fn thread(&self, id: Uuid) -> Result<Option<Thread>, StoreError>;
    fn set_thread_status(&mut self, id: Uuid, status: ThreadStatus) -> Result<bool, StoreError>;
    /// Deletes a thread and its comments; `false` when the thread is unknown.
    fn delete_thread(&mut self, id: Uuid) -> Result<bool, StoreError>;
    fn insert_comment(&mut self, comment: &Comment) -> Result<(), StoreError>;
}
