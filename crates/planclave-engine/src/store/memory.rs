use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ReviewStore, StoreError};
use crate::models::{Comment, Plan, Reviewer, Thread, ThreadStatus, Version};

/// In-process store. Rows live in insertion order; nothing survives the process.
///
/// Threads are kept without their comments, which live in their own list and
/// are joined back on read, so deletes follow the same two steps as SQLite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    plans: Vec<Plan>,
    versions: Vec<Version>,
    reviewers: Vec<Reviewer>,
    threads: Vec<Thread>,
    comments: Vec<Comment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn plan_mut(&mut self, id: &str) -> Option<&mut Plan> {
        self.plans.iter_mut().find(|p| p.id == id)
    }

    fn with_comments(&self, thread: &Thread) -> Thread {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.thread_id == thread.id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Thread {
            comments,
            ..thread.clone()
        }
    }

    fn require_plan(&self, id: &str) -> Result<(), StoreError> {
        if self.plans.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(StoreError::MissingParent(format!("plan {id}")))
        }
    }
}

impl ReviewStore for MemoryStore {
    fn insert_plan(&mut self, plan: &Plan, first: &Version) -> Result<(), StoreError> {
        if self.plans.iter().any(|p| p.id == plan.id) {
            return Err(StoreError::Duplicate(format!("plan {}", plan.id)));
        }
        self.plans.push(plan.clone());
        self.versions.push(first.clone());
        Ok(())
    }

    fn plan(&self, id: &str) -> Result<Option<Plan>, StoreError> {
        Ok(self.plans.iter().find(|p| p.id == id).cloned())
    }

    fn plans(&self) -> Result<Vec<Plan>, StoreError> {
        let mut plans = self.plans.clone();
        plans.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(plans)
    }

    fn rename_plan(
        &mut self,
        id: &str,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Ok(match self.plan_mut(id) {
            Some(plan) => {
                plan.title = title.to_string();
                plan.updated_at = at;
                true
            }
            None => false,
        })
    }

    fn append_version(&mut self, version: &Version) -> Result<(), StoreError> {
        if self
            .versions
            .iter()
            .any(|v| v.plan_id == version.plan_id && v.number == version.number)
        {
            return Err(StoreError::Duplicate(format!(
                "version {} of plan {}",
                version.number, version.plan_id
            )));
        }
        let plan = self
            .plan_mut(&version.plan_id)
            .ok_or_else(|| StoreError::MissingParent(format!("plan {}", version.plan_id)))?;
        plan.updated_at = version.created_at;
        self.versions.push(version.clone());
        Ok(())
    }

    fn latest_version(&self, plan_id: &str) -> Result<Option<Version>, StoreError> {
        Ok(self
            .versions
            .iter()
            .filter(|v| v.plan_id == plan_id)
            .max_by_key(|v| v.number)
            .cloned())
    }

    fn versions(&self, plan_id: &str) -> Result<Vec<Version>, StoreError> {
        let mut versions: Vec<Version> = self
            .versions
            .iter()
            .filter(|v| v.plan_id == plan_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.number.cmp(&a.number));
        Ok(versions)
    }

    fn version(&self, plan_id: &str, number: u32) -> Result<Option<Version>, StoreError> {
        Ok(self
            .versions
            .iter()
            .find(|v| v.plan_id == plan_id && v.number == number)
            .cloned())
    }

    fn add_reviewer(&mut self, reviewer: &Reviewer) -> Result<(), StoreError> {
        self.require_plan(&reviewer.plan_id)?;
        if self.reviewers.iter().any(|r| {
            r.plan_id == reviewer.plan_id
                && r.version == reviewer.version
                && r.identity.email == reviewer.identity.email
        }) {
            return Err(StoreError::Duplicate(format!(
                "reviewer {} on version {}",
                reviewer.identity.email, reviewer.version
            )));
        }
        self.reviewers.push(reviewer.clone());
        Ok(())
    }

    fn reviewers(&self, plan_id: &str, version: u32) -> Result<Vec<Reviewer>, StoreError> {
        Ok(self
            .reviewers
            .iter()
            .filter(|r| r.plan_id == plan_id && r.version == version)
            .cloned()
            .collect())
    }

    fn set_review_completed(
        &mut self,
        plan_id: &str,
        version: u32,
        email: &str,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        let found = self
            .reviewers
            .iter_mut()
            .find(|r| r.plan_id == plan_id && r.version == version && r.identity.email == email);
        Ok(match found {
            Some(reviewer) => {
                reviewer.completed_at = completed_at;
                true
            }
            None => false,
        })
    }

    fn insert_thread(&mut self, thread: &Thread) -> Result<(), StoreError> {
        self.require_plan(&thread.plan_id)?;
        if self.threads.iter().any(|t| t.id == thread.id) {
            return Err(StoreError::Duplicate(format!("thread {}", thread.id)));
        }
        self.comments.extend(thread.comments.iter().cloned());
        self.threads.push(Thread {
            comments: Vec::new(),
            ..thread.clone()
        });
        Ok(())
    }

    fn threads(&self, plan_id: &str, version: Option<u32>) -> Result<Vec<Thread>, StoreError> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|t| t.plan_id == plan_id && version.is_none_or(|v| t.version == v))
            .map(|t| self.with_comments(t))
            .collect();
        threads.sort_by_key(|t| t.created_at);
        Ok(threads)
    }

    fn thread(&self, id: Uuid) -> Result<Option<Thread>, StoreError> {
        Ok(self
            .threads
            .iter()
            .find(|t| t.id == id)
            .map(|t| self.with_comments(t)))
    }

    fn set_thread_status(&mut self, id: Uuid, status: ThreadStatus) -> Result<bool, StoreError> {
        Ok(match self.threads.iter_mut().find(|t| t.id == id) {
            Some(thread) => {
                thread.status = status;
                true
            }
            None => false,
        })
    }

    fn delete_thread(&mut self, id: Uuid) -> Result<bool, StoreError> {
        if !self.threads.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        self.comments.retain(|c| c.thread_id != id);
        self.threads.retain(|t| t.id != id);
        Ok(true)
    }

    fn insert_comment(&mut self, comment: &Comment) -> Result<(), StoreError> {
        if !self.threads.iter().any(|t| t.id == comment.thread_id) {
            return Err(StoreError::MissingParent(format!(
                "thread {}",
                comment.thread_id
            )));
        }
        self.comments.push(comment.clone());
        Ok(())
    }
}
