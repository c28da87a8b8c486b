//! # Review Service
//!
//! The collaborator-facing operations over a [`ReviewStore`]: one method per
//! operation, each validating its input, enforcing existence and logging what
//! it changed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::anchoring::{ThreadsByBlock, group_by_block};
use crate::export::export_report;
use crate::models::{Anchor, Comment, Identity, Plan, Reviewer, Thread, ThreadStatus, Version};
use crate::parsing::{blocks::Block, parse};
use crate::store::{ReviewStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Input for [`ReviewService::create_plan`].
#[derive(Debug, Clone, Default)]
pub struct NewPlan {
    pub id: String,
    pub title: String,
    pub content: String,
    pub project_name: String,
    pub plan_filename: String,
}

/// Input for [`ReviewService::create_thread`]: where, and the opening comment.
#[derive(Debug, Clone)]
pub struct NewThread {
    pub version: u32,
    pub anchor: Anchor,
    pub content: String,
}

/// A plan together with its newest version number (0 when it has none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: Plan,
    pub latest_version: u32,
}

/// One version as a reviewer sees it: its blocks and the threads on them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionView {
    pub version: Version,
    pub blocks: Vec<Block>,
    pub threads: ThreadsByBlock,
}

pub struct ReviewService<S> {
    store: S,
}

impl<S: ReviewStore> ReviewService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a plan and its version 1 from `new.content`.
    pub fn create_plan(&mut self, new: NewPlan, by: &Identity) -> Result<Plan> {
        require("id", &new.id)?;
        require("title", &new.title)?;
        require("content", &new.content)?;

        let now = now();
        let plan = Plan {
            id: new.id,
            title: new.title,
            project_name: new.project_name,
            plan_filename: new.plan_filename,
            created_by: by.clone(),
            created_at: now,
            updated_at: now,
        };
        let first = Version {
            plan_id: plan.id.clone(),
            number: 1,
            content: new.content,
            submitted_by: by.clone(),
            created_at: now,
        };
        self.store
            .insert_plan(&plan, &first)
            .map_err(|e| duplicate_as_invalid(e, "a plan with this id already exists"))?;
        log::info!("created plan {} ({:?}) by {}", plan.id, plan.title, by.email);
        Ok(plan)
    }

    /// All plans, most recently updated first.
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.store.plans()?)
    }

    pub fn get_plan(&self, id: &str) -> Result<PlanDetail> {
        let plan = self.plan(id)?;
        let latest_version = self.latest_number(id)?;
        Ok(PlanDetail {
            plan,
            latest_version,
        })
    }

    pub fn rename_plan(&mut self, id: &str, title: &str) -> Result<Plan> {
        require("title", title)?;
        if !self.store.rename_plan(id, title, now())? {
            return Err(not_found(format!("plan {id}")));
        }
        log::info!("renamed plan {id} to {title:?}");
        self.plan(id)
    }

    /// Appends the next version (latest + 1) and bumps the plan's `updated_at`.
    pub fn submit_version(&mut self, plan_id: &str, content: &str, by: &Identity) -> Result<Version> {
        require("content", content)?;
        self.plan(plan_id)?;
        let version = Version {
            plan_id: plan_id.to_string(),
            number: self.latest_number(plan_id)? + 1,
            content: content.to_string(),
            submitted_by: by.clone(),
            created_at: now(),
        };
        self.store.append_version(&version)?;
        log::info!("plan {plan_id}: submitted version {} by {}", version.number, by.email);
        Ok(version)
    }

    /// All versions, newest first.
    pub fn list_versions(&self, plan_id: &str) -> Result<Vec<Version>> {
        self.plan(plan_id)?;
        Ok(self.store.versions(plan_id)?)
    }

    /// Looks a version up by its number as typed by the caller.
    pub fn get_version(&self, plan_id: &str, number: &str) -> Result<Version> {
        let number = parse_version_number(number)?;
        self.store
            .version(plan_id, number)?
            .ok_or_else(|| not_found(format!("version {number} of plan {plan_id}")))
    }

    /// Parses a version and groups its threads by block.
    pub fn view_version(&self, plan_id: &str, number: &str) -> Result<VersionView> {
        let version = self.get_version(plan_id, number)?;
        let blocks = parse(&version.content);
        let threads = group_by_block(self.store.threads(plan_id, Some(version.number))?, version.number);
        Ok(VersionView {
            version,
            blocks,
            threads,
        })
    }

    pub fn add_reviewer(&mut self, plan_id: &str, who: Identity, version: u32) -> Result<Reviewer> {
        require("email", &who.email)?;
        require("name", &who.name)?;
        self.plan(plan_id)?;
        let reviewer = Reviewer {
            plan_id: plan_id.to_string(),
            version,
            identity: who,
            completed_at: None,
        };
        self.store
            .add_reviewer(&reviewer)
            .map_err(|e| duplicate_as_invalid(e, "reviewer is already assigned to this version"))?;
        log::info!(
            "plan {plan_id}: assigned {} to version {version}",
            reviewer.identity.email
        );
        Ok(reviewer)
    }

    /// Reviewers assigned to the latest version.
    pub fn list_reviewers(&self, plan_id: &str) -> Result<Vec<Reviewer>> {
        let latest = self.latest_number(plan_id)?;
        Ok(self.store.reviewers(plan_id, latest)?)
    }

    /// Marks `who`'s review of the latest version done (or pending again).
    pub fn set_review_done(&mut self, plan_id: &str, who: &Identity, done: bool) -> Result<()> {
        let latest = self.latest_number(plan_id)?;
        let completed_at = done.then(now);
        if !self
            .store
            .set_review_completed(plan_id, latest, &who.email, completed_at)?
        {
            log::warn!("plan {plan_id}: {} is not a reviewer of version {latest}", who.email);
            return Err(not_found(format!(
                "reviewer {} for version {latest} of plan {plan_id}",
                who.email
            )));
        }
        log::info!(
            "plan {plan_id}: {} marked version {latest} {}",
            who.email,
            if done { "reviewed" } else { "pending" }
        );
        Ok(())
    }

    /// Opens a thread with its first comment. The anchor is stored as given.
    pub fn create_thread(&mut self, plan_id: &str, new: NewThread, author: &Identity) -> Result<Thread> {
        require("blockId", new.anchor.block_id.as_str())?;
        require("content", &new.content)?;
        if new.version == 0 {
            return Err(invalid("versions are numbered from 1"));
        }
        let Anchor {
            start_line,
            end_line,
            ..
        } = new.anchor;
        if start_line == 0 || end_line < start_line {
            return Err(invalid(format!("bad line span {start_line}-{end_line}")));
        }
        self.plan(plan_id)?;

        let created_at = now();
        let id = Uuid::new_v4();
        let thread = Thread {
            id,
            plan_id: plan_id.to_string(),
            version: new.version,
            anchor: new.anchor,
            author: author.clone(),
            status: ThreadStatus::Open,
            created_at,
            comments: vec![Comment {
                id: Uuid::new_v4(),
                thread_id: id,
                author: author.clone(),
                content: new.content,
                created_at,
            }],
        };
        self.store.insert_thread(&thread)?;
        log::info!(
            "plan {plan_id}: thread {id} on {} (L{start_line}-{end_line}) of version {}",
            thread.anchor.block_id,
            thread.version
        );
        Ok(thread)
    }

    /// Threads of a plan with their comments, optionally for one version only.
    pub fn list_threads(&self, plan_id: &str, version: Option<u32>) -> Result<Vec<Thread>> {
        Ok(self.store.threads(plan_id, version)?)
    }

    /// Sets a thread's status from its wire name (`open` / `resolved`).
    pub fn set_thread_status(&mut self, thread_id: Uuid, status: &str) -> Result<Thread> {
        let status: ThreadStatus = status.parse().map_err(|e| {
            log::warn!("thread {thread_id}: rejected status change: {e}");
            invalid(e)
        })?;
        if !self.store.set_thread_status(thread_id, status)? {
            return Err(not_found(format!("thread {thread_id}")));
        }
        log::info!("thread {thread_id} is now {status}");
        self.thread(thread_id)
    }

    /// Deletes a thread and all of its comments.
    pub fn delete_thread(&mut self, thread_id: Uuid) -> Result<()> {
        if !self.store.delete_thread(thread_id)? {
            return Err(not_found(format!("thread {thread_id}")));
        }
        log::info!("deleted thread {thread_id}");
        Ok(())
    }

    pub fn add_comment(&mut self, thread_id: Uuid, content: &str, author: &Identity) -> Result<Comment> {
        require("content", content)?;
        self.thread(thread_id)?;
        let comment = Comment {
            id: Uuid::new_v4(),
            thread_id,
            author: author.clone(),
            content: content.to_string(),
            created_at: now(),
        };
        self.store.insert_comment(&comment)?;
        log::info!("thread {thread_id}: comment by {}", author.email);
        Ok(comment)
    }

    /// Plain-text report over the latest version and every thread of the plan.
    pub fn export(&self, plan_id: &str) -> Result<String> {
        let plan = self.plan(plan_id)?;
        let latest = self.store.latest_version(plan_id)?;
        let number = latest.as_ref().map_or(0, |v| v.number);
        let reviewers = self.store.reviewers(plan_id, number)?;
        let threads = self.store.threads(plan_id, None)?;
        Ok(export_report(&plan, latest.as_ref(), &reviewers, &threads))
    }

    fn plan(&self, id: &str) -> Result<Plan> {
        self.store
            .plan(id)?
            .ok_or_else(|| not_found(format!("plan {id}")))
    }

    fn thread(&self, id: Uuid) -> Result<Thread> {
        self.store
            .thread(id)?
            .ok_or_else(|| not_found(format!("thread {id}")))
    }

    fn latest_number(&self, plan_id: &str) -> Result<u32> {
        Ok(self.store.latest_version(plan_id)?.map_or(0, |v| v.number))
    }
}

/// Parses a caller-supplied version number; surrounding whitespace is ignored.
pub fn parse_version_number(text: &str) -> Result<u32> {
    text.trim().parse().map_err(|_| {
        log::warn!("rejected version number {text:?}");
        invalid(format!("invalid version number {text:?}"))
    })
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        log::warn!("rejected request: {field} is required");
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

fn invalid(msg: impl ToString) -> ReviewError {
    ReviewError::InvalidInput(msg.to_string())
}

fn not_found(what: String) -> ReviewError {
    ReviewError::NotFound(what)
}

fn duplicate_as_invalid(err: StoreError, msg: &str) -> ReviewError {
    match err {
        StoreError::Duplicate(what) => {
            log::warn!("rejected duplicate {what}");
            invalid(msg)
        }
        other => ReviewError::Store(other),
    }
}
