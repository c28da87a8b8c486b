//! Shared fixtures for unit tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Anchor, Identity, Thread, ThreadStatus};

/// A fixed instant `secs` seconds after the epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// An identity whose email is derived from `name`.
pub fn identity(name: &str) -> Identity {
    Identity::new(format!("{name}@example.com"), name)
}

/// An open, comment-less thread on plan `plan-1`.
pub fn thread(version: u32, anchor: Anchor, created_secs: i64) -> Thread {
    Thread {
        id: Uuid::new_v4(),
        plan_id: "plan-1".to_string(),
        version,
        anchor,
        author: identity("ana"),
        status: ThreadStatus::Open,
        created_at: at(created_secs),
        comments: Vec::new(),
    }
}
