use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identity;

/// A person asked to review one version of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    pub plan_id: String,
    pub version: u32,
    #[serde(flatten)]
    pub identity: Identity,
    /// `None` while the review is pending.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Reviewer {
    pub fn is_done(&self) -> bool {
        self.completed_at.is_some()
    }
}
