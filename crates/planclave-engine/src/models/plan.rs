use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who did something: the email is the key, the name is for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// A reviewed document. Its content lives in [`Version`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Caller-chosen id, unique across plans.
    pub id: String,
    pub title: String,
    /// Empty when the submitter did not say.
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub plan_filename: String,
    pub created_by: Identity,
    pub created_at: DateTime<Utc>,
    /// Bumped by renames and new versions.
    pub updated_at: DateTime<Utc>,
}

/// An immutable snapshot of a plan's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub plan_id: String,
    /// Numbered from 1 with no gaps.
    #[serde(rename = "version")]
    pub number: u32,
    pub content: String,
    pub submitted_by: Identity,
    pub created_at: DateTime<Utc>,
}
