use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identity;
use crate::parsing::blocks::BlockId;

/// Where a thread points: a block of one version plus a line span.
///
/// The span is usually the block's own range, but per-line threads on code
/// and table rows narrow it to a single line inside the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub block_id: BlockId,
    pub start_line: usize,
    pub end_line: usize,
}

impl Anchor {
    pub fn new(block_id: impl Into<BlockId>, start_line: usize, end_line: usize) -> Self {
        Self {
            block_id: block_id.into(),
            start_line,
            end_line,
        }
    }

    /// A one-line anchor inside the block `block_id`.
    pub fn line(block_id: impl Into<BlockId>, line: usize) -> Self {
        Self::new(block_id, line, line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    #[default]
    Open,
    Resolved,
}

impl ThreadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreadStatus::Open => "open",
            ThreadStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown thread status {0:?} (expected \"open\" or \"resolved\")")]
pub struct UnknownStatus(pub String);

impl FromStr for ThreadStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(ThreadStatus::Open),
            "resolved" => Ok(ThreadStatus::Resolved),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub author: Identity,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A review discussion anchored once to a block of one version.
///
/// The anchor is never rewritten: against a later version the block id may
/// name a different block, or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: Uuid,
    pub plan_id: String,
    pub version: u32,
    #[serde(flatten)]
    pub anchor: Anchor,
    pub author: Identity,
    pub status: ThreadStatus,
    pub created_at: DateTime<Utc>,
    /// Oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Thread {
    pub fn is_open(&self) -> bool {
        self.status == ThreadStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("open", ThreadStatus::Open)]
    #[case("resolved", ThreadStatus::Resolved)]
    fn status_parses(#[case] text: &str, #[case] expected: ThreadStatus) {
        assert_eq!(text.parse::<ThreadStatus>(), Ok(expected));
        assert_eq!(expected.to_string(), text);
    }

    #[rstest]
    #[case("Open")]
    #[case("closed")]
    #[case("")]
    fn status_rejects_anything_else(#[case] text: &str) {
        assert_eq!(
            text.parse::<ThreadStatus>(),
            Err(UnknownStatus(text.to_string()))
        );
    }

    #[test]
    fn thread_json_is_flat() {
        let thread = Thread {
            id: Uuid::nil(),
            plan_id: "p".into(),
            version: 2,
            anchor: Anchor::new("block-3", 3, 4),
            author: Identity::new("a@x.io", "Ana"),
            status: ThreadStatus::Resolved,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            comments: vec![],
        };
        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["blockId"], "block-3");
        assert_eq!(json["startLine"], 3);
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["author"]["name"], "Ana");
    }
}
