use std::collections::{BTreeMap, BTreeSet};

use crate::models::Thread;
use crate::parsing::blocks::BlockId;

/// Threads of one version keyed by the block they are anchored to, in
/// source line order.
pub type ThreadsByBlock = BTreeMap<BlockId, Vec<Thread>>;

/// Keeps the threads created against `version` and groups them by block id.
///
/// Within a block threads are ordered by creation time, and so are the
/// comments of each thread. Ties keep their input order.
pub fn group_by_block(threads: impl IntoIterator<Item = Thread>, version: u32) -> ThreadsByBlock {
    let mut grouped = ThreadsByBlock::new();
    for mut thread in threads.into_iter().filter(|t| t.version == version) {
        thread.comments.sort_by_key(|c| c.created_at);
        grouped
            .entry(thread.anchor.block_id.clone())
            .or_default()
            .push(thread);
    }
    for bucket in grouped.values_mut() {
        bucket.sort_by_key(|t| t.created_at);
    }
    grouped
}

/// Ids of blocks with at least one open thread.
pub fn open_block_ids(grouped: &ThreadsByBlock) -> BTreeSet<BlockId> {
    grouped
        .iter()
        .filter(|(_, threads)| threads.iter().any(Thread::is_open))
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Anchor, Comment, ThreadStatus};
    use crate::tests::{at, identity, thread};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn comment(thread_id: Uuid, content: &str, secs: i64) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            thread_id,
            author: identity("bo"),
            content: content.to_string(),
            created_at: at(secs),
        }
    }

    #[test]
    fn filters_to_version_and_groups() {
        // Given two threads on version 2 and one on version 1
        let threads = vec![
            thread(2, Anchor::new("block-1", 1, 1), 10),
            thread(2, Anchor::new("block-3", 3, 4), 20),
            thread(1, Anchor::new("block-1", 1, 1), 5),
        ];

        // When grouping for version 2
        let grouped = group_by_block(threads, 2);

        // Then both blocks appear, each with one thread
        let keys: Vec<_> = grouped.keys().map(BlockId::as_str).collect();
        assert_eq!(keys, vec!["block-1", "block-3"]);
        assert!(grouped.values().all(|v| v.len() == 1));
    }

    #[test]
    fn blocks_come_out_in_line_order() {
        let threads = vec![
            thread(1, Anchor::new("block-10", 10, 10), 0),
            thread(1, Anchor::new("block-9", 9, 9), 0),
        ];
        let grouped = group_by_block(threads, 1);
        let keys: Vec<_> = grouped.keys().map(BlockId::as_str).collect();
        assert_eq!(keys, vec!["block-9", "block-10"]);
    }

    #[test]
    fn version_without_threads_is_empty() {
        let threads = vec![thread(2, Anchor::new("block-1", 1, 1), 0)];
        assert!(group_by_block(threads, 1).is_empty());
    }

    #[test]
    fn threads_and_comments_sorted_by_creation() {
        let mut late = thread(1, Anchor::new("block-5", 5, 5), 50);
        let early = thread(1, Anchor::new("block-5", 5, 5), 10);
        late.comments = vec![
            comment(late.id, "second", 70),
            comment(late.id, "first", 60),
        ];
        let late_id = late.id;

        let grouped = group_by_block(vec![late, early], 1);
        let bucket = &grouped[&BlockId::from("block-5")];

        assert_eq!(bucket[1].id, late_id);
        let contents: Vec<_> = bucket[1].comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn open_ids_skip_fully_resolved_blocks() {
        let mut resolved = thread(1, Anchor::new("block-1", 1, 1), 0);
        resolved.status = ThreadStatus::Resolved;
        let open = thread(1, Anchor::new("block-4", 4, 4), 0);

        let grouped = group_by_block(vec![resolved, open], 1);

        assert_eq!(
            open_block_ids(&grouped),
            BTreeSet::from([BlockId::from("block-4")])
        );
    }
}
