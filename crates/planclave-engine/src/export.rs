//! Plain-text review report for a plan, meant to be pasted back to the author.

use xi_rope::Rope;

use crate::models::{Plan, Reviewer, Thread, Version};
use crate::parsing::rope::{line_range_text, truncate_chars};

/// Characters of source shown next to each thread heading.
pub const SNIPPET_CHARS: usize = 60;

/// Builds the export report.
///
/// `latest` is the newest version (snippets are cut from its content, even for
/// threads created on older versions), `reviewers` are that version's
/// assignments and `threads` are all threads of the plan with their comments.
/// Threads without comments are counted but get no section.
pub fn export_report(
    plan: &Plan,
    latest: Option<&Version>,
    reviewers: &[Reviewer],
    threads: &[Thread],
) -> String {
    let version = latest.map_or(0, |v| v.number);
    let rope = Rope::from(latest.map_or("", |v| v.content.as_str()));

    let (done, pending): (Vec<&Reviewer>, Vec<&Reviewer>) =
        reviewers.iter().partition(|r| r.is_done());
    let open = threads.iter().filter(|t| t.is_open()).count();
    let resolved = threads.len() - open;

    let mut ordered: Vec<&Thread> = threads.iter().collect();
    ordered.sort_by_key(|t| t.anchor.start_line);
    let sections: Vec<String> = ordered
        .into_iter()
        .filter_map(|t| thread_section(&rope, t))
        .collect();

    format!(
        "# Planclave Review: {title}\n\
         \n\
         Plan ID: {id}\n\
         Version: {version}\n\
         Reviews complete: {done_count}/{total} ({done_names}; pending: {pending_names})\n\
         Open threads: {open}\n\
         \n\
         ## Block comments\n\
         \n\
         {sections}\n\
         \n\
         ## Summary\n\
         {open} open, {resolved} resolved.\n",
        title = plan.title,
        id = plan.id,
        done_count = done.len(),
        total = reviewers.len(),
        done_names = names(&done),
        pending_names = names(&pending),
        sections = sections.join("\n\n"),
    )
}

fn thread_section(rope: &Rope, thread: &Thread) -> Option<String> {
    let (first, rest) = thread.comments.split_first()?;
    let (start, end) = (thread.anchor.start_line, thread.anchor.end_line);
    let text = line_range_text(rope, start, end);
    let snippet = truncate_chars(&text, SNIPPET_CHARS);

    let mut section = format!(
        "### L{start}-L{end}: \"{snippet}\"\n\n**{}** [{}]: {}",
        first.author.name, thread.status, first.content
    );
    for reply in rest {
        section.push_str(&format!(
            "\n  > **{}**: {}",
            reply.author.name, reply.content
        ));
    }
    Some(section)
}

fn names(reviewers: &[&Reviewer]) -> String {
    reviewers
        .iter()
        .map(|r| r.identity.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Anchor, Comment, ThreadStatus};
    use crate::tests::{at, identity, thread};
    use insta::assert_snapshot;
    use uuid::Uuid;

    fn plan() -> Plan {
        Plan {
            id: "plan-1".into(),
            title: "Cache rollout".into(),
            project_name: String::new(),
            plan_filename: String::new(),
            created_by: identity("ana"),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    fn version(content: &str) -> Version {
        Version {
            plan_id: "plan-1".into(),
            number: 2,
            content: content.into(),
            submitted_by: identity("ana"),
            created_at: at(0),
        }
    }

    fn with_comments(mut t: Thread, comments: &[(&str, &str)]) -> Thread {
        t.comments = comments
            .iter()
            .enumerate()
            .map(|(i, (who, text))| Comment {
                id: Uuid::new_v4(),
                thread_id: t.id,
                author: identity(who),
                content: text.to_string(),
                created_at: at(i as i64),
            })
            .collect();
        t
    }

    fn reviewer(name: &str, done: bool) -> Reviewer {
        Reviewer {
            plan_id: "plan-1".into(),
            version: 2,
            identity: identity(name),
            completed_at: done.then(|| at(5)),
        }
    }

    #[test]
    fn full_report() {
        let latest = version("# Cache rollout\n\nWarm the cache before switching traffic.\n\n- [ ] flip flag");
        let mut resolved = with_comments(
            thread(1, Anchor::new("block-5", 5, 5), 2),
            &[("bo", "Who flips it?")],
        );
        resolved.status = ThreadStatus::Resolved;
        let threads = vec![
            resolved,
            with_comments(
                thread(2, Anchor::new("block-3", 3, 3), 1),
                &[("bo", "How long does warming take?"), ("ana", "About ten minutes.")],
            ),
            thread(2, Anchor::new("block-1", 1, 1), 0),
        ];
        let reviewers = vec![reviewer("bo", true), reviewer("cy", false)];

        let report = export_report(&plan(), Some(&latest), &reviewers, &threads);

        assert_snapshot!(report, @r#"
        # Planclave Review: Cache rollout

        Plan ID: plan-1
        Version: 2
        Reviews complete: 1/2 (bo; pending: cy)
        Open threads: 2

        ## Block comments

        ### L3-L3: "Warm the cache before switching traffic."

        **bo** [open]: How long does warming take?
          > **ana**: About ten minutes.

        ### L5-L5: "- [ ] flip flag"

        **bo** [resolved]: Who flips it?

        ## Summary
        2 open, 1 resolved.
        "#);
    }

    #[test]
    fn snippet_is_clamped_and_truncated() {
        let long = "x".repeat(80);
        let latest = version(&format!("{long}\nshort"));
        let threads = vec![
            with_comments(thread(2, Anchor::new("block-1", 1, 1), 0), &[("bo", "a")]),
            with_comments(thread(2, Anchor::new("block-9", 9, 12), 0), &[("bo", "b")]),
        ];

        let report = export_report(&plan(), Some(&latest), &[], &threads);

        assert!(report.contains(&format!("### L1-L1: \"{}\"", "x".repeat(60))));
        assert!(report.contains("### L9-L12: \"\""));
    }

    #[test]
    fn plan_without_versions() {
        let report = export_report(&plan(), None, &[], &[]);
        assert!(report.contains("Version: 0\n"));
        assert!(report.contains("Reviews complete: 0/0 (; pending: )"));
        assert!(report.ends_with("0 open, 0 resolved.\n"));
    }
}
