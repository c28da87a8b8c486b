// Shared by the bench targets in this directory; not every target uses every helper.
#[allow(dead_code)]
pub fn generate_plan(sections: usize) -> String {
    let mut plan = String::from("# Rollout plan\n\n");
    for n in 0..sections {
        plan.push_str(&format!(
            "## Step {n}\n\n\
             Move **service {n}** behind the `cache` flag, see [runbook](https://example.com/{n}).\n\
             Keep the old path alive for a day.\n\n\
             - [ ] enable on staging\n\
             - [x] write the migration\n\
             \x20 1. check _error_ rates\n\n\
             ```sh\nmake deploy SERVICE={n}\nmake verify\n```\n\n\
             > Rollback: flip the flag back.\n\n\
             | Env | Owner |\n|---|---|\n| staging | ana |\n| prod | bo |\n\n---\n\n"
        ));
    }
    plan
}
