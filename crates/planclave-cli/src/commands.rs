use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use planclave_config::Config;
use planclave_engine::{
    Anchor, BlockId, Identity, NewPlan, NewThread, ParsedDoc, ReviewService, SqliteStore, Thread,
    anchoring::{block_anchor, line_anchor, open_block_ids},
    parse,
    parsing::rope::content_lines,
    render::{gutter_label, render_document},
};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{
    Cli, Command, CreatePlanArgs, CreateThreadArgs, PlanCommand, ReviewerCommand, ThreadCommand,
    VersionCommand, ViewArgs,
};
use crate::identity;

pub const UNTITLED: &str = "Untitled Plan";

/// Database location: `--database` / `DATABASE_URL`, then the config file, then the default.
pub fn database_path(flag: Option<PathBuf>, config: Option<&Config>) -> PathBuf {
    flag.or_else(|| config.map(|c| c.database_path.clone()))
        .unwrap_or_else(|| Config::default().database_path)
}

/// The first `# ` heading of a plan, trimmed.
pub fn extract_title(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let title = rest.trim();
        (!title.is_empty()).then_some(title)
    })
}

struct Ctx {
    cli_email: Option<String>,
    cli_name: Option<String>,
    json: bool,
    config: Option<Config>,
    database: PathBuf,
}

impl Ctx {
    fn identity(&self) -> Result<Identity> {
        identity::resolve(
            self.cli_email.as_deref(),
            self.cli_name.as_deref(),
            self.config.as_ref().and_then(|c| c.identity.as_ref()),
            identity::git_config,
        )
    }

    fn service(&self) -> Result<ReviewService<SqliteStore>> {
        let store = SqliteStore::open(&self.database)
            .with_context(|| format!("opening database {}", self.database.display()))?;
        Ok(ReviewService::new(store))
    }

    /// Prints `value` as JSON with `--json`, otherwise the text form.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let out = text(value);
            if !out.is_empty() {
                println!("{}", out.trim_end_matches('\n'));
            }
        }
        Ok(())
    }
}

pub fn run(cli: Cli, config: Option<Config>) -> Result<()> {
    let ctx = Ctx {
        database: database_path(cli.database, config.as_ref()),
        cli_email: cli.email,
        cli_name: cli.name,
        json: cli.json,
        config,
    };

    match cli.command {
        Command::Parse { file } => {
            let blocks = parse(&read(&file)?);
            ctx.emit(&blocks, |blocks| {
                blocks
                    .iter()
                    .map(|b| {
                        format!(
                            "{:<8} {:<10} {:<11} {}",
                            gutter_label(b.start_line, b.end_line),
                            b.id,
                            b.kind.name(),
                            first_line(&b.content)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Render { file } => {
            println!("{}", render_document(&parse(&read(&file)?), &BTreeSet::new()));
            Ok(())
        }
        Command::Plan(cmd) => plan(&ctx, cmd),
        Command::Version(cmd) => version(&ctx, cmd),
        Command::View(args) => view(&ctx, args),
        Command::Thread(cmd) => thread(&ctx, cmd),
        Command::Comment { thread, text } => {
            let me = ctx.identity()?;
            let comment = ctx.service()?.add_comment(thread, &text, &me)?;
            ctx.emit(&comment, |c| format!("{}", c.id))
        }
        Command::Reviewer(cmd) => reviewer(&ctx, cmd),
        Command::Export { plan } => {
            print!("{}", ctx.service()?.export(&plan)?);
            Ok(())
        }
    }
}

fn plan(ctx: &Ctx, cmd: PlanCommand) -> Result<()> {
    match cmd {
        PlanCommand::Create(args) => create_plan(ctx, args),
        PlanCommand::List => {
            let plans = ctx.service()?.list_plans()?;
            ctx.emit(&plans, |plans| {
                plans
                    .iter()
                    .map(|p| format!("{}\t{}\t{}", p.id, p.updated_at.to_rfc3339(), p.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        PlanCommand::Show { plan } => {
            let detail = ctx.service()?.get_plan(&plan)?;
            ctx.emit(&detail, |d| {
                format!(
                    "{}\nid:       {}\nversion:  {}\nproject:  {}\nfile:     {}\nauthor:   {} <{}>\nupdated:  {}",
                    d.plan.title,
                    d.plan.id,
                    d.latest_version,
                    d.plan.project_name,
                    d.plan.plan_filename,
                    d.plan.created_by.name,
                    d.plan.created_by.email,
                    d.plan.updated_at.to_rfc3339(),
                )
            })
        }
        PlanCommand::Rename { plan, title } => {
            let plan = ctx.service()?.rename_plan(&plan, &title)?;
            ctx.emit(&plan, |p| format!("{}\t{}", p.id, p.title))
        }
    }
}

fn create_plan(ctx: &Ctx, args: CreatePlanArgs) -> Result<()> {
    let content = read(&args.file)?;
    let title = args
        .title
        .unwrap_or_else(|| extract_title(&content).unwrap_or(UNTITLED).to_string());
    let project_name = match args.project {
        Some(p) => p,
        None => std::env::current_dir()
            .ok()
            .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default(),
    };
    let new = NewPlan {
        id: args.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        title,
        content,
        project_name,
        plan_filename: args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let me = ctx.identity()?;
    let plan = ctx.service()?.create_plan(new, &me)?;
    ctx.emit(&plan, |p| format!("{}\t{}", p.id, p.title))
}

fn version(ctx: &Ctx, cmd: VersionCommand) -> Result<()> {
    match cmd {
        VersionCommand::Submit { plan, file } => {
            let content = read(&file)?;
            let me = ctx.identity()?;
            let version = ctx.service()?.submit_version(&plan, &content, &me)?;
            ctx.emit(&version, |v| format!("{} v{}", v.plan_id, v.number))
        }
        VersionCommand::List { plan } => {
            let versions = ctx.service()?.list_versions(&plan)?;
            ctx.emit(&versions, |versions| {
                versions
                    .iter()
                    .map(|v| {
                        format!(
                            "v{}\t{}\t{}",
                            v.number,
                            v.created_at.to_rfc3339(),
                            v.submitted_by.name
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        VersionCommand::Show { plan, version } => {
            let version = ctx.service()?.get_version(&plan, &version)?;
            ctx.emit(&version, |v| v.content.clone())
        }
    }
}

fn view(ctx: &Ctx, args: ViewArgs) -> Result<()> {
    let view = ctx.service()?.view_version(&args.plan, &args.version)?;
    if args.html {
        println!(
            "{}",
            render_document(&view.blocks, &open_block_ids(&view.threads))
        );
        return Ok(());
    }
    ctx.emit(&view, |view| {
        let mut out = format!("{} v{}\n", view.version.plan_id, view.version.number);
        for block in &view.blocks {
            let threads = view.threads.get(&block.id).map_or(&[][..], Vec::as_slice);
            let open = threads.iter().filter(|t| t.is_open()).count();
            let flag = if open > 0 { "*" } else { " " };
            out.push_str(&format!(
                "\n{flag} {:<8} {:<10} {}\n",
                gutter_label(block.start_line, block.end_line),
                block.id,
                block.kind.name()
            ));
            for line in content_lines(&block.content) {
                out.push_str(&format!("    | {line}\n"));
            }
            for t in threads {
                out.push_str(&thread_text(t));
            }
        }
        out
    })
}

fn thread(ctx: &Ctx, cmd: ThreadCommand) -> Result<()> {
    match cmd {
        ThreadCommand::Create(args) => create_thread(ctx, args),
        ThreadCommand::List { plan, version } => {
            let threads = ctx.service()?.list_threads(&plan, version)?;
            ctx.emit(&threads, |threads| {
                threads
                    .iter()
                    .map(|t| {
                        format!(
                            "{}\tv{}\t{}\tL{}-{}\t{}\t{} comment(s)",
                            t.id,
                            t.version,
                            t.anchor.block_id,
                            t.anchor.start_line,
                            t.anchor.end_line,
                            t.status,
                            t.comments.len()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        ThreadCommand::Resolve { thread } => set_status(ctx, thread, "resolved"),
        ThreadCommand::Reopen { thread } => set_status(ctx, thread, "open"),
        ThreadCommand::Delete { thread } => {
            ctx.service()?.delete_thread(thread)?;
            if !ctx.json {
                println!("deleted thread {thread}");
            }
            Ok(())
        }
    }
}

fn create_thread(ctx: &Ctx, args: CreateThreadArgs) -> Result<()> {
    let mut service = ctx.service()?;
    let version = service.get_version(&args.plan, &args.version.to_string())?;
    let doc = ParsedDoc::new(&version.content);
    let block_id = BlockId::from(args.block.as_str());
    let Some(block) = doc.block(&block_id) else {
        bail!("version {} has no block {block_id}", version.number);
    };

    let anchor = match (args.line, args.start, args.end) {
        (Some(line), _, _) => match line_anchor(block, line) {
            Some(anchor) => anchor,
            None => bail!("line {line} is not a code line or table row of {block_id}"),
        },
        (None, Some(start), Some(end)) => Anchor::new(block_id, start, end),
        _ => block_anchor(block),
    };

    let me = ctx.identity()?;
    let thread = service.create_thread(
        &args.plan,
        NewThread {
            version: version.number,
            anchor,
            content: args.text,
        },
        &me,
    )?;
    ctx.emit(&thread, |t| t.id.to_string())
}

fn set_status(ctx: &Ctx, id: Uuid, status: &str) -> Result<()> {
    let thread = ctx.service()?.set_thread_status(id, status)?;
    ctx.emit(&thread, |t| format!("thread {} is now {}", t.id, t.status))
}

fn reviewer(ctx: &Ctx, cmd: ReviewerCommand) -> Result<()> {
    match cmd {
        ReviewerCommand::Add {
            plan,
            email,
            name,
            version,
        } => {
            let mut service = ctx.service()?;
            let version = match version {
                Some(v) => v,
                None => service.get_plan(&plan)?.latest_version,
            };
            let reviewer = service.add_reviewer(&plan, Identity::new(email, name), version)?;
            ctx.emit(&reviewer, |r| {
                format!("{} assigned to {} v{}", r.identity.email, r.plan_id, r.version)
            })
        }
        ReviewerCommand::List { plan } => {
            let reviewers = ctx.service()?.list_reviewers(&plan)?;
            ctx.emit(&reviewers, |reviewers| {
                reviewers
                    .iter()
                    .map(|r| {
                        let state = if r.is_done() { "done" } else { "pending" };
                        format!("{}\t{}\t{state}", r.identity.email, r.identity.name)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        ReviewerCommand::Done { plan } => mark(ctx, &plan, true),
        ReviewerCommand::Undone { plan } => mark(ctx, &plan, false),
    }
}

fn mark(ctx: &Ctx, plan: &str, done: bool) -> Result<()> {
    let me = ctx.identity()?;
    ctx.service()?.set_review_done(plan, &me, done)?;
    if !ctx.json {
        println!(
            "{plan}: review by {} marked {}",
            me.email,
            if done { "done" } else { "pending" }
        );
    }
    Ok(())
}

fn thread_text(t: &Thread) -> String {
    let mut out = format!(
        "    > {} [{}] L{}-{}\n",
        t.id, t.status, t.anchor.start_line, t.anchor.end_line
    );
    for c in &t.comments {
        out.push_str(&format!("      {}: {}\n", c.author.name, c.content));
    }
    out
}

fn first_line(content: &str) -> &str {
    content_lines(content).next().unwrap_or_default()
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
