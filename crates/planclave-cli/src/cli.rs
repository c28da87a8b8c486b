use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "planclave", version, about = "Line-anchored review threads for plan documents")]
pub struct Cli {
    /// SQLite database file (default: config file, then ./data/planclave.db)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database: Option<PathBuf>,

    /// Act as this email instead of the configured or git identity
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Display name to go with --email
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Segment a markdown file into blocks
    Parse { file: PathBuf },

    /// Render a markdown file to HTML
    Render { file: PathBuf },

    /// Create, list, show and rename plans
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Submit and inspect plan versions
    #[command(subcommand)]
    Version(VersionCommand),

    /// Show one version with its threads, block by block
    View(ViewArgs),

    /// Open, list and change review threads
    #[command(subcommand)]
    Thread(ThreadCommand),

    /// Reply to a thread
    Comment { thread: Uuid, text: String },

    /// Assign reviewers and record review completion
    #[command(subcommand)]
    Reviewer(ReviewerCommand),

    /// Print the plain-text review report for a plan
    Export { plan: String },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Create a plan from a file; it becomes version 1
    Create(CreatePlanArgs),
    List,
    Show { plan: String },
    Rename { plan: String, title: String },
}

#[derive(Args, Debug)]
pub struct CreatePlanArgs {
    pub file: PathBuf,

    /// Plan id (default: a random UUID)
    #[arg(long)]
    pub id: Option<String>,

    /// Title (default: the first `# ` heading of the file)
    #[arg(long)]
    pub title: Option<String>,

    /// Project name (default: the current directory's name)
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum VersionCommand {
    /// Submit a file as the next version of a plan
    Submit { plan: String, file: PathBuf },
    List { plan: String },
    Show { plan: String, version: String },
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    pub plan: String,
    pub version: String,

    /// Emit the rendered HTML document instead of the text outline
    #[arg(long)]
    pub html: bool,
}

#[derive(Subcommand, Debug)]
pub enum ThreadCommand {
    /// Open a thread on a block (or one code line / table row) of a version
    Create(CreateThreadArgs),
    List {
        plan: String,
        #[arg(long)]
        version: Option<u32>,
    },
    Resolve { thread: Uuid },
    Reopen { thread: Uuid },
    Delete { thread: Uuid },
}

#[derive(Args, Debug)]
pub struct CreateThreadArgs {
    pub plan: String,

    #[arg(long)]
    pub version: u32,

    /// Block id, e.g. `block-12`
    #[arg(long)]
    pub block: String,

    /// Target a single code line or table row inside the block
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub line: Option<usize>,

    /// Explicit span start (default: the block's first line)
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    /// The opening comment
    pub text: String,
}

#[derive(Subcommand, Debug)]
pub enum ReviewerCommand {
    /// Assign a reviewer (default: to the latest version)
    Add {
        plan: String,
        email: String,
        name: String,
        #[arg(long)]
        version: Option<u32>,
    },
    List { plan: String },
    /// Mark your review of the latest version complete
    Done { plan: String },
    /// Mark your review of the latest version pending again
    Undone { plan: String },
}
