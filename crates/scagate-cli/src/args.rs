use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scagate_core::gate::{ActorPermission, DiffFallback, ModeSet};
use scagate_core::issues::Category;

#[derive(Debug, Parser)]
#[command(
    name = "scagate",
    version,
    about = "Compile FOSSA CLI arguments and enforce SCA policy gates in CI"
)]
pub struct Args {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[arg(long, global = true, env = "SCAGATE_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile environment variables into scanner CLI arguments
    Compile(CompileArgs),

    /// Evaluate scan issues against the gate policy
    Gate(GateArgs),

    /// Validate a parameter catalog and print its documentation table
    Catalog(CatalogArgs),
}

#[derive(Debug, clap::Args)]
pub struct CompileArgs {
    /// Parameter catalog: a JSON file, `builtin:sca` or `builtin:container`
    #[arg(long, env = "SCAGATE_CATALOG", default_value = "builtin:sca")]
    pub catalog: String,

    /// Only include parameters accepted by this sub-command (e.g. analyze, test)
    #[arg(long)]
    pub command: Option<String>,

    /// Output format
    #[arg(long, default_value = "args")]
    pub format: CompileFormat,

    /// Treat catalog diagnostics (unknown parameter types) as fatal
    #[arg(long)]
    pub strict: bool,

    /// Append `args=` and `skip_test=` step outputs to this file
    #[arg(long)]
    pub github_output: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompileFormat {
    /// Shell-quoted argument string
    Args,
    Json,
}

#[derive(Debug, clap::Args)]
pub struct GateArgs {
    /// Scan document for the revision under evaluation
    #[arg(long)]
    pub issues: PathBuf,

    /// Scan document for the base revision (diff mode)
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Base revision identifier, used in messages when the base scan has none
    #[arg(long, env = "SCAGATE_BASE_REVISION")]
    pub base_revision: Option<String>,

    /// Issue category evaluated by this run
    #[arg(long, env = "SCAGATE_CATEGORY")]
    pub category: Category,

    /// Gate mode: BLOCK, REPORT or BLOCK,REPORT
    #[arg(long, env = "SCAGATE_MODE", default_value = "BLOCK")]
    pub mode: ModeSet,

    /// Comma-separated issue types that block; `none` disables blocking.
    /// Defaults to policy_conflict (licensing) or critical,high (vulnerability)
    #[arg(long, env = "SCAGATE_BLOCK_ON")]
    pub block_on: Option<String>,

    /// Only block on issues not present in the base revision scan
    #[arg(long, env = "SCAGATE_DIFF")]
    pub diff: bool,

    /// Behaviour when the base scan is unavailable in diff mode
    #[arg(long, env = "SCAGATE_DIFF_FALLBACK", default_value = "full")]
    pub diff_fallback: DiffFallback,

    /// Request an emergency bypass (requires admin permission and a justification)
    #[arg(long, env = "SCAGATE_BYPASS")]
    pub bypass: bool,

    /// Justification recorded in the summary when bypassing
    #[arg(long, env = "SCAGATE_BYPASS_JUSTIFICATION")]
    pub justification: Option<String>,

    /// Actor requesting the bypass
    #[arg(long, env = "SCAGATE_ACTOR")]
    pub actor: Option<String>,

    /// Repository permission of the actor, resolved by an earlier step
    #[arg(long, env = "SCAGATE_ACTOR_PERMISSION")]
    pub actor_permission: Option<ActorPermission>,

    /// Output format
    #[arg(long, default_value = "markdown")]
    pub format: GateFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Append the Markdown summary to this file
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub step_summary: Option<PathBuf>,

    /// Append verdict step outputs to this file
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum GateFormat {
    Markdown,
    Json,
}

#[derive(Debug, clap::Args)]
pub struct CatalogArgs {
    /// Parameter catalog: a JSON file, `builtin:sca` or `builtin:container`
    #[arg(long, env = "SCAGATE_CATALOG", default_value = "builtin:sca")]
    pub catalog: String,

    /// Output format
    #[arg(long, default_value = "markdown")]
    pub format: CatalogFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CatalogFormat {
    Markdown,
    Json,
}
