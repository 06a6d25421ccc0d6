//! Command-line surface of the `semver-git` binary
//!
//! Argument parsing lives here; each subcommand is dispatched to
//! [version_cmd] or [tag_cmd], which return the process exit code.

pub mod tag_cmd;
pub mod version_cmd;

use std::fmt;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config;
use crate::domain::VersionBump;
use crate::resolver::SearchMode;
use crate::ui;

#[derive(Debug, Parser)]
#[command(
    name = "semver-git",
    version,
    about = "Inspect semantic versions and manage version tags in git repositories"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Log debug diagnostics to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one field of a semantic version
    Get { field: Field, version: String },

    /// Print the version with one field replaced
    Set {
        field: Field,
        version: String,
        value: String,
    },

    /// Print the version with major, minor or patch incremented
    Increment { part: VersionBump, version: String },

    /// Exit 0 if the comparison holds, 1 if not, 2 on invalid input
    Compare {
        op: CompareOp,
        version1: String,
        version2: String,
    },

    /// Find the version tag that applies to a commit
    FetchTag(FetchTagArgs),

    /// Create the next version tag on a commit
    CreateTag(CreateTagArgs),
}

/// Addressable parts of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Major,
    Minor,
    Patch,
    Prerelease,
    Buildmetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompareOp {
    Gt,
    Gte,
    Eq,
    Lt,
    Lte,
}

/// Writes the value name as typed on the command line
fn write_value_name<T: ValueEnum>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.to_possible_value() {
        Some(possible) => f.write_str(possible.get_name()),
        None => Ok(()),
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value_name(self, f)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value_name(self, f)
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct FetchTagArgs {
    #[arg(long, default_value = ".", help = "Path to the Git repository")]
    pub repo: String,

    #[arg(
        long,
        default_value = "HEAD",
        help = "Git reference (commit hash, branch, tag, etc.)"
    )]
    pub commit: String,

    #[arg(long, help = "Only consider tags formatted as <prefix>/v<semver>")]
    pub prefix: Option<String>,

    #[arg(long, help = "Match only if the tag commit equals the provided commit")]
    pub exact: bool,

    #[arg(long, help = "Match mode: exact, nearest or ancestor")]
    pub search: Option<SearchMode>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CreateTagArgs {
    #[arg(long, default_value = ".", help = "Path to the Git repository")]
    pub repo: String,

    #[arg(
        long,
        default_value = "HEAD",
        help = "Git reference (commit hash, branch, tag, etc.)"
    )]
    pub commit: String,

    #[arg(
        long,
        help = "Format the new tag (and the previous one searched for) as <prefix>/v<semver>"
    )]
    pub prefix: Option<String>,

    #[arg(long, help = "Match mode used to find the previous tag")]
    pub search: Option<SearchMode>,

    #[arg(long, help = "Version increment type: major, minor, or patch")]
    pub increment_type: Option<String>,

    #[arg(long, help = "Create an annotated tag")]
    pub annotated: bool,

    #[arg(long, help = "Prerelease identifier for the new version")]
    pub prerelease: Option<String>,

    #[arg(long, help = "Build metadata for the new version")]
    pub build_metadata: Option<String>,

    #[arg(long, help = "Push the new tag to the remote after creation")]
    pub push: bool,

    #[arg(long, help = "Remote to push the new tag to")]
    pub upstream: Option<String>,

    #[arg(
        long,
        help = "Create an initial version if no previous version tag is found"
    )]
    pub create_initial_version: bool,

    #[arg(long, help = "Initial version used with --create-initial-version")]
    pub initial_version: Option<String>,
}

/// Run the parsed command and return the process exit code
pub fn run(args: Args) -> ExitCode {
    match args.command {
        Command::Get { field, version } => version_cmd::run_get(field, &version),
        Command::Set {
            field,
            version,
            value,
        } => version_cmd::run_set(field, &version, &value),
        Command::Increment { part, version } => version_cmd::run_increment(part, &version),
        Command::Compare {
            op,
            version1,
            version2,
        } => version_cmd::run_compare(op, &version1, &version2),
        Command::FetchTag(tag_args) => match config::load_config(args.config.as_deref()) {
            Ok(config) => tag_cmd::fetch_tag(&tag_args, &config),
            Err(e) => config_failure(&e),
        },
        Command::CreateTag(tag_args) => match config::load_config(args.config.as_deref()) {
            Ok(config) => tag_cmd::create_tag(&tag_args, &config),
            Err(e) => config_failure(&e),
        },
    }
}

fn config_failure(err: &crate::error::SemverGitError) -> ExitCode {
    ui::print_error(&err.to_string());
    ExitCode::FAILURE
}
