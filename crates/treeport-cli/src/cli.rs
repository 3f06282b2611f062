//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "treeport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the project tree as a zip archive
    Download(DownloadArgs),
    /// Upload the project tree to a GitHub repository
    Publish(PublishArgs),
    /// List the files an export would include
    List(ListArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Project tree selection shared by every subcommand that walks a tree.
#[derive(clap::Args)]
pub struct SourceArgs {
    /// Directory mounted as the project tree root
    #[arg(value_name = "SOURCE_DIR", default_value = ".")]
    pub source: PathBuf,

    /// Additional exclusion substring (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "SUBSTRING")]
    pub exclude: Vec<String>,

    /// Do not apply the built-in exclusions (node_modules, .git, dist, ...)
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Prefix stripped from archive keys and repository paths
    #[arg(long, value_name = "PREFIX")]
    pub project_root: Option<String>,
}

#[derive(clap::Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory the archive is saved into (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Archive file name
    #[arg(long, value_name = "NAME", default_value = "project.zip")]
    pub name: String,

    /// Compression level (0 stores, 1-9 deflates)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Overwrite the archive if it already exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct PublishArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository owner
    #[arg(long, env = "REPO_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "REPO_NAME")]
    pub repo: Option<String>,

    /// Branch to initialize and write to
    #[arg(long, env = "REPO_BRANCH")]
    pub branch: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Message of the empty commit created on an uninitialized repository
    #[arg(long, value_name = "MESSAGE")]
    pub initial_commit_message: Option<String>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show the archive key next to each path
    #[arg(short, long)]
    pub long: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
