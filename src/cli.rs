//! CLI argument definitions using clap with subcommand architecture
//!
//! Global flags apply to every subcommand and override values from the
//! optional `--config` file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::centrality::Metric;

/// Rank API calls across a package corpus by call-graph centrality
#[derive(Parser, Debug)]
#[command(name = "apisense")]
#[command(about = "Call-graph centrality features for package corpora")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", global = true, env = "APISENSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Worker threads for per-file processing (default: all cores)
    #[arg(short = 'j', long, value_name = "N", global = true)]
    pub parallelism: Option<usize>,

    /// Number of symbols kept in the feature schema
    #[arg(short = 'k', long, value_name = "K", global = true)]
    pub top_k: Option<usize>,

    /// Metric to compute (can be repeated; default: all)
    #[arg(short, long = "metric", value_enum, global = true)]
    pub metrics: Vec<Metric>,

    /// Output format for summaries
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show a progress bar during corpus scans
    #[arg(long, global = true)]
    pub progress: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the call sequence extracted from one source file
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Compute centrality records for one package directory
    #[command(visible_alias = "p")]
    Package(PackageArgs),

    /// Compute centrality records for every package in a corpus
    #[command(visible_alias = "s")]
    Scan(CorpusArgs),

    /// Average package records into corpus rankings
    Aggregate(CorpusArgs),

    /// Write the top-K feature schema of each corpus ranking
    Select(CorpusArgs),

    /// Encode every package against a feature schema
    #[command(visible_alias = "v")]
    Vectorize(VectorizeArgs),

    /// Scan, aggregate, select and vectorize in one go
    Run(RunArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the package command
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Package directory
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Root to write records under; they go to `<DIR>/<package-name>/`
    /// (default: into the package directory itself)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Compute without writing records
    #[arg(long)]
    pub dry_run: bool,
}

/// Corpus location shared by the corpus-level commands
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Directory with one subdirectory per package
    #[arg(value_name = "CORPUS")]
    pub corpus: Option<PathBuf>,

    /// Root for written artifacts (default: the corpus root)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments for the vectorize command
#[derive(Args, Debug)]
pub struct VectorizeArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Pinned schema file (default: the schema `select` wrote for the metric)
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Combined training file to write (needs `--label`)
    #[arg(long, value_name = "FILE", requires = "label")]
    pub train_file: Option<PathBuf>,

    /// Class label appended to every training row (e.g. 1 malicious, 0 benign)
    #[arg(long, value_name = "LABEL", requires = "train_file")]
    pub label: Option<u8>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Class label; when given, `<metric>_training.txt` is written per metric
    #[arg(long, value_name = "LABEL")]
    pub label: Option<u8>,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    #[value(alias = "pretty")]
    Text,
    /// JSON - standard JSON output for machine parsing
    Json,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
