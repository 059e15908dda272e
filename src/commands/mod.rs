//! Command modules for the apisense CLI
//!
//! Each module implements one or two top-level commands:
//! - `extract` - call sequence of a single file
//! - `scan` - per-package centrality records (`package`, `scan`)
//! - `rank` - corpus rankings and feature schemas (`aggregate`, `select`)
//! - `vectorize` - fixed-width feature vectors and training files
//! - `run` - every corpus stage end to end
//!
//! All command handlers take their `Args` struct from `cli.rs` and a shared
//! `CommandContext` carrying the global flags, and return the text to print.

pub mod extract;
pub mod rank;
pub mod run;
pub mod scan;
pub mod vectorize;

pub use extract::run_extract;
pub use rank::{run_aggregate, run_select};
pub use run::run_all;
pub use scan::{run_package, run_scan};
pub use vectorize::run_vectorize;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::centrality::Metric;
use crate::cli::{Cli, CorpusArgs, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::Result;

/// Shared context passed to all command handlers
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Output format (text or json)
    pub format: OutputFormat,
    /// Show verbose output
    pub verbose: bool,
    /// Show progress during long operations
    pub progress: bool,
    pub config_file: Option<PathBuf>,
    pub parallelism: Option<usize>,
    pub top_k: Option<usize>,
    pub metrics: Vec<Metric>,
}

impl CommandContext {
    /// Create a new CommandContext from CLI args
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            verbose: cli.verbose,
            progress: cli.progress,
            config_file: cli.config.clone(),
            parallelism: cli.parallelism,
            top_k: cli.top_k,
            metrics: cli.metrics.clone(),
        }
    }

    /// Build and validate the pipeline configuration: config file first,
    /// then the command's paths, then the global flags.
    pub fn pipeline_config(&self, corpus: Option<&Path>, output: Option<&Path>) -> Result<PipelineConfig> {
        let mut config = match &self.config_file {
            Some(path) => PipelineConfig::load_from(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(corpus) = corpus {
            config.corpus_root = corpus.to_path_buf();
        }
        if let Some(output) = output {
            config.output_root = Some(output.to_path_buf());
        }
        if let Some(parallelism) = self.parallelism {
            config.parallelism = Some(parallelism);
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if !self.metrics.is_empty() {
            config.metrics = self.metrics.clone();
        }

        config.validate()?;
        tracing::debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Configuration for a corpus-level command
    pub fn corpus_config(&self, args: &CorpusArgs) -> Result<PipelineConfig> {
        self.pipeline_config(args.corpus.as_deref(), args.output.as_deref())
    }

    /// Render a summary in the requested format
    pub fn render<T, F>(&self, value: &T, text: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        match self.format {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
            OutputFormat::Text => Ok(text(value)),
        }
    }
}
