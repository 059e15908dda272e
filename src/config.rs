//! Pipeline configuration
//!
//! Every stage receives a [`PipelineConfig`] explicitly; there is no global
//! state. Values come from, in increasing priority:
//! 1. built-in defaults
//! 2. an optional TOML file (`--config apisense.toml`)
//! 3. command-line flags
//!
//! ```toml
//! corpus_root = "/data/pypi/benign"
//! output_root = "/data/rankings/benign"
//! top_k = 500
//! parallelism = 8
//! metrics = ["degree", "closeness", "harmonic", "katz"]
//!
//! [katz]
//! alpha = 0.01
//! max_iter = 1000
//! tolerance = 1e-6
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::centrality::{KatzParams, Metric};
use crate::error::{ApiSenseError, Result};
use crate::fs_utils;

/// Default schema size
pub const DEFAULT_TOP_K: usize = 500;

/// Directories never scanned for source files
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    ".git",
    ".tox",
    ".venv",
    "venv",
    ".eggs",
];

/// Configuration shared by all pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory containing one subdirectory per package
    pub corpus_root: PathBuf,

    /// Where artifacts are written; defaults to `corpus_root`
    pub output_root: Option<PathBuf>,

    /// Number of top-ranked symbols kept in the feature schema
    pub top_k: usize,

    /// Worker threads for per-file processing; defaults to the host's
    /// available parallelism
    pub parallelism: Option<usize>,

    /// Metrics to compute and persist
    pub metrics: Vec<Metric>,

    pub katz: KatzParams,

    /// Source file extensions to analyze
    pub extensions: Vec<String>,

    /// Directory names skipped while walking a package
    pub skip_dirs: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("."),
            output_root: None,
            top_k: DEFAULT_TOP_K,
            parallelism: None,
            metrics: Metric::ALL.to_vec(),
            katz: KatzParams::default(),
            extensions: vec!["py".to_string()],
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Config for a corpus with every other setting at its default
    pub fn for_corpus(corpus_root: impl Into<PathBuf>) -> Self {
        Self {
            corpus_root: corpus_root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ApiSenseError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| ApiSenseError::Config {
            message: format!("Failed to parse config {}: {}", path.display(), e),
        })
    }

    /// Output root, falling back to the corpus root
    pub fn output_root(&self) -> &Path {
        self.output_root.as_deref().unwrap_or(&self.corpus_root)
    }

    /// Output directory for one package's artifacts
    pub fn package_output_dir(&self, package_dir: &Path) -> PathBuf {
        match (&self.output_root, package_dir.file_name()) {
            (Some(root), Some(name)) => root.join(name),
            _ => package_dir.to_path_buf(),
        }
    }

    pub fn effective_parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn wants_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check everything that would otherwise fail halfway through a run.
    ///
    /// Also canonicalizes `corpus_root` so artifacts and logs use one
    /// spelling of the path.
    pub fn validate(&mut self) -> Result<()> {
        if !self.corpus_root.exists() {
            return Err(ApiSenseError::CorpusNotFound {
                path: self.corpus_root.display().to_string(),
            });
        }
        if !self.corpus_root.is_dir() {
            return Err(ApiSenseError::NotADirectory {
                path: self.corpus_root.display().to_string(),
            });
        }
        if let Ok(canonical) = self.corpus_root.canonicalize() {
            self.corpus_root = fs_utils::normalize_path(&canonical);
        }

        if self.top_k == 0 {
            return Err(config_error("top_k must be at least 1"));
        }
        if self.parallelism == Some(0) {
            return Err(config_error("parallelism must be at least 1"));
        }
        if self.metrics.is_empty() {
            return Err(config_error("at least one metric is required"));
        }
        if !(self.katz.alpha > 0.0 && self.katz.alpha.is_finite()) {
            return Err(config_error("katz.alpha must be a positive number"));
        }
        if self.katz.max_iter == 0 {
            return Err(config_error("katz.max_iter must be at least 1"));
        }
        if self.extensions.is_empty() {
            return Err(config_error("at least one source extension is required"));
        }

        self.metrics.sort();
        self.metrics.dedup();
        Ok(())
    }
}

fn config_error(message: &str) -> ApiSenseError {
    ApiSenseError::Config {
        message: message.to_string(),
    }
}
