//! Per-package centrality records
//!
//! For one package directory:
//! 1. collect its source files
//! 2. on the worker pool, per file: extract calls, build the call graph,
//!    score it
//! 3. gather all file results, then merge them on the calling thread by
//!    summing each symbol's score per metric
//! 4. sort each metric's totals and write `<metric>_new.json`
//!
//! Summation is commutative, so the merged record does not depend on the
//! order workers finish in. A file that cannot be read is logged and
//! contributes nothing; it never aborts the package.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ahash::AHashMap;
use ignore::WalkBuilder;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;

use crate::centrality::{self, GraphScores, KatzParams, Metric};
use crate::config::PipelineConfig;
use crate::error::{ApiSenseError, Result};
use crate::extract::{self, Symbol};
use crate::graph::CallGraph;
use crate::record::Ranking;

/// Result of analyzing one source file
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// `None` when the file had no calls or could not be read
    pub scores: Option<GraphScores>,
    pub calls: usize,
    pub fallback: bool,
    pub failed: bool,
}

/// Analyze one file: extract, build graph, score.
///
/// Read errors are logged and reported as a failed outcome with no scores.
pub fn analyze_file(path: &Path, metrics: &[Metric], katz: &KatzParams) -> FileOutcome {
    let extraction = match extract::extract_file(path) {
        Ok(extraction) => extraction,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", path.display(), e);
            return FileOutcome {
                path: path.to_path_buf(),
                failed: true,
                ..FileOutcome::default()
            };
        }
    };

    let fallback = extraction.is_fallback();
    let calls = extraction.symbols().len();
    let scores = CallGraph::from_sequence(extraction.symbols())
        .map(|graph| centrality::compute(&graph, metrics, katz));

    if let Some(failure) = scores.as_ref().and_then(|s| s.katz_failure()) {
        tracing::warn!(
            "Katz omitted for {}: {}",
            path.display(),
            failure
        );
    }

    FileOutcome {
        path: path.to_path_buf(),
        scores,
        calls,
        fallback,
        failed: false,
    }
}

/// Per-metric running totals for one package
#[derive(Debug, Clone, Default)]
pub struct CentralityAccumulator {
    totals: BTreeMap<Metric, AHashMap<Symbol, f64>>,
}

impl CentralityAccumulator {
    pub fn new(metrics: &[Metric]) -> Self {
        Self {
            totals: metrics.iter().map(|m| (*m, AHashMap::new())).collect(),
        }
    }

    /// Add one graph's scores. Metrics the graph lacks (a failed Katz)
    /// add nothing for that graph.
    pub fn add(&mut self, scores: &GraphScores) {
        for metric in scores.metrics() {
            let Some(totals) = self.totals.get_mut(&metric) else {
                continue;
            };
            for (symbol, score) in scores.metric_scores(metric) {
                *totals.entry(symbol.clone()).or_insert(0.0) += score;
            }
        }
    }

    /// Sorted per-metric records
    pub fn into_records(self) -> BTreeMap<Metric, Ranking> {
        self.totals
            .into_iter()
            .map(|(metric, totals)| (metric, Ranking::from_scores(totals)))
            .collect()
    }
}

/// Statistics for one processed package
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageReport {
    pub package: String,
    pub files: usize,
    pub files_with_calls: usize,
    pub lexical_fallbacks: usize,
    pub failed_files: usize,
    pub calls: usize,
    pub katz_omissions: usize,
    pub symbols: usize,
    #[serde(skip)]
    pub elapsed: Duration,
    #[serde(skip)]
    pub records: BTreeMap<Metric, Ranking>,
}

/// Computes centrality records for packages on a fixed-size worker pool
pub struct PackageProcessor<'a> {
    config: &'a PipelineConfig,
    pool: ThreadPool,
}

impl<'a> PackageProcessor<'a> {
    pub fn new(config: &'a PipelineConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.effective_parallelism())
            .thread_name(|i| format!("apisense-worker-{}", i))
            .build()
            .map_err(|e| ApiSenseError::Config {
                message: format!("Failed to build worker pool: {}", e),
            })?;
        Ok(Self { config, pool })
    }

    /// Score every source file of a package and merge the results, without
    /// writing anything
    pub fn analyze(&self, package_dir: &Path) -> Result<PackageReport> {
        if !package_dir.is_dir() {
            return Err(ApiSenseError::NotADirectory {
                path: package_dir.display().to_string(),
            });
        }

        let start = Instant::now();
        let files = collect_source_files(package_dir, self.config);
        let metrics = &self.config.metrics;
        let katz = &self.config.katz;

        let outcomes: Vec<FileOutcome> = self.pool.install(|| {
            files
                .par_iter()
                .map(|path| analyze_file(path, metrics, katz))
                .collect()
        });

        let mut report = PackageReport {
            package: package_name(package_dir),
            files: files.len(),
            ..PackageReport::default()
        };

        let mut accumulator = CentralityAccumulator::new(metrics);
        for outcome in &outcomes {
            report.calls += outcome.calls;
            report.lexical_fallbacks += usize::from(outcome.fallback);
            report.failed_files += usize::from(outcome.failed);
            if let Some(scores) = &outcome.scores {
                report.files_with_calls += 1;
                report.katz_omissions += usize::from(scores.katz_failure().is_some());
                accumulator.add(scores);
            }
        }

        report.records = accumulator.into_records();
        report.symbols = report.records.values().map(Ranking::len).max().unwrap_or(0);
        report.elapsed = start.elapsed();

        tracing::debug!(
            "{}: {} files, {} calls, {} symbols in {:.2?}",
            report.package,
            report.files,
            report.calls,
            report.symbols,
            report.elapsed
        );

        Ok(report)
    }

    /// Analyze a package and write one `<metric>_new.json` per metric
    pub fn process(&self, package_dir: &Path) -> Result<PackageReport> {
        let report = self.analyze(package_dir)?;
        let out_dir = self.config.package_output_dir(package_dir);
        for (metric, record) in &report.records {
            record.save(&out_dir.join(metric.package_file_name()))?;
        }
        Ok(report)
    }
}

/// Package directories directly under the corpus root, sorted by name.
/// Hidden directories are skipped.
pub fn discover_packages(corpus_root: &Path) -> Result<Vec<PathBuf>> {
    let mut packages: Vec<PathBuf> = fs::read_dir(corpus_root)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !n.starts_with('.'))
                .unwrap_or(false)
        })
        .collect();
    packages.sort();
    Ok(packages)
}

/// Source files of a package in a stable order
pub fn collect_source_files(package_dir: &Path, config: &PipelineConfig) -> Vec<PathBuf> {
    let skip_dirs = config.skip_dirs.clone();
    let mut builder = WalkBuilder::new(package_dir);
    builder
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| skip_dirs.iter().any(|s| s == name))
                    .unwrap_or(false))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Walk error in {}: {}", package_dir.display(), e);
                continue;
            }
        };
        // Symlinked sources count; links to directories are not walked
        let is_source = match entry.file_type() {
            Some(t) if t.is_file() => true,
            Some(t) if t.is_symlink() => !entry.path().is_dir(),
            _ => false,
        };
        if !is_source {
            continue;
        }
        let wanted = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| config.wants_extension(ext))
            .unwrap_or(false);
        if wanted {
            files.push(entry.into_path());
        }
    }
    files
}

pub fn package_name(package_dir: &Path) -> String {
    package_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| package_dir.display().to_string())
}
