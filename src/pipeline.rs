//! Corpus-level stages and the end-to-end run
//!
//! Each stage takes a validated [`PipelineConfig`] and returns a serializable
//! summary. Stages communicate only through the artifacts they write, so any
//! of them can be rerun on its own:
//!
//! | stage       | reads                                 | writes                                   |
//! |-------------|---------------------------------------|------------------------------------------|
//! | `scan`      | package sources                       | `<pkg>/<metric>_new.json`                |
//! | `aggregate` | `<pkg>/<metric>_new.json`             | `<metric>_final_new.json`                |
//! | `select`    | `<metric>_final_new.json`             | `output_top_<K>_<metric>_centrality.json`|
//! | `vectorize` | schema + `<pkg>/<metric>_new.json`    | `<pkg>/<metric>_feature_vector.json`     |
//!
//! Packages are processed one after another; the files of each package are
//! scored on the worker pool. A package that fails is logged and skipped.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::aggregate::{self, AggregateSummary};
use crate::centrality::Metric;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::feature_schema::FeatureSchema;
use crate::package::{self, PackageProcessor, PackageReport};
use crate::record::Ranking;
use crate::vectorize::{self, TrainingTarget, VectorizeSummary};

/// Log interval for scans without a progress bar
const LOG_EVERY: usize = 100;

/// Totals over a corpus scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub corpus: PathBuf,
    pub packages: usize,
    pub processed: usize,
    pub skipped: usize,
    pub files: usize,
    pub files_with_calls: usize,
    pub lexical_fallbacks: usize,
    pub failed_files: usize,
    pub calls: usize,
    pub symbols: usize,
    pub katz_omissions: usize,
    pub reports: Vec<PackageReport>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ScanSummary {
    fn add(&mut self, report: PackageReport) {
        self.processed += 1;
        self.files += report.files;
        self.files_with_calls += report.files_with_calls;
        self.lexical_fallbacks += report.lexical_fallbacks;
        self.failed_files += report.failed_files;
        self.calls += report.calls;
        self.symbols += report.symbols;
        self.katz_omissions += report.katz_omissions;
        self.reports.push(report);
    }
}

/// One written schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaOutput {
    pub metric: Metric,
    pub width: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectSummary {
    pub top_k: usize,
    pub schemas: Vec<SchemaOutput>,
}

/// Everything an end-to-end run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scan: ScanSummary,
    pub aggregate: AggregateSummary,
    pub select: SelectSummary,
    pub vectorize: Vec<VectorizeSummary>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Compute and write the per-package records of every package in the corpus
pub fn run_scan(config: &PipelineConfig, progress: bool) -> Result<ScanSummary> {
    let start = Instant::now();
    let packages = package::discover_packages(&config.corpus_root)?;
    let processor = PackageProcessor::new(config)?;

    tracing::info!(
        "Scanning {} packages in {} with {} workers",
        packages.len(),
        config.corpus_root.display(),
        config.effective_parallelism()
    );

    let bar = progress.then(|| progress_bar(packages.len() as u64));
    let mut summary = ScanSummary {
        corpus: config.corpus_root.clone(),
        packages: packages.len(),
        ..ScanSummary::default()
    };

    for (i, dir) in packages.iter().enumerate() {
        if let Some(bar) = &bar {
            bar.set_message(package::package_name(dir));
        }

        match processor.process(dir) {
            Ok(report) => summary.add(report),
            Err(e) => {
                tracing::warn!("Skipping package {}: {}", dir.display(), e);
                summary.skipped += 1;
            }
        }

        match &bar {
            Some(bar) => bar.inc(1),
            None if (i + 1) % LOG_EVERY == 0 => {
                tracing::info!("{}/{} packages", i + 1, packages.len());
            }
            None => {}
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    summary.elapsed = start.elapsed();
    tracing::info!(
        "Scan: {} packages ({} skipped), {} files ({} lexical fallback, {} unreadable), {} calls, {} Katz omissions in {:.2?}",
        summary.processed,
        summary.skipped,
        summary.files,
        summary.lexical_fallbacks,
        summary.failed_files,
        summary.calls,
        summary.katz_omissions,
        summary.elapsed
    );
    Ok(summary)
}

/// Average the package records into corpus rankings
pub fn run_aggregate(config: &PipelineConfig) -> Result<AggregateSummary> {
    let packages = package::discover_packages(&config.corpus_root)?;
    let summary = aggregate::aggregate_corpus(&packages, config)?;
    tracing::info!(
        "Aggregate: {} metrics over {} packages in {:.2?}",
        summary.metrics.len(),
        summary.packages,
        summary.elapsed
    );
    Ok(summary)
}

/// Write the top-K schema of every configured metric from its corpus ranking
pub fn run_select(config: &PipelineConfig) -> Result<SelectSummary> {
    let output_root = config.output_root();
    let mut schemas = Vec::with_capacity(config.metrics.len());

    for &metric in &config.metrics {
        let ranking = Ranking::load(&output_root.join(metric.corpus_file_name()))?;
        let schema = FeatureSchema::select(&ranking, config.top_k);
        let path = FeatureSchema::default_path(output_root, config.top_k, metric);
        schema.save(&path)?;

        if schema.len() < config.top_k {
            tracing::warn!(
                "{}: corpus has only {} symbols, schema is narrower than {}",
                metric,
                schema.len(),
                config.top_k
            );
        }
        tracing::info!("Select: {} schema of {} symbols at {}", metric, schema.len(), path.display());

        schemas.push(SchemaOutput {
            metric,
            width: schema.len(),
            path,
        });
    }

    Ok(SelectSummary {
        top_k: config.top_k,
        schemas,
    })
}

/// Encode every package against a pinned schema.
///
/// `schema_path` defaults to the schema `select` writes for `metric` at the
/// output root. A missing schema is fatal; a missing package record is not.
pub fn run_vectorize(
    config: &PipelineConfig,
    metric: Metric,
    schema_path: Option<&Path>,
    training: Option<TrainingTarget<'_>>,
) -> Result<VectorizeSummary> {
    let schema_path = schema_path.map(Path::to_path_buf).unwrap_or_else(|| {
        FeatureSchema::default_path(config.output_root(), config.top_k, metric)
    });
    let schema = FeatureSchema::load(&schema_path)?;
    let packages = package::discover_packages(&config.corpus_root)?;

    let summary =
        vectorize::vectorize_corpus(&packages, &schema, metric, config, training)?;
    tracing::info!(
        "Vectorize: {} packages x {} features ({} without a record, {} all-zero, {} unwritten) in {:.2?}",
        summary.packages,
        summary.schema_width,
        summary.records_missing,
        summary.zero_vectors,
        summary.write_failures,
        summary.elapsed
    );
    Ok(summary)
}

/// Training file written by an end-to-end run for one metric
pub fn training_file_name(metric: Metric) -> String {
    format!("{}_training.txt", metric.name())
}

/// Scan, aggregate, select and vectorize one corpus.
///
/// With a `label`, a training file per metric is written at the output root.
pub fn run_all(config: &PipelineConfig, progress: bool, label: Option<u8>) -> Result<RunSummary> {
    let start = Instant::now();
    let scan = run_scan(config, progress)?;
    let aggregate = run_aggregate(config)?;
    let select = run_select(config)?;

    let mut vectors = Vec::with_capacity(select.schemas.len());
    for schema in &select.schemas {
        let train_file = config.output_root().join(training_file_name(schema.metric));
        let training = label.map(|label| TrainingTarget {
            path: &train_file,
            label,
        });
        vectors.push(run_vectorize(config, schema.metric, Some(&schema.path), training)?);
    }

    let elapsed = start.elapsed();
    tracing::info!("Run finished in {:.2?}", elapsed);
    Ok(RunSummary {
        scan,
        aggregate,
        select,
        vectorize: vectors,
        elapsed,
    })
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
