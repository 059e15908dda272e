//! Corpus-wide ranking from per-package records
//!
//! The corpus score of a symbol is its summed package score divided by the
//! number of packages in the corpus, not by the number of packages that call
//! it. A package without the symbol, or without the metric file at all,
//! contributes 0. APIs used moderately everywhere therefore outrank APIs that
//! dominate a handful of packages.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use serde::Serialize;

use crate::centrality::Metric;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::extract::Symbol;
use crate::record::Ranking;

/// Mean score per symbol over `package_count` packages.
///
/// `records` holds the records that exist; packages missing from it still
/// count toward the denominator.
pub fn mean_ranking<'r, I>(records: I, package_count: usize) -> Ranking
where
    I: IntoIterator<Item = &'r Ranking>,
{
    let mut sums: AHashMap<Symbol, f64> = AHashMap::new();
    for record in records {
        for (symbol, score) in record.entries() {
            *sums.entry(symbol.clone()).or_insert(0.0) += score;
        }
    }

    if package_count == 0 {
        return Ranking::default();
    }
    let denominator = package_count as f64;
    Ranking::from_scores(sums.into_iter().map(|(s, total)| (s, total / denominator)))
}

/// Counts for one aggregated metric
#[derive(Debug, Clone, Serialize)]
pub struct MetricAggregate {
    pub metric: Metric,
    pub packages: usize,
    pub records_found: usize,
    pub records_missing: usize,
    pub records_malformed: usize,
    pub symbols: usize,
    pub output: PathBuf,
    #[serde(skip)]
    pub ranking: Ranking,
}

/// Summary of an aggregation run
#[derive(Debug, Clone, Serialize)]
pub struct AggregateSummary {
    pub packages: usize,
    pub metrics: Vec<MetricAggregate>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Aggregate one metric across `package_dirs` (reading each package's
/// record from its output directory). Missing or malformed records count as
/// all-zero packages.
pub fn aggregate_metric(
    package_dirs: &[PathBuf],
    metric: Metric,
    config: &PipelineConfig,
) -> MetricAggregate {
    let mut records = Vec::with_capacity(package_dirs.len());
    let mut missing = 0;
    let mut malformed = 0;

    for dir in package_dirs {
        let path = config
            .package_output_dir(dir)
            .join(metric.package_file_name());
        match Ranking::load_optional(&path) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => missing += 1,
            Err(e) => {
                tracing::warn!("Treating {} as empty: {}", path.display(), e);
                malformed += 1;
            }
        }
    }

    let ranking = mean_ranking(&records, package_dirs.len());
    MetricAggregate {
        metric,
        packages: package_dirs.len(),
        records_found: records.len(),
        records_missing: missing,
        records_malformed: malformed,
        symbols: ranking.len(),
        output: config.output_root().join(metric.corpus_file_name()),
        ranking,
    }
}

/// Aggregate every configured metric and write `<metric>_final_new.json`
/// at the output root.
pub fn aggregate_corpus(
    package_dirs: &[PathBuf],
    config: &PipelineConfig,
) -> Result<AggregateSummary> {
    let start = Instant::now();
    let mut metrics = Vec::with_capacity(config.metrics.len());

    for &metric in &config.metrics {
        let aggregate = aggregate_metric(package_dirs, metric, config);
        aggregate.ranking.save(&aggregate.output)?;
        tracing::info!(
            "{}: {} symbols from {}/{} package records ({} missing, {})",
            metric,
            aggregate.symbols,
            aggregate.records_found,
            aggregate.packages,
            aggregate.records_missing,
            aggregate.output.display()
        );
        metrics.push(aggregate);
    }

    Ok(AggregateSummary {
        packages: package_dirs.len(),
        metrics,
        elapsed: start.elapsed(),
    })
}
