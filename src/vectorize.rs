//! Fixed-width feature vectors against a pinned schema
//!
//! A package's vector has one slot per schema symbol, in schema order,
//! holding the package's score for that symbol or 0. Its width depends only
//! on the schema, never on what the package calls.
//!
//! For classifier training, vectors of a whole corpus are written one per
//! line, space-separated, with a constant class label as the last column.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::centrality::Metric;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::feature_schema::FeatureSchema;
use crate::fs_utils;
use crate::package::package_name;
use crate::record::Ranking;

/// One package's scores in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count of schema symbols the package actually exercises
    pub fn non_zero(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Symbol → value object, in schema order
    pub fn to_json(&self, schema: &FeatureSchema) -> Value {
        let mut map = Map::with_capacity(self.values.len());
        for (symbol, value) in schema.symbols().zip(&self.values) {
            map.insert(symbol.clone(), Value::from(*value));
        }
        Value::Object(map)
    }

    /// Space-separated values, with the label appended when given
    pub fn to_line(&self, label: Option<u8>) -> String {
        let mut line = String::new();
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{}", value);
        }
        if let Some(label) = label {
            if !line.is_empty() {
                line.push(' ');
            }
            let _ = write!(line, "{}", label);
        }
        line
    }
}

/// Encode one package record against the schema
pub fn vectorize(schema: &FeatureSchema, record: &Ranking) -> FeatureVector {
    let lookup = record.to_lookup();
    FeatureVector {
        values: schema
            .symbols()
            .map(|symbol| lookup.get(symbol.as_str()).copied().unwrap_or(0.0))
            .collect(),
    }
}

/// Where the training matrix goes and the class label of all its rows
#[derive(Debug, Clone, Copy)]
pub struct TrainingTarget<'a> {
    pub path: &'a Path,
    pub label: u8,
}

/// Summary of a corpus vectorization run
#[derive(Debug, Clone, Serialize)]
pub struct VectorizeSummary {
    pub metric: Metric,
    pub schema_width: usize,
    pub packages: usize,
    pub records_missing: usize,
    pub zero_vectors: usize,
    /// Packages whose vector file could not be written
    pub write_failures: usize,
    pub train_file: Option<PathBuf>,
    pub label: Option<u8>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Vectorize every package of a corpus for one metric.
///
/// Writes `<metric>_feature_vector.json` next to each package record and,
/// when `training` is given, the combined training matrix with its label as
/// the final column. A package without a record becomes an all-zero row. A
/// vector file that cannot be written is logged and counted; the package
/// still gets its training row.
pub fn vectorize_corpus(
    package_dirs: &[PathBuf],
    schema: &FeatureSchema,
    metric: Metric,
    config: &PipelineConfig,
    training: Option<TrainingTarget<'_>>,
) -> Result<VectorizeSummary> {
    let start = Instant::now();
    let mut lines = String::new();
    let mut missing = 0;
    let mut zero_vectors = 0;
    let mut write_failures = 0;

    for dir in package_dirs {
        let out_dir = config.package_output_dir(dir);
        let record_path = out_dir.join(metric.package_file_name());
        let record = match Ranking::load_optional(&record_path) {
            Ok(Some(record)) => record,
            Ok(None) => {
                missing += 1;
                Ranking::default()
            }
            Err(e) => {
                tracing::warn!("Treating {} as empty: {}", record_path.display(), e);
                missing += 1;
                Ranking::default()
            }
        };

        let vector = vectorize(schema, &record);
        if vector.non_zero() == 0 {
            zero_vectors += 1;
            tracing::debug!("{}: no schema symbols", package_name(dir));
        }

        let vector_path = out_dir.join(metric.vector_file_name());
        if let Err(e) = fs_utils::write_json_atomic(&vector_path, &vector.to_json(schema)) {
            tracing::warn!("Failed to write {}: {}", vector_path.display(), e);
            write_failures += 1;
        }

        if let Some(target) = training {
            lines.push_str(&vector.to_line(Some(target.label)));
            lines.push('\n');
        }
    }

    if let Some(target) = training {
        fs_utils::write_atomic(target.path, lines.as_bytes())?;
        tracing::info!(
            "Wrote {} rows x {} columns to {}",
            package_dirs.len(),
            schema.len() + 1,
            target.path.display()
        );
    }

    Ok(VectorizeSummary {
        metric,
        schema_width: schema.len(),
        packages: package_dirs.len(),
        records_missing: missing,
        zero_vectors,
        write_failures,
        train_file: training.map(|t| t.path.to_path_buf()),
        label: training.map(|t| t.label),
        elapsed: start.elapsed(),
    })
}
