//! Vectorize command implementation

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::VectorizeArgs;
use crate::error::{ApiSenseError, Result};
use crate::pipeline;
use crate::vectorize::{TrainingTarget, VectorizeSummary};

use super::CommandContext;

#[derive(Debug, Serialize)]
struct VectorizeOutput {
    metrics: Vec<VectorizeSummary>,
}

/// Run the vectorize command.
///
/// Every configured metric is vectorized against its default schema. An
/// explicit `--schema` or `--train-file` names a single file, so it needs
/// exactly one `--metric`.
pub fn run_vectorize(ctx: &CommandContext, args: &VectorizeArgs) -> Result<String> {
    let config = ctx.corpus_config(&args.corpus)?;

    let single_file = args.schema.is_some() || args.train_file.is_some();
    if single_file && config.metrics.len() != 1 {
        return Err(ApiSenseError::Config {
            message: "--schema and --train-file need exactly one --metric".to_string(),
        });
    }

    let training = match (&args.train_file, args.label) {
        (Some(path), Some(label)) => Some(TrainingTarget {
            path: path.as_path(),
            label,
        }),
        (Some(_), None) => {
            return Err(ApiSenseError::Config {
                message: "--train-file needs a --label".to_string(),
            })
        }
        (None, _) => None,
    };

    let mut metrics = Vec::with_capacity(config.metrics.len());
    for &metric in &config.metrics {
        metrics.push(pipeline::run_vectorize(
            &config,
            metric,
            args.schema.as_deref(),
            training,
        )?);
    }

    ctx.render(&VectorizeOutput { metrics }, |out| {
        format_vectorize_summaries(&out.metrics)
    })
}

pub(crate) fn format_vectorize_summaries(summaries: &[VectorizeSummary]) -> String {
    let mut out = String::new();
    for summary in summaries {
        let _ = write!(
            out,
            "{:<10} {} packages x {} features  ({} without record, {} all-zero)",
            summary.metric.name(),
            summary.packages,
            summary.schema_width,
            summary.records_missing,
            summary.zero_vectors
        );
        if summary.write_failures > 0 {
            let _ = write!(out, "  {} vector files not written", summary.write_failures);
        }
        if let Some(path) = &summary.train_file {
            let _ = write!(out, "  -> {}", path.display());
        }
        out.push('\n');
    }
    out
}
