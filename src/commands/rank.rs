//! Aggregate and select command implementations

use std::fmt::Write as _;

use crate::aggregate::AggregateSummary;
use crate::cli::CorpusArgs;
use crate::error::Result;
use crate::pipeline::{self, SelectSummary};

use super::CommandContext;

/// Run the aggregate command
pub fn run_aggregate(ctx: &CommandContext, args: &CorpusArgs) -> Result<String> {
    let config = ctx.corpus_config(args)?;
    let summary = pipeline::run_aggregate(&config)?;
    ctx.render(&summary, format_aggregate_summary)
}

pub(crate) fn format_aggregate_summary(summary: &AggregateSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "packages: {}", summary.packages);
    for metric in &summary.metrics {
        let _ = writeln!(
            out,
            "{:<10} {:>6} symbols  {} records, {} missing, {} malformed  -> {}",
            metric.metric.name(),
            metric.symbols,
            metric.records_found,
            metric.records_missing,
            metric.records_malformed,
            metric.output.display()
        );
    }
    let _ = writeln!(out, "elapsed: {:.2?}", summary.elapsed);
    out
}

/// Run the select command
pub fn run_select(ctx: &CommandContext, args: &CorpusArgs) -> Result<String> {
    let config = ctx.corpus_config(args)?;
    let summary = pipeline::run_select(&config)?;
    ctx.render(&summary, format_select_summary)
}

pub(crate) fn format_select_summary(summary: &SelectSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "top_k: {}", summary.top_k);
    for schema in &summary.schemas {
        let _ = writeln!(
            out,
            "{:<10} {:>6} symbols  -> {}",
            schema.metric.name(),
            schema.width,
            schema.path.display()
        );
    }
    out
}
