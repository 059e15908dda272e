//! Run command implementation

use crate::cli::RunArgs;
use crate::error::Result;
use crate::pipeline::{self, RunSummary};

use super::rank::{format_aggregate_summary, format_select_summary};
use super::scan::format_scan_summary;
use super::vectorize::format_vectorize_summaries;
use super::CommandContext;

/// Run every corpus stage in order
pub fn run_all(ctx: &CommandContext, args: &RunArgs) -> Result<String> {
    let config = ctx.corpus_config(&args.corpus)?;
    let summary = pipeline::run_all(&config, ctx.progress, args.label)?;
    ctx.render(&summary, format_run_summary)
}

fn format_run_summary(summary: &RunSummary) -> String {
    format!(
        "== scan ==\n{}\n== aggregate ==\n{}\n== select ==\n{}\n== vectorize ==\n{}\ntotal: {:.2?}\n",
        format_scan_summary(&summary.scan),
        format_aggregate_summary(&summary.aggregate),
        format_select_summary(&summary.select),
        format_vectorize_summaries(&summary.vectorize),
        summary.elapsed
    )
}
