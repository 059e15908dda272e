//! Package and scan command implementations

use std::fmt::Write as _;

use crate::cli::{CorpusArgs, PackageArgs};
use crate::error::{ApiSenseError, Result};
use crate::package::{PackageProcessor, PackageReport};
use crate::pipeline::{self, ScanSummary};

use super::CommandContext;

/// Symbols listed per metric in the text report
const PREVIEW: usize = 10;

/// Run the package command
pub fn run_package(ctx: &CommandContext, args: &PackageArgs) -> Result<String> {
    if !args.dir.is_dir() {
        return Err(ApiSenseError::NotADirectory {
            path: args.dir.display().to_string(),
        });
    }

    // The package is its own root; with --output, records land in
    // `<output>/<package-name>/` like any package of a scanned corpus
    let config = ctx.pipeline_config(Some(&args.dir), args.output.as_deref())?;
    let processor = PackageProcessor::new(&config)?;
    let report = if args.dry_run {
        processor.analyze(&config.corpus_root)?
    } else {
        processor.process(&config.corpus_root)?
    };

    ctx.render(&report, format_package_report)
}

fn format_package_report(report: &PackageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "package: {}", report.package);
    let _ = writeln!(
        out,
        "files: {} ({} with calls, {} lexical fallback, {} unreadable)",
        report.files, report.files_with_calls, report.lexical_fallbacks, report.failed_files
    );
    let _ = writeln!(out, "calls: {}", report.calls);
    let _ = writeln!(out, "symbols: {}", report.symbols);
    if report.katz_omissions > 0 {
        let _ = writeln!(out, "katz omitted: {} graphs", report.katz_omissions);
    }
    let _ = writeln!(out, "elapsed: {:.2?}", report.elapsed);

    for (metric, record) in &report.records {
        if record.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}:", metric);
        for (i, (symbol, score)) in record.entries().iter().take(PREVIEW).enumerate() {
            let _ = writeln!(out, "  {:>3}. {:<40} {:.4}", i + 1, symbol, score);
        }
    }
    out
}

/// Run the scan command
pub fn run_scan(ctx: &CommandContext, args: &CorpusArgs) -> Result<String> {
    let config = ctx.corpus_config(args)?;
    let summary = pipeline::run_scan(&config, ctx.progress)?;
    ctx.render(&summary, format_scan_summary)
}

pub(crate) fn format_scan_summary(summary: &ScanSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "corpus: {}", summary.corpus.display());
    let _ = writeln!(
        out,
        "packages: {} processed, {} skipped",
        summary.processed, summary.skipped
    );
    let _ = writeln!(
        out,
        "files: {} ({} lexical fallback, {} unreadable)",
        summary.files, summary.lexical_fallbacks, summary.failed_files
    );
    let _ = writeln!(out, "calls: {}", summary.calls);
    let _ = writeln!(out, "katz omitted: {} graphs", summary.katz_omissions);
    let _ = writeln!(out, "elapsed: {:.2?}", summary.elapsed);
    out
}
