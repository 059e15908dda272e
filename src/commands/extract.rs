//! Extract command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::ExtractArgs;
use crate::error::{ApiSenseError, Result};
use crate::extract::{self, Strategy, Symbol};
use crate::lang::Lang;

use super::CommandContext;

#[derive(Debug, Serialize)]
struct ExtractOutput {
    file: PathBuf,
    language: &'static str,
    strategy: Strategy,
    calls: Vec<Symbol>,
}

/// Run the extract command
pub fn run_extract(ctx: &CommandContext, args: &ExtractArgs) -> Result<String> {
    if !args.file.is_file() {
        return Err(ApiSenseError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a file", args.file.display()),
        )));
    }

    let lang = Lang::from_path(&args.file)?;
    let extraction = extract::extract_file(&args.file)?;
    tracing::debug!("{}: {} via {:?}", args.file.display(), lang.name(), extraction.strategy());

    let output = ExtractOutput {
        file: args.file.clone(),
        language: lang.name(),
        strategy: extraction.strategy(),
        calls: extraction.into_symbols(),
    };

    ctx.render(&output, |out| {
        let mut text = format!(
            "file: {}\nlanguage: {}\nstrategy: {}\ncalls: {}\n",
            out.file.display(),
            out.language,
            match out.strategy {
                Strategy::Structural => "structural",
                Strategy::LexicalFallback => "lexical fallback",
            },
            out.calls.len()
        );
        for (i, call) in out.calls.iter().enumerate() {
            text.push_str(&format!("  {:>4}  {}\n", i + 1, call));
        }
        text
    })
}
