//! Call-target extraction from package source files
//!
//! Every source file is reduced to an ordered [`CallSequence`]: the names of
//! the functions and methods it invokes, in the order they appear in the text.
//!
//! Extraction first tries a structural parse with tree-sitter. When the file
//! does not parse cleanly (Python 2 syntax, truncated files, template
//! placeholders) the lexical scanner takes over and reports every
//! `identifier(` token instead. Either way the caller gets a sequence back;
//! only a failure to *read* the file is reported as an error.
//!
//! # Example
//!
//! ```
//! use apisense::extract::{extract_symbols, Extraction};
//! use apisense::Lang;
//!
//! let extraction = extract_symbols("import os\nos.system(cmd)\n", Lang::Python);
//! assert!(matches!(extraction, Extraction::Structural(_)));
//! assert_eq!(extraction.symbols(), ["os.system"]);
//! ```

pub mod lexical;
pub mod structural;

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::lang::Lang;

/// A called API: bare function name or `receiver.method`
pub type Symbol = String;

/// Call targets of one file, in the order their names appear in the text
pub type CallSequence = Vec<Symbol>;

/// Outcome of extracting calls from one file, tagged by the strategy that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The file parsed without errors; names are qualified where possible
    Structural(CallSequence),
    /// The parse failed and the lexical scanner was used instead
    LexicalFallback(CallSequence),
}

/// Which extraction strategy produced a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Structural,
    LexicalFallback,
}

impl Extraction {
    pub fn symbols(&self) -> &[Symbol] {
        match self {
            Self::Structural(seq) | Self::LexicalFallback(seq) => seq,
        }
    }

    pub fn into_symbols(self) -> CallSequence {
        match self {
            Self::Structural(seq) | Self::LexicalFallback(seq) => seq,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Structural(_) => Strategy::Structural,
            Self::LexicalFallback(_) => Strategy::LexicalFallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::LexicalFallback(_))
    }
}

/// Extract call targets from source text, falling back to the lexical
/// scanner when the structural parse fails. Never fails.
pub fn extract_symbols(source: &str, lang: Lang) -> Extraction {
    match structural::extract_calls(source, lang) {
        Ok(seq) => Extraction::Structural(seq),
        Err(e) => {
            tracing::debug!("structural parse failed ({}), using lexical scan", e);
            Extraction::LexicalFallback(lexical::scan_calls(source, lang))
        }
    }
}

/// Read a file and extract its call targets.
///
/// Invalid UTF-8 is replaced rather than rejected. The language is taken
/// from the file extension.
///
/// # Errors
///
/// Returns an error if the extension is not a supported language or the
/// file cannot be read.
pub fn extract_file(path: &Path) -> Result<Extraction> {
    let lang = Lang::from_path(path)?;
    let bytes = fs::read(path)?;
    let source = String::from_utf8_lossy(&bytes);
    Ok(extract_symbols(&source, lang))
}
