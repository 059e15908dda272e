//! Language detection and tree-sitter grammar loading

use std::path::Path;
use tree_sitter::Language;

use crate::error::{ApiSenseError, Result};

/// Package source languages the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    /// PyPI packages
    Python,
    /// npm packages (plain JS, ES modules and CommonJS)
    JavaScript,
}

impl Lang {
    /// Detect language from file path extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ApiSenseError::UnsupportedLanguage {
                extension: "none".to_string(),
            })?;

        Self::from_extension(ext)
    }

    /// Detect language from file extension string
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" | "pyw" => Ok(Self::Python),
            "js" | "mjs" | "cjs" => Ok(Self::JavaScript),
            _ => Err(ApiSenseError::UnsupportedLanguage {
                extension: ext.to_string(),
            }),
        }
    }

    /// Get the canonical name of the language
    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }

    /// Get the tree-sitter Language for parsing
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Node kind of a call expression in this grammar
    pub fn call_kind(&self) -> &'static str {
        match self {
            Self::Python => "call",
            Self::JavaScript => "call_expression",
        }
    }

    /// Node kind of a member access (`a.b`) in this grammar, with the
    /// field names of its receiver and member.
    pub fn member_access(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Python => ("attribute", "object", "attribute"),
            Self::JavaScript => ("member_expression", "object", "property"),
        }
    }

    /// Keywords that look like `name(` to a lexical scan but are never calls
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &[
                "and", "as", "assert", "async", "await", "def", "del", "elif", "else",
                "except", "for", "from", "if", "import", "in", "is", "lambda", "not",
                "or", "return", "while", "with", "yield",
            ],
            Self::JavaScript => &[
                "catch", "do", "else", "for", "function", "if", "in", "of", "return",
                "switch", "typeof", "void", "while", "with", "yield",
            ],
        }
    }

    /// Get common file extensions for this language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py", "pyi", "pyw"],
            Self::JavaScript => &["js", "mjs", "cjs"],
        }
    }
}
