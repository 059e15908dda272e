//! Error types and exit codes for apisense

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for apisense operations
#[derive(Error, Debug)]
pub enum ApiSenseError {
    #[error("Corpus root not found: {path}")]
    CorpusNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Unsupported language for extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("Failed to parse file: {message}")]
    ParseFailure { message: String },

    #[error("Malformed artifact {}: {message}", path.display())]
    ArtifactFormat { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiSenseError {
    /// Convert error to an exit code:
    /// - 0: Success
    /// - 1: Missing path / IO error
    /// - 2: Configuration error
    /// - 3: Parse failure
    /// - 4: Malformed artifact
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::CorpusNotFound { .. } => ExitCode::from(1),
            Self::NotADirectory { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
            Self::UnsupportedLanguage { .. } => ExitCode::from(2),
            Self::Config { .. } => ExitCode::from(2),
            Self::ParseFailure { .. } => ExitCode::from(3),
            Self::ArtifactFormat { .. } => ExitCode::from(4),
            Self::Json(_) => ExitCode::from(4),
        }
    }
}

/// Result type alias for apisense operations
pub type Result<T> = std::result::Result<T, ApiSenseError>;
