//! Error types for the sheetfix_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sheetfix_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or unreadable workbook structure
    #[error("Format error in {part}: {reason}")]
    Format { part: String, reason: String },

    /// The workbook archive could not be opened or an entry could not be read
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An output file could not be staged or moved into place
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used by the binary when reporting a failed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input workbook could not be understood
    Format,
    /// A destination could not be created or written
    Io,
    /// Configuration could not be loaded or is invalid
    Config,
}

impl Error {
    /// Build a format error for the given archive part.
    pub fn format(part: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Format {
            part: part.into(),
            reason: reason.into(),
        }
    }

    /// Build a write error for the given destination.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } | Error::Zip(_) => ErrorKind::Format,
            Error::Io(_) | Error::Write { .. } | Error::Csv(_) => ErrorKind::Io,
            Error::Json(_) | Error::Toml(_) | Error::Config(_) => ErrorKind::Config,
        }
    }
}
