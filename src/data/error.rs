//! Error types for locating and reading the source dataset

use std::path::PathBuf;

use thiserror::Error;

/// Dataset loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no CSV file matching '{pattern}' found in {}", dir.display())]
    NotFound { pattern: String, dir: PathBuf },

    #[error("invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("I/O error in {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type alias for loading operations
pub type Result<T> = std::result::Result<T, LoadError>;
