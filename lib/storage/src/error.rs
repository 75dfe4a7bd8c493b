use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

/// Anything that stops the catalog or the similarity matrix from loading.
/// All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("missing column '{column}' (available: {available:?})")]
    MissingColumn { column: String, available: Vec<String> },

    #[error("invalid price '{value}' at line {line}")]
    InvalidPrice { line: u64, value: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("bincode error: {0}")]
    Bincode(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("cannot infer matrix format from {0}")]
    UnknownFormat(PathBuf),

    #[error(transparent)]
    Core(#[from] simrec_core::Error),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io { path: path.into(), source }
    }
}
