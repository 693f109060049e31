use romcheck_dat::DatError;
use thiserror::Error;

/// Errors that stop a single file from being validated.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// I/O error while reading the file or settings
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog error that could not be degraded to an empty collection
    #[error(transparent)]
    Dat(#[from] DatError),

    /// The settings file could not be parsed or written
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl ValidateError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// An unrecoverable error for one file of a batch. Sibling files are
/// still processed.
#[derive(Debug, Error)]
#[error("{filename}: {source}")]
pub struct FileError {
    pub filename: String,
    #[source]
    pub source: ValidateError,
}

impl FileError {
    pub fn new(filename: impl Into<String>, source: ValidateError) -> Self {
        Self {
            filename: filename.into(),
            source,
        }
    }
}
