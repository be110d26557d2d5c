//! Error types for gcontact-filter

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ContactError>;

/// Failures that stop a run
#[derive(Debug, Error)]
pub enum ContactError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Source bytes are not valid in the declared encoding
    #[error("{path} is not valid {encoding}")]
    Encoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// A data record does not have one cell per header
    #[error("malformed row at line {line}: expected {expected} cells, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The input has no header record
    #[error("input has no header row")]
    MissingHeader,

    /// The same header name appears twice
    #[error("duplicate header: {0}")]
    DuplicateHeader(String),

    /// A column the configuration relies on is absent
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// Both drop and merge were requested for duplicates
    #[error("--drop-duplicates and --merge-duplicates are mutually exclusive")]
    ConflictingDuplicateModes,

    /// Two rows with the same identity have different widths
    #[error("cannot merge rows of different length ({existing} vs {incoming})")]
    MergeLengthMismatch { existing: usize, incoming: usize },

    /// A tag or predicate name is not recognised
    #[error("unknown tag: {0}")]
    InvalidTag(String),
}

impl ContactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContactError::Io {
            path: path.into(),
            source,
        }
    }
}
