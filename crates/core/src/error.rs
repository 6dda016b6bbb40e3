//! Error types for pdf2msgpack.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening a document or streaming its records.
///
/// Every variant is fatal for the process; `exit_code` gives the status the
/// command line tool terminates with.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load document: {0}")]
    Load(#[from] lopdf::Error),

    #[error("document has no usable page tree")]
    NoPageTree,

    #[error("text encoding not available: {0}")]
    UnknownEncoding(String),

    #[error("sandbox setup failed: {0}")]
    Sandbox(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] rmp::encode::ValueWriteError),

    #[error("array of {0} records exceeds the format limit")]
    TooManyRecords(usize),

    #[error("array declared {declared} records but {written} were written")]
    CountMismatch { declared: usize, written: usize },
}

impl ExtractError {
    /// Process exit status for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            ExtractError::Open { .. } => 5,
            ExtractError::Load(_) => 63,
            ExtractError::NoPageTree => 64,
            ExtractError::UnknownEncoding(_) => 127,
            ExtractError::Sandbox(_) => 99,
            ExtractError::Io(_) | ExtractError::Encode(_) | ExtractError::TooManyRecords(_) => 74,
            ExtractError::CountMismatch { .. } => 70,
        }
    }
}

/// Convenience Result type alias for ExtractError.
pub type Result<T> = std::result::Result<T, ExtractError>;
