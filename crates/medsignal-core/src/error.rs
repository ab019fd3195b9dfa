//! Error types for medsignal.

use thiserror::Error;

/// A message whose text is not a usable string. This is the only error
/// assembly can produce; the batch driver contains it per message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed input in {source_id}: {reason}")]
pub struct MalformedInput {
    pub source_id: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),

    /// A pattern that failed to compile. Fatal at startup.
    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
