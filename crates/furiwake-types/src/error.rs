//! Error types for furiwake

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[allow(dead_code)]
    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Board move errors
///
/// A failed move leaves the chart untouched. Callers treat these as a
/// no-op signal, never as a fatal condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("Seat not found: {0}")]
    SeatNotFound(String),

    #[error("Lot not found: {0}")]
    LotNotFound(String),

    #[error("Operation not allowed in current board mode")]
    WrongMode,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Move error: {0}")]
    Move(#[from] MoveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV loader error: {0}")]
    CsvLoader(String),
}

pub type Result<T> = std::result::Result<T, Error>;
