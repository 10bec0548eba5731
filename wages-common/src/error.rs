//! Common error types for the salary calculator

use thiserror::Error;

/// Common result type for salary calculator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the server and the command line tool
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed CSV syntax (wraps ::csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Invalid timesheet content: bad header, date or time
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown or undecodable character encoding
    #[error("{0}")]
    Encoding(String),
}
