/*!
 * Error types for the captidy application.
 *
 * Parsing failures carry the line they were detected on so the caller can
 * report them; everything above the parser wraps them in `AppError`.
 */

use thiserror::Error;

/// Errors raised while turning raw lines into captions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The index line did not contain a usable integer once stripped
    #[error("Invalid caption index {value:?} on line {}", .line + 1)]
    InvalidIndex {
        /// Zero-based line number of the index line; shown one-based
        line: usize,
        /// The raw index line as read
        value: String,
    },

    /// A timing or content line is missing where one is required
    #[error("Malformed caption block at line {}: {reason}", .line + 1)]
    MalformedBlock {
        /// Zero-based line number where the block started
        line: usize,
        /// What was missing
        reason: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from caption parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
