//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while interpreting command-line configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown trace format '{0}' (expected JSON or CSV)")]
    UnknownFormat(String),
}

/// Errors that can occur while parsing a single trace line
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object record, found {0}")]
    NotARecord(&'static str),

    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Errors that can occur while loading a whole trace
///
/// I/O failures and parse failures are kept apart so callers can tell a
/// broken file from a broken line.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open trace file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// Errors that can occur while emitting delivered payloads
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write payload: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize payload: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
