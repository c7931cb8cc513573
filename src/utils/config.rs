//! Configuration and constants for the CLI.

/// Separator between timestamp and payload in CSV traces
pub const CSV_DELIMITER: u8 = b';';

/// Format assumed when `--format` is not given
pub const DEFAULT_FORMAT: &str = "JSON";

/// Accepted `--format` values (matched case-insensitively)
pub const SUPPORTED_FORMATS: &[&str] = &["JSON", "CSV"];
