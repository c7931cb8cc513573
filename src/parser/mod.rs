//! Trace data model and line parsers.
//!
//! This module handles:
//! - Defining trace entries, payloads and traces
//! - Parsing JSON and CSV trace lines
//! - Selecting a parser from a format name

pub mod entry;
pub mod schema;

// Re-export main types
pub use entry::{parse_csv_entry, parse_json_entry, EntryParser, TraceFormat};
pub use schema::{Payload, Timestamp, Trace, TraceEntry};
