//! Output writers for delivered trace entries.
//!
//! Payloads are written as one compact JSON document per line.

pub mod json;

// Re-export main functions
pub use json::{payload_to_string, write_payload};
