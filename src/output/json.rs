//! JSON payload output writer.
//!
//! Each delivered entry becomes one line of compact JSON holding only its
//! payload.

use crate::parser::schema::Payload;
use crate::utils::error::OutputError;
use std::io::Write;

/// Write one payload as a single JSON line and flush
///
/// **Public** - main entry point for payload output
///
/// Flushing after every line keeps the output timing aligned with the
/// replay when the writer is buffered or piped.
///
/// # Errors
/// * `OutputError::SerializationFailed` - payload could not be encoded
/// * `OutputError::WriteFailed` - I/O error on the writer
pub fn write_payload<W: Write>(writer: &mut W, payload: &Payload) -> Result<(), OutputError> {
    serde_json::to_writer(&mut *writer, payload)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Render a payload as compact JSON
///
/// **Public** - useful for tests and debugging
pub fn payload_to_string(payload: &Payload) -> Result<String, OutputError> {
    serde_json::to_string(payload).map_err(OutputError::SerializationFailed)
}
