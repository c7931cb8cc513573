//! Line parsers for the supported trace formats.
//!
//! Both parsers are plain functions over the raw bytes of one line. They hold
//! no state and never panic; malformed input always comes back as a
//! [`ParseError`].

use super::schema::{Payload, Timestamp, TraceEntry};
use crate::utils::config::CSV_DELIMITER;
use crate::utils::error::{ConfigError, ParseError};
use std::fmt;

/// Converts one raw line into a trace entry
pub type EntryParser = fn(&[u8]) -> Result<TraceEntry, ParseError>;

/// Supported trace file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceFormat {
    /// One JSON record per line: `{"timestamp": <ns>, "payload": <any>}`
    #[default]
    Json,
    /// One `<ns>;<text>` record per line
    Csv,
}

impl TraceFormat {
    /// Parser function for this format
    pub fn parser(self) -> EntryParser {
        match self {
            TraceFormat::Json => parse_json_entry,
            TraceFormat::Csv => parse_csv_entry,
        }
    }
}

impl std::str::FromStr for TraceFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "JSON" => Ok(Self::Json),
            "CSV" => Ok(Self::Csv),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for TraceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceFormat::Json => f.write_str("JSON"),
            TraceFormat::Csv => f.write_str("CSV"),
        }
    }
}

/// Parse a structured (JSON) trace line
///
/// **Public** - the `JSON` format parser
///
/// The `timestamp` field is required and must be an integer number of
/// nanoseconds. `payload` may hold any JSON value and defaults to none.
///
/// # Errors
/// * `ParseError::Json` - malformed JSON, missing or non-integer timestamp
/// * `ParseError::NotARecord` - valid JSON that is not an object
pub fn parse_json_entry(line: &[u8]) -> Result<TraceEntry, ParseError> {
    let value: serde_json::Value = serde_json::from_slice(line)?;

    // Derived struct deserializers also accept arrays; only objects are records.
    if !value.is_object() {
        return Err(ParseError::NotARecord(json_kind(&value)));
    }

    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Parse a delimited (CSV) trace line
///
/// **Public** - the `CSV` format parser
///
/// The line is split on the first `;`. Everything after it is kept verbatim,
/// including further delimiters. Payload bytes that are not UTF-8 are
/// replaced with U+FFFD rather than rejected.
///
/// # Errors
/// * `ParseError::InvalidTimestamp` - first field is not a signed 64-bit integer
pub fn parse_csv_entry(line: &[u8]) -> Result<TraceEntry, ParseError> {
    let (ts_bytes, payload) = match line.iter().position(|&b| b == CSV_DELIMITER) {
        Some(pos) => (
            &line[..pos],
            Payload::Text(String::from_utf8_lossy(&line[pos + 1..]).into_owned()),
        ),
        None => (line, Payload::None),
    };

    let ts_field = String::from_utf8_lossy(ts_bytes);
    let nanos = ts_field
        .parse::<i64>()
        .map_err(|source| ParseError::InvalidTimestamp {
            value: ts_field.to_string(),
            source,
        })?;

    Ok(TraceEntry::new(Timestamp::from_nanos(nanos), payload))
}
