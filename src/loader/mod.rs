//! Trace loading.
//!
//! Reads a byte stream line by line, runs every line through an
//! [`EntryParser`] and collects the results. Loading is all-or-nothing: the
//! first bad line aborts the load and nothing is returned.

use crate::parser::{EntryParser, Trace, TraceFormat};
use crate::utils::error::LoadError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a trace from any buffered reader
///
/// **Public** - main entry point for loading
///
/// Lines are split on `\n`; a trailing `\r` is dropped. A final line without
/// a newline is still parsed. Empty lines are handed to the parser as-is.
///
/// # Errors
/// * `LoadError::Io` - the underlying reader failed
/// * `LoadError::Parse` - a line was rejected by the parser (1-based line number)
pub fn load<R: BufRead>(mut source: R, parser: EntryParser) -> Result<Trace, LoadError> {
    let mut trace = Trace::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if source.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let entry = parser(trim_line_ending(&buf))
            .map_err(|err| LoadError::Parse {
                line: line_no,
                source: err,
            })?;
        trace.push(entry);
    }

    debug!("Loaded {} trace entries", trace.len());
    Ok(trace)
}

/// Open a trace file and load it with the parser for `format`
///
/// **Public** - used by the replay command
///
/// # Errors
/// * `LoadError::Open` - the file could not be opened
/// * anything [`load`] returns
pub fn load_file(path: impl AsRef<Path>, format: TraceFormat) -> Result<Trace, LoadError> {
    let path = path.as_ref();

    debug!("Opening {} trace: {}", format, path.display());
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    load(BufReader::new(file), format.parser())
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
