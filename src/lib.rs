//! Trace Replay
//!
//! Replays a recorded sequence of timestamped entries at the offsets
//! recorded in the trace, to reproduce realistic inter-arrival timing
//! against a downstream system.
//!
//! This crate provides the core implementation for the `tracer` CLI tool:
//!
//! - [`parser`] turns JSON or CSV lines into trace entries
//! - [`loader`] reads a whole trace, failing on the first bad line
//! - [`scheduler`] plays a trace back in real time with cancellation
//! - [`output`] writes delivered payloads as JSON lines
//!
//! ## Getting Started
//!
//! ```bash
//! tracer --format csv trace.csv
//! ```

pub mod commands;
pub mod loader;
pub mod output;
pub mod parser;
pub mod scheduler;
pub mod utils;
