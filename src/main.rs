//! Trace replay CLI
//!
//! Prints the payloads of a recorded trace to stdout, one JSON line per
//! entry, at the offsets recorded in the trace.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use trace_replay::commands::{execute_replay, ReplayArgs};
use trace_replay::utils::config::DEFAULT_FORMAT;

/// Replay a timestamped trace in real time
#[derive(Parser, Debug)]
#[command(name = "tracer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Trace file to replay
    trace_file: PathBuf,

    /// Trace file format (JSON or CSV, case-insensitive)
    #[arg(long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// Print a playback summary to stderr when done
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging (stderr, so stdout carries only payloads)
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = ReplayArgs {
        trace_path: cli.trace_file,
        format: cli.format,
        print_summary: cli.summary,
    };

    execute_replay(args)?;

    Ok(())
}
