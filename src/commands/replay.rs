//! Replay command implementation.
//!
//! The replay command:
//! 1. Resolves the trace format
//! 2. Loads the trace file
//! 3. Plays it back in real time
//! 4. Writes every delivered payload as a JSON line

use crate::loader::load_file;
use crate::output::write_payload;
use crate::parser::TraceFormat;
use crate::scheduler::{start, CancellationToken, PlaybackStats};
use crate::utils::config::{DEFAULT_FORMAT, SUPPORTED_FORMATS};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Arguments for the replay command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    /// Trace file to replay
    pub trace_path: PathBuf,

    /// Format name as given on the command line (`JSON` or `CSV`, any case)
    pub format: String,

    /// Print a playback summary to stderr when done
    pub print_summary: bool,
}

impl Default for ReplayArgs {
    fn default() -> Self {
        Self {
            trace_path: PathBuf::new(),
            format: DEFAULT_FORMAT.to_string(),
            print_summary: false,
        }
    }
}

/// Validate replay arguments and resolve the trace format
///
/// **Public** - called before execute_replay so bad configuration fails fast
///
/// # Errors
/// * Unknown format name
/// * Empty trace path
pub fn validate_args(args: &ReplayArgs) -> Result<TraceFormat> {
    if args.trace_path.as_os_str().is_empty() {
        anyhow::bail!("Trace file path cannot be empty");
    }

    let format = args.format.parse::<TraceFormat>().with_context(|| {
        format!("Supported formats: {}", SUPPORTED_FORMATS.join(", "))
    })?;

    Ok(format)
}

/// Execute the replay command, writing payloads to stdout
///
/// **Public** - main entry point called from main.rs
pub fn execute_replay(args: ReplayArgs) -> Result<PlaybackStats> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_replay_to(&args, &CancellationToken::new(), &mut out)
}

/// Execute the replay command against any writer
///
/// **Public** - lets tests and embedders capture output or cancel the run
///
/// # Errors
/// * Unknown format
/// * Trace file cannot be opened or read
/// * Malformed trace line
/// * Output write failure (playback is stopped)
pub fn execute_replay_to<W: Write>(
    args: &ReplayArgs,
    cancel: &CancellationToken,
    out: &mut W,
) -> Result<PlaybackStats> {
    let start_time = Instant::now();

    // Step 1: Resolve format
    let format = validate_args(args)?;
    info!("Replaying {} as {}", args.trace_path.display(), format);

    // Step 2: Load trace
    let trace = load_file(&args.trace_path, format)
        .with_context(|| format!("Failed to load trace {}", args.trace_path.display()))?;
    let trace_duration = trace.duration();

    debug!("Trace holds {} entries over {:?}", trace.len(), trace_duration);

    // Step 3 + 4: Play back and emit
    let mut playback = start(cancel, trace);
    let written = playback
        .by_ref()
        .try_for_each(|entry| write_payload(out, entry.payload()));

    // Stops the worker at once if writing failed midway.
    let stats = playback.finish();
    written.context("Failed to write payload")?;

    let elapsed = start_time.elapsed();
    if args.print_summary {
        eprint!("{}", summary_banner(args, format, &stats, trace_duration, elapsed));
    }

    info!("Replay finished in {:.3}s", elapsed.as_secs_f64());

    Ok(stats)
}

/// Render the `--summary` block
///
/// **Private** - internal helper for execute_replay_to
fn summary_banner(
    args: &ReplayArgs,
    format: TraceFormat,
    stats: &PlaybackStats,
    trace_duration: Duration,
    elapsed: Duration,
) -> String {
    let rule = "=".repeat(80);
    format!(
        "\n{rule}\nPLAYBACK SUMMARY\n{rule}\n\
         Trace:         {}\n\
         Format:        {}\n\
         State:         {}\n\
         Delivered:     {}/{}\n\
         Trace span:    {:?}\n\
         Mean lateness: {:?}\n\
         Max lateness:  {:?}\n\
         Elapsed:       {:.3}s\n\
         {rule}\n",
        args.trace_path.display(),
        format,
        stats.state,
        stats.delivered,
        stats.total,
        trace_duration,
        stats.mean_lateness(),
        stats.max_lateness,
        elapsed.as_secs_f64(),
    )
}
