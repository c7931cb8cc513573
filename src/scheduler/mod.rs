//! Trace playback.
//!
//! This module handles:
//! - Replaying a trace in real time on a background worker
//! - Cooperative cancellation of a running playback
//! - Reporting how the playback went

pub mod cancel;
pub mod playback;
pub mod stats;

// Re-export main types
pub use cancel::CancellationToken;
pub use playback::{start, Playback};
pub use stats::{PlaybackState, PlaybackStats};
