//! Playback outcome and timing statistics.

use std::fmt;
use std::time::Duration;

/// Lifecycle of a playback
///
/// `NotStarted -> Running -> {Completed, Cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlaybackState {
    NotStarted = 0,
    Running = 1,
    /// Every entry was handed to the consumer
    Completed = 2,
    /// Stopped early by the cancellation token or a departed consumer
    Cancelled = 3,
}

impl PlaybackState {
    pub fn is_finished(self) -> bool {
        matches!(self, PlaybackState::Completed | PlaybackState::Cancelled)
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => PlaybackState::NotStarted,
            1 => PlaybackState::Running,
            2 => PlaybackState::Completed,
            _ => PlaybackState::Cancelled,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::NotStarted => "not started",
            PlaybackState::Running => "running",
            PlaybackState::Completed => "completed",
            PlaybackState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Statistics collected by the playback worker
///
/// **Public** - returned from `Playback::finish`
///
/// Lateness is how long after its scheduled instant an entry was actually
/// handed to the consumer. It includes time spent waiting for a slow consumer.
#[derive(Debug, Clone)]
pub struct PlaybackStats {
    /// Entries in the trace
    pub total: usize,

    /// Entries handed to the consumer
    pub delivered: usize,

    /// Largest lateness over all delivered entries
    pub max_lateness: Duration,

    /// Sum of lateness over all delivered entries
    pub total_lateness: Duration,

    /// Final state of the playback
    pub state: PlaybackState,
}

impl PlaybackStats {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            delivered: 0,
            max_lateness: Duration::ZERO,
            total_lateness: Duration::ZERO,
            state: PlaybackState::Running,
        }
    }

    pub(crate) fn record_delivery(&mut self, lateness: Duration) {
        self.delivered += 1;
        self.max_lateness = self.max_lateness.max(lateness);
        self.total_lateness += lateness;
    }

    /// Mean lateness per delivered entry
    pub fn mean_lateness(&self) -> Duration {
        match u32::try_from(self.delivered) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_lateness / n,
            Err(_) => self.total_lateness.div_f64(self.delivered as f64),
        }
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the `--summary` flag
    pub fn summary(&self) -> String {
        format!(
            "Playback {} | Delivered: {}/{} | Mean lateness: {:?} | Max lateness: {:?}",
            self.state,
            self.delivered,
            self.total,
            self.mean_lateness(),
            self.max_lateness
        )
    }
}
