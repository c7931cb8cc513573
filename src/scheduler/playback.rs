//! Real-time replay of a trace.
//!
//! [`start`] sorts the trace and hands it to a single background worker that
//! sleeps until each entry's offset from the start instant, then passes the
//! entry to the consumer over a rendezvous channel. The consumer drives the
//! returned [`Playback`] like an iterator; the iterator ends when the worker
//! has delivered everything or was cancelled.

use super::cancel::CancellationToken;
use super::stats::{PlaybackState, PlaybackStats};
use crate::parser::{Trace, TraceEntry};
use crossbeam_channel::{at, bounded, select, Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Start replaying `trace` in real time
///
/// **Public** - main entry point for playback
///
/// The trace is stable-sorted by timestamp and the start instant is taken
/// before this returns. Delivery blocks until the consumer receives each
/// entry, so a slow consumer slows the replay down rather than building a
/// backlog.
///
/// Cancelling `cancel` stops the worker at its next wait or handoff; no
/// further entries are delivered and the iterator ends.
///
/// # Example
/// ```ignore
/// let token = CancellationToken::new();
/// let mut playback = start(&token, trace);
/// for entry in &mut playback {
///     println!("{:?}", entry.payload());
/// }
/// let stats = playback.finish();
/// ```
pub fn start(cancel: &CancellationToken, mut trace: Trace) -> Playback {
    trace.sort_by_timestamp();

    let (sender, receiver) = bounded(0);
    // Never sent on; dropping `stop` with the handle wakes a waiting worker.
    let (stop, stopped) = bounded(0);
    let state = Arc::new(AtomicU8::new(PlaybackState::Running as u8));
    let start_time = Instant::now();

    info!(
        "Starting playback of {} entries spanning {:?}",
        trace.len(),
        trace.duration()
    );

    let worker = Worker {
        cancel: cancel.clone(),
        sender,
        stopped,
        state: Arc::clone(&state),
        start_time,
    };
    let handle = thread::spawn(move || worker.run(trace));

    Playback {
        receiver,
        stop,
        state,
        worker: handle,
        start_time,
    }
}

/// Consumer side of a running playback
///
/// Yields entries in non-decreasing timestamp order. Dropping it while the
/// worker is still running stops the worker, even in the middle of a wait.
#[derive(Debug)]
pub struct Playback {
    receiver: Receiver<TraceEntry>,
    stop: Sender<()>,
    state: Arc<AtomicU8>,
    worker: JoinHandle<PlaybackStats>,
    start_time: Instant,
}

impl Playback {
    /// Current lifecycle state of the worker
    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Instant that entry offsets are measured from
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Wait at most `timeout` for the next entry
    ///
    /// `Disconnected` means the playback is over.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<TraceEntry, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Stop consuming and wait for the worker to exit
    ///
    /// Entries not yet received are abandoned and the worker is told to stop
    /// right away, so this never waits out the gap to the next entry.
    pub fn finish(self) -> PlaybackStats {
        let Playback {
            receiver,
            stop,
            worker,
            ..
        } = self;
        drop(stop);
        drop(receiver);

        match worker.join() {
            Ok(stats) => stats,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

impl Iterator for Playback {
    type Item = TraceEntry;

    fn next(&mut self) -> Option<TraceEntry> {
        self.receiver.recv().ok()
    }
}

/// Background side of a playback
struct Worker {
    cancel: CancellationToken,
    sender: Sender<TraceEntry>,
    stopped: Receiver<()>,
    state: Arc<AtomicU8>,
    start_time: Instant,
}

impl Worker {
    fn run(self, trace: Trace) -> PlaybackStats {
        let mut stats = PlaybackStats::new(trace.len());
        stats.state = PlaybackState::Completed;

        for entry in trace {
            let timestamp = entry.timestamp();
            let Some(target) = self.start_time.checked_add(timestamp.as_duration()) else {
                // Beyond the monotonic clock's range: only a stop can end this.
                warn!("Entry at {} cannot be scheduled, waiting for cancellation", timestamp);
                select! {
                    recv(self.cancel.signal()) -> _ => {},
                    recv(self.stopped) -> _ => {},
                }
                stats.state = PlaybackState::Cancelled;
                break;
            };

            if !self.wait_until(target) {
                debug!("Playback cancelled while waiting for entry at {}", timestamp);
                stats.state = PlaybackState::Cancelled;
                break;
            }

            if !self.hand_off(entry) {
                debug!("Playback stopped before delivering entry at {}", timestamp);
                stats.state = PlaybackState::Cancelled;
                break;
            }

            let lateness = Instant::now().saturating_duration_since(target);
            log::trace!("Delivered entry at {} ({:?} late)", timestamp, lateness);
            stats.record_delivery(lateness);

            if self.cancel.is_cancelled() {
                debug!("Playback cancelled after entry at {}", timestamp);
                stats.state = PlaybackState::Cancelled;
                break;
            }
        }

        // The sender is dropped with `self`, closing the consumer's iterator.
        self.set_state(stats.state);
        info!("{}", stats.summary());
        stats
    }

    /// Sleep until `target`, or return false as soon as cancellation is seen
    /// or the consumer has gone away.
    fn wait_until(&self, target: Instant) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if target <= Instant::now() {
            return true;
        }

        let deadline = at(target);
        select! {
            recv(self.cancel.signal()) -> _ => false,
            recv(self.stopped) -> _ => false,
            recv(deadline) -> _ => true,
        }
    }

    /// Block until the consumer takes `entry`. False if cancelled first or
    /// the consumer is gone.
    fn hand_off(&self, entry: TraceEntry) -> bool {
        select! {
            send(self.sender, entry) -> res => res.is_ok(),
            recv(self.cancel.signal()) -> _ => false,
            recv(self.stopped) -> _ => false,
        }
    }

    fn set_state(&self, state: PlaybackState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}
