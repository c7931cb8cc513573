use std::io::Cursor;
use std::thread;
use std::time::{Duration, Instant};
use trace_replay::loader::load;
use trace_replay::parser::{parse_csv_entry, Payload, Timestamp, Trace, TraceEntry};
use trace_replay::scheduler::{start, CancellationToken, PlaybackState};

fn entry(nanos: i64, text: &str) -> TraceEntry {
    TraceEntry::new(Timestamp::from_nanos(nanos), Payload::Text(text.to_string()))
}

fn millis(ms: i64) -> i64 {
    ms * 1_000_000
}

#[test]
fn test_csv_scenario_delivers_on_schedule() {
    let trace = load(Cursor::new("0;a\n1000000;b\n"), parse_csv_entry).unwrap();
    let token = CancellationToken::new();

    let mut playback = start(&token, trace);
    let start_time = playback.start_time();

    let first = playback.next().unwrap();
    let first_at = Instant::now();
    let second = playback.next().unwrap();
    let second_at = Instant::now();

    assert_eq!(first.payload().as_text(), Some("a"));
    assert_eq!(second.payload().as_text(), Some("b"));
    assert!(first_at >= start_time);
    assert!(second_at >= start_time + Duration::from_millis(1));
    assert!(playback.next().is_none());

    let stats = playback.finish();
    assert_eq!(stats.state, PlaybackState::Completed);
    assert_eq!(stats.delivered, 2);
}

#[test]
fn test_delivery_is_sorted_and_complete() {
    let trace: Trace = vec![
        entry(millis(6), "d"),
        entry(millis(2), "b"),
        entry(0, "a"),
        entry(millis(4), "c"),
        entry(millis(2), "b2"),
    ]
    .into();
    let total = trace.len();

    let playback = start(&CancellationToken::new(), trace);
    let delivered: Vec<TraceEntry> = playback.collect();

    assert_eq!(delivered.len(), total);
    assert!(delivered
        .windows(2)
        .all(|w| w[0].timestamp() <= w[1].timestamp()));

    let order: Vec<_> = delivered.iter().filter_map(|e| e.payload().as_text()).collect();
    assert_eq!(order, vec!["a", "b", "b2", "c", "d"]);
}

#[test]
fn test_entries_never_early() {
    let offsets = [millis(3), millis(1), millis(5), millis(8)];
    let trace: Trace = offsets.iter().map(|&ns| entry(ns, "x")).collect();

    let mut playback = start(&CancellationToken::new(), trace);
    let start_time = playback.start_time();

    for delivered in &mut playback {
        let due = start_time + delivered.timestamp().as_duration();
        assert!(Instant::now() >= due, "entry at {} came early", delivered.timestamp());
    }
    assert_eq!(playback.finish().delivered, offsets.len());
}

#[test]
fn test_tied_timestamps_keep_input_order() {
    let trace: Trace = vec![entry(0, "first"), entry(0, "second"), entry(0, "third")].into();

    let order: Vec<String> = start(&CancellationToken::new(), trace)
        .filter_map(|e| e.payload().as_text().map(str::to_string))
        .collect();

    assert_eq!(order, vec!["first", "second", "third"]);
}

#[test]
fn test_negative_offsets_delivered_first() {
    let trace: Trace = vec![entry(millis(1), "later"), entry(-millis(50), "early")].into();

    let order: Vec<String> = start(&CancellationToken::new(), trace)
        .filter_map(|e| e.payload().as_text().map(str::to_string))
        .collect();

    assert_eq!(order, vec!["early", "later"]);
}

#[test]
fn test_empty_trace_closes_immediately() {
    let mut playback = start(&CancellationToken::new(), Trace::new());
    assert!(playback.next().is_none());

    let stats = playback.finish();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.state, PlaybackState::Completed);
}

#[test]
fn test_cancel_before_first_sleep_completes() {
    let trace: Trace = vec![entry(millis(10_000), "a"), entry(millis(20_000), "b")].into();
    let token = CancellationToken::new();

    let mut playback = start(&token, trace);
    thread::sleep(Duration::from_millis(20));
    let cancelled_at = Instant::now();
    token.cancel();

    assert!(playback.next().is_none());
    // Interruptible sleep: no waiting out the 10s offset.
    assert!(cancelled_at.elapsed() < Duration::from_secs(5));

    let stats = playback.finish();
    assert_eq!(stats.delivered, 0);
    assert_eq!(stats.state, PlaybackState::Cancelled);
}

#[test]
fn test_cancel_before_start_delivers_nothing() {
    let token = CancellationToken::new();
    token.cancel();

    let trace: Trace = vec![entry(0, "a"), entry(0, "b")].into();
    let delivered: Vec<_> = start(&token, trace).collect();

    assert!(delivered.is_empty());
}

#[test]
fn test_cancel_mid_playback() {
    let trace: Trace = vec![entry(0, "a"), entry(0, "b"), entry(millis(10_000), "c")].into();
    let token = CancellationToken::new();

    let mut playback = start(&token, trace);
    assert_eq!(playback.next().unwrap().payload().as_text(), Some("a"));
    assert_eq!(playback.next().unwrap().payload().as_text(), Some("b"));

    token.cancel();
    assert!(playback.next().is_none());

    let stats = playback.finish();
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.state, PlaybackState::Cancelled);
}

#[test]
fn test_cancel_unblocks_stalled_handoff() {
    let trace: Trace = vec![entry(0, "a"), entry(0, "b")].into();
    let token = CancellationToken::new();

    // Nobody receives, so the worker sits in the handoff until cancelled.
    let playback = start(&token, trace);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(playback.state(), PlaybackState::Running);

    token.cancel();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !playback.state().is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(playback.state(), PlaybackState::Cancelled);
    assert_eq!(playback.finish().delivered, 0);
}

#[test]
fn test_finish_early_stops_worker() {
    let trace: Trace = (0..5).map(|i| entry(millis(i), "x")).collect();

    let mut playback = start(&CancellationToken::new(), trace);
    assert!(playback.next().is_some());

    let stats = playback.finish();
    assert_eq!(stats.state, PlaybackState::Cancelled);
    assert!(stats.delivered < stats.total);
}

#[test]
fn test_slow_consumer_applies_backpressure() {
    let trace: Trace = vec![entry(0, "a"), entry(0, "b")].into();

    let mut playback = start(&CancellationToken::new(), trace);
    assert!(playback.next().is_some());

    // Worker cannot run ahead: the second entry waits for us.
    thread::sleep(Duration::from_millis(30));
    assert_eq!(playback.state(), PlaybackState::Running);
    assert!(playback.next().is_some());

    let stats = playback.finish();
    assert_eq!(stats.state, PlaybackState::Completed);
    assert!(stats.max_lateness >= Duration::from_millis(30));
}

#[test]
fn test_recv_timeout_reports_disconnect() {
    let mut playback = start(&CancellationToken::new(), vec![entry(0, "a")].into());

    assert!(playback.recv_timeout(Duration::from_secs(5)).is_ok());
    assert_eq!(
        playback.recv_timeout(Duration::from_secs(5)),
        Err(crossbeam_channel::RecvTimeoutError::Disconnected)
    );
    assert!(playback.next().is_none());
}

#[test]
fn test_finish_interrupts_pending_wait() {
    let trace: Trace = vec![entry(0, "a"), entry(millis(3_000), "b")].into();

    let mut playback = start(&CancellationToken::new(), trace);
    assert_eq!(playback.next().unwrap().payload().as_text(), Some("a"));

    let began = Instant::now();
    let stats = playback.finish();

    assert!(began.elapsed() < Duration::from_secs(1));
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.state, PlaybackState::Cancelled);
}

#[test]
fn test_state_is_running_once_started() {
    let trace: Trace = vec![entry(millis(10_000), "a")].into();
    let token = CancellationToken::new();

    let playback = start(&token, trace);
    assert_eq!(playback.state(), PlaybackState::Running);

    token.cancel();
    assert_eq!(playback.finish().state, PlaybackState::Cancelled);
}
