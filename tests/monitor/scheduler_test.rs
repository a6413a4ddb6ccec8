use std::sync::Arc;
use std::time::Duration;

use freezer_alarm::services::monitor::{AlertPolicy, MonitorEngine};

use crate::common::{invalid_payload, ScriptedSource};

// =============================================================================
// INTEGRATION TESTS - POLL LOOP
// Runs on tokio's paused clock, so sleeps complete instantly
// =============================================================================

const INTERVAL: Duration = Duration::from_secs(60);

fn engine(source: Arc<ScriptedSource>) -> MonitorEngine {
    MonitorEngine::new("Freezer", source, AlertPolicy::new(-10.0, 1, 3.0), INTERVAL)
}

fn assert_gap(earlier: tokio::time::Instant, later: tokio::time::Instant, expected: Duration) {
    let gap = later - earlier;
    assert!(
        gap >= expected && gap < expected + Duration::from_secs(1),
        "expected a gap of {:?}, got {:?}",
        expected,
        gap
    );
}

#[tokio::test(start_paused = true)]
async fn test_first_poll_immediate_then_every_interval() {
    let source = ScriptedSource::readings(&[-20.0, -19.0, -18.0]);
    let engine = engine(source.clone());
    let mut handle = engine.handle();
    let started = tokio::time::Instant::now();
    let poller = Arc::new(engine).start();

    for _ in 0..3 {
        assert!(handle.changed().await);
    }
    assert_eq!(handle.get_temperature(), -18.0);

    let calls = source.call_times();
    assert_eq!(calls.len(), 3);
    assert!(calls[0] - started < Duration::from_secs(1));
    assert_gap(calls[0], calls[1], INTERVAL);
    assert_gap(calls[1], calls[2], INTERVAL);

    poller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_interval_counts_from_cycle_completion() {
    let fetch_time = Duration::from_secs(5);
    let source = ScriptedSource::with_delay(vec![Ok(-20.0), Ok(-20.0)], fetch_time);
    let engine = engine(source.clone());
    let mut handle = engine.handle();
    let poller = Arc::new(engine).start();

    assert!(handle.changed().await);
    assert!(handle.changed().await);

    let calls = source.call_times();
    assert_gap(calls[0], calls[1], fetch_time + INTERVAL);

    poller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_bad_payload_does_not_stop_the_loop() {
    let source = ScriptedSource::new(vec![Err(invalid_payload("not json")), Ok(-5.0)]);
    let engine = engine(source.clone());
    let mut handle = engine.handle();
    let poller = Arc::new(engine).start();

    assert!(handle.changed().await);
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.consecutive_failures, 1);
    assert_eq!(snapshot.state.current_temperature, 0.0);
    assert!(!snapshot.state.alert_active());

    assert!(handle.changed().await);
    assert!(handle.get_alert_state());
    assert_eq!(handle.get_temperature(), -5.0);

    let calls = source.call_times();
    assert_gap(calls[0], calls[1], INTERVAL);

    poller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_polling() {
    let source = ScriptedSource::readings(&[-20.0, -20.0, -20.0]);
    let engine = engine(source.clone());
    let mut handle = engine.handle();
    let poller = Arc::new(engine).start();

    assert!(handle.changed().await);
    assert!(poller.is_running());
    poller.stop().await;

    tokio::time::sleep(INTERVAL * 10).await;
    assert_eq!(source.call_count(), 1);

    // The engine went away with its task.
    assert!(!handle.changed().await);
}

#[tokio::test(start_paused = true)]
async fn test_stop_waits_for_in_flight_fetch() {
    let source = ScriptedSource::with_delay(vec![Ok(-3.0)], Duration::from_secs(5));
    let engine = engine(source.clone());
    let handle = engine.handle();
    let poller = Arc::new(engine).start();

    // Let the loop enter its first fetch.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.call_count(), 1);

    poller.stop().await;
    assert_eq!(handle.get_temperature(), -3.0);
    assert_eq!(source.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_polls_run_one_after_another() {
    let fetch_time = Duration::from_secs(5);
    let source = ScriptedSource::with_delay(vec![Ok(-5.0), Ok(-4.0)], fetch_time);
    let engine = MonitorEngine::new("Freezer", source.clone(), AlertPolicy::new(-10.0, 2, 3.0), INTERVAL);

    let (first, second) = tokio::join!(engine.poll_once(), engine.poll_once());
    assert!(first.is_ok());
    assert!(second.is_ok());

    // Both readings counted towards the streak, so the second raised the alarm.
    let state = engine.state();
    assert!(state.alert_active());
    assert_eq!(state.current_temperature, -4.0);
    assert_eq!(engine.handle().snapshot().polls_completed, 2);

    let calls = source.call_times();
    assert_eq!(calls.len(), 2);
    assert_gap(calls[0], calls[1], fetch_time);
}
