use freezer_alarm::services::monitor::evaluator::{apply, AlertPolicy, MonitorState, Outcome};

// =============================================================================
// INTEGRATION TESTS - ALERT POLICY
// Hysteresis and consecutive-count debouncing over reading sequences
// =============================================================================

fn feed(policy: &AlertPolicy, readings: &[f64]) -> Vec<MonitorState> {
    let mut state = MonitorState::default();
    readings
        .iter()
        .map(|t| {
            state = apply(&state, *t, policy).state;
            state
        })
        .collect()
}

#[test]
fn test_freezer_walkthrough() {
    // threshold -10, hysteresis 3, one reading raises
    let policy = AlertPolicy::new(-10.0, 1, 3.0);
    let states = feed(&policy, &[-5.0, -10.0, -15.0]);

    assert!(states[0].alert_active());
    assert_eq!(states[0].current_temperature, -5.0);

    assert!(states[1].alert_active());
    assert_eq!(states[1].current_temperature, -10.0);

    assert!(!states[2].alert_active());
    assert_eq!(states[2].consecutive_over_threshold, 0);
    assert_eq!(states[2].current_temperature, -15.0);
}

#[test]
fn test_fewer_than_required_never_raise() {
    let policy = AlertPolicy::new(-10.0, 3, 3.0);
    // Pairs of warm readings separated by a cold one never reach three.
    let states = feed(&policy, &[-8.0, -7.0, -20.0, -6.0, -9.0, -30.0, -1.0]);

    assert!(states.iter().all(|s| !s.alert_active()));
    assert_eq!(
        states.iter().map(|s| s.consecutive_over_threshold).collect::<Vec<_>>(),
        vec![1, 2, 0, 1, 2, 0, 1]
    );
}

#[test]
fn test_clear_needs_full_margin() {
    let policy = AlertPolicy::new(-10.0, 1, 3.0);
    let raised = feed(&policy, &[-9.0])[0];

    for t in [-9.0, -10.0, -11.0, -12.0, -12.99] {
        let eval = apply(&raised, t, &policy);
        assert!(eval.state.alert_active(), "{t} should not clear");
        assert_eq!(eval.outcome, Outcome::Unchanged);
    }

    let eval = apply(&raised, -13.0, &policy);
    assert_eq!(eval.outcome, Outcome::Cleared);
    assert_eq!(eval.state.consecutive_over_threshold, 0);
}

#[test]
fn test_counter_zero_while_alerting() {
    let policy = AlertPolicy::new(-10.0, 2, 3.0);
    let readings: Vec<f64> = (0..200)
        .map(|i| -10.0 + ((i * 7 % 23) as f64 - 11.0))
        .collect();

    for state in feed(&policy, &readings) {
        if state.alert_active() {
            assert_eq!(state.consecutive_over_threshold, 0);
        }
        assert!(state.consecutive_over_threshold < policy.consecutive_alerts_required);
    }
}

#[test]
fn test_zero_hysteresis_clears_at_threshold() {
    let policy = AlertPolicy::new(-10.0, 1, 0.0);
    let states = feed(&policy, &[-10.0, -10.0, -10.5]);
    assert!(states[0].alert_active());
    // Already alerting, and -10 sits exactly on the clear line.
    assert!(!states[1].alert_active());
    assert!(!states[2].alert_active());
}
