use std::sync::Arc;
use std::time::Duration;

use super::MetricsRegistry;
use crate::services::monitor::evaluator::{Evaluation, MonitorState, Outcome};
use crate::services::sensor::FetchError;

pub const OUTCOME_SUCCESS: &str = "success";

/// Collector for poll-cycle and alert metrics
#[derive(Clone)]
pub struct MonitorMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl MonitorMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn record_poll_succeeded(&self, evaluation: &Evaluation, duration: Duration) {
        self.metrics
            .polls_total
            .with_label_values(&[OUTCOME_SUCCESS])
            .inc();
        self.metrics
            .poll_duration_seconds
            .observe(duration.as_secs_f64());

        self.set_state(&evaluation.state);

        match evaluation.outcome {
            Outcome::Raised => self.record_transition("raised"),
            Outcome::Cleared => self.record_transition("cleared"),
            _ => {}
        }
    }

    pub fn record_poll_failed(&self, error: &FetchError, duration: Duration) {
        self.metrics
            .polls_total
            .with_label_values(&[error.kind()])
            .inc();
        self.metrics
            .poll_duration_seconds
            .observe(duration.as_secs_f64());
    }

    pub fn set_state(&self, state: &MonitorState) {
        self.metrics.temperature_celsius.set(state.current_temperature);
        self.metrics
            .alert_active
            .set(if state.alert_active() { 1.0 } else { 0.0 });
        self.metrics
            .consecutive_over_threshold
            .set(state.consecutive_over_threshold as f64);
    }

    fn record_transition(&self, direction: &str) {
        self.metrics
            .alert_transitions_total
            .with_label_values(&[direction])
            .inc();
    }
}
