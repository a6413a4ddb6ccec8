use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::MonitorConfig;
use crate::services::metrics::MonitorMetricsCollector;
use crate::services::sensor::{FetchError, TemperatureSource};

use super::evaluator::{self, AlertPolicy, Evaluation, MonitorState, Outcome};
use super::state::{MonitorHandle, MonitorSnapshot, StateListener};

/// Polls one sensor, runs each reading through the alert policy and
/// publishes the result.
pub struct MonitorEngine {
    name: String,
    source: Arc<dyn TemperatureSource>,
    policy: AlertPolicy,
    interval: Duration,
    snapshot: watch::Sender<MonitorSnapshot>,
    listeners: Vec<Arc<dyn StateListener>>,
    metrics: Option<MonitorMetricsCollector>,
    cycle: Mutex<()>,
}

impl MonitorEngine {
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn TemperatureSource>,
        policy: AlertPolicy,
        interval: Duration,
    ) -> Self {
        let (snapshot, _) = watch::channel(MonitorSnapshot::default());
        Self {
            name: name.into(),
            source,
            policy,
            interval,
            snapshot,
            listeners: Vec::new(),
            metrics: None,
            cycle: Mutex::new(()),
        }
    }

    pub fn from_config(config: &MonitorConfig, source: Arc<dyn TemperatureSource>) -> Self {
        Self::new(
            config.device_name.clone(),
            source,
            AlertPolicy::from(config),
            config.poll_interval(),
        )
    }

    pub fn with_listener(mut self, listener: Arc<dyn StateListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_metrics(mut self, metrics: MonitorMetricsCollector) -> Self {
        metrics.set_state(&self.snapshot.borrow().state);
        self.metrics = Some(metrics);
        self
    }

    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle::new(self.snapshot.subscribe())
    }

    pub fn state(&self) -> MonitorState {
        self.snapshot.borrow().state
    }

    /// Run one fetch-and-evaluate cycle.
    ///
    /// A failed fetch leaves the alert state untouched; only the failure
    /// bookkeeping in the snapshot moves. Cycles never overlap: a call made
    /// while another is in flight waits for it to finish.
    pub async fn poll_once(&self) -> Result<Evaluation, FetchError> {
        let _cycle = self.cycle.lock().await;
        let started = Instant::now();
        let result = self.source.fetch().await;
        let elapsed = started.elapsed();

        match result {
            Ok(temperature) => {
                let current = self.state();
                let evaluation = evaluator::apply(&current, temperature, &self.policy);
                self.log_outcome(&evaluation, temperature);

                self.snapshot.send_modify(|snapshot| {
                    snapshot.state = evaluation.state;
                    snapshot.last_success_at = Some(Utc::now());
                    snapshot.last_error = None;
                    snapshot.consecutive_failures = 0;
                    snapshot.polls_completed += 1;
                });

                if let Some(metrics) = &self.metrics {
                    metrics.record_poll_succeeded(&evaluation, elapsed);
                }
                self.notify(&evaluation);

                Ok(evaluation)
            }
            Err(e) => {
                match &e {
                    FetchError::Transport(msg) => tracing::warn!(
                        device = %self.name,
                        kind = e.kind(),
                        "{}: did not receive a valid response from device: {}",
                        self.name,
                        msg
                    ),
                    _ => tracing::warn!(device = %self.name, kind = e.kind(), "{}", e),
                }

                self.snapshot.send_modify(|snapshot| {
                    snapshot.last_error = Some(e.to_string());
                    snapshot.consecutive_failures = snapshot.consecutive_failures.saturating_add(1);
                    snapshot.polls_completed += 1;
                });

                if let Some(metrics) = &self.metrics {
                    metrics.record_poll_failed(&e, elapsed);
                }

                Err(e)
            }
        }
    }

    /// Spawn the polling loop.
    ///
    /// The first cycle runs immediately; each following one starts
    /// `interval` after the previous cycle finished.
    pub fn start(self: Arc<Self>) -> PollerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let engine = self;

        let task = tokio::spawn(async move {
            tracing::info!(
                device = %engine.name,
                source = %engine.source.describe(),
                interval_secs = engine.interval.as_secs(),
                "Starting appliance monitor"
            );

            loop {
                // Failures are logged and recorded inside poll_once.
                let _ = engine.poll_once().await;

                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = tokio::time::sleep(engine.interval) => {}
                }
            }

            tracing::info!(device = %engine.name, "Appliance monitor stopped");
        });

        PollerHandle {
            stop: Some(stop_tx),
            task,
        }
    }

    fn log_outcome(&self, evaluation: &Evaluation, temperature: f64) {
        match evaluation.outcome {
            Outcome::Accumulating { count } => tracing::warn!(
                device = %self.name,
                temperature,
                count,
                required = self.policy.consecutive_alerts_required,
                "Alert threshold {}°C exceeded",
                self.policy.alert_threshold
            ),
            Outcome::Raised => tracing::warn!(
                device = %self.name,
                temperature,
                "Alert threshold {}°C exceeded and alert count reached; raising alarm",
                self.policy.alert_threshold
            ),
            Outcome::Cleared => tracing::info!(
                device = %self.name,
                temperature,
                "Previous alert condition cleared (at or below {}°C)",
                self.policy.clear_below()
            ),
            Outcome::StreakReset => tracing::debug!(
                device = %self.name,
                temperature,
                "Temperature within normal range, clearing alert count"
            ),
            Outcome::Unchanged => tracing::debug!(device = %self.name, temperature, "No state change"),
        }
    }

    fn notify(&self, evaluation: &Evaluation) {
        let temperature_changed = evaluation.temperature_changed();
        let alert_changed = evaluation.alert_changed();

        for listener in &self.listeners {
            if temperature_changed {
                listener.on_temperature_changed(evaluation.state.current_temperature);
            }
            if alert_changed {
                listener.on_alert_state_changed(evaluation.state.alert_active());
            }
        }
    }
}

/// Owner of a running poll loop.
///
/// Dropping the handle without calling [`stop`](Self::stop) also ends the
/// loop after the current cycle.
pub struct PollerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Halt the loop and wait for it to exit.
    ///
    /// An in-flight fetch is allowed to finish; it is bounded by the
    /// client's request timeout.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Poll loop ended abnormally");
        }
    }
}
