use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use super::evaluator::MonitorState;

/// Failed polls in a row before the published reading counts as stale.
pub const STALE_AFTER_FAILURES: u32 = 3;

/// Door/window contact semantics for the alert flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactState {
    Closed,
    Open,
}

impl ContactState {
    pub fn from_alert(alert_active: bool) -> Self {
        if alert_active {
            ContactState::Open
        } else {
            ContactState::Closed
        }
    }

    /// 0 = contact detected (closed), 1 = not detected (open).
    pub fn value(self) -> u8 {
        match self {
            ContactState::Closed => 0,
            ContactState::Open => 1,
        }
    }
}

/// What readers see: the evaluator state plus poll bookkeeping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorSnapshot {
    pub state: MonitorState,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub polls_completed: u64,
}

impl MonitorSnapshot {
    pub fn is_stale(&self) -> bool {
        self.consecutive_failures >= STALE_AFTER_FAILURES
    }
}

/// Receives pushes after a poll changed something.
pub trait StateListener: Send + Sync {
    fn on_temperature_changed(&self, _temperature: f64) {}

    fn on_alert_state_changed(&self, _alert_active: bool) {}
}

/// Listener that only traces the updates.
pub struct LoggingListener {
    name: String,
}

impl LoggingListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StateListener for LoggingListener {
    fn on_temperature_changed(&self, temperature: f64) {
        tracing::debug!(device = %self.name, temperature, "Current temperature updated");
    }

    fn on_alert_state_changed(&self, alert_active: bool) {
        tracing::info!(
            device = %self.name,
            contact = ?ContactState::from_alert(alert_active),
            "Contact state (alert flag) updated"
        );
    }
}

/// Cheap, cloneable read side of the monitor.
#[derive(Clone)]
pub struct MonitorHandle {
    rx: watch::Receiver<MonitorSnapshot>,
}

impl MonitorHandle {
    pub fn new(rx: watch::Receiver<MonitorSnapshot>) -> Self {
        Self { rx }
    }

    pub fn get_temperature(&self) -> f64 {
        self.rx.borrow().state.current_temperature
    }

    pub fn get_alert_state(&self) -> bool {
        self.rx.borrow().state.alert_active()
    }

    pub fn contact_state(&self) -> ContactState {
        ContactState::from_alert(self.get_alert_state())
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next published poll result.
    ///
    /// Returns `false` once the engine has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
