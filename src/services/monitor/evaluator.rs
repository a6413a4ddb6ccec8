//! Hysteresis + debounce policy for the appliance alert.
//!
//! ```text
//!              t >= threshold, count reaches required
//!   Normal ─────────────────────────────────────────────► Alert
//!     ▲                                                     │
//!     └──────────── t <= threshold - hysteresis ────────────┘
//! ```
//!
//! [`apply`] is pure: it takes the previous [`MonitorState`] and returns
//! the next one together with an [`Outcome`] naming the branch that fired.

use serde::Serialize;

use crate::config::MonitorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    Normal,
    Alert,
}

impl AlertState {
    pub fn is_active(self) -> bool {
        self == AlertState::Alert
    }
}

/// Threshold policy, the part of [`MonitorConfig`] the evaluator reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    pub alert_threshold: f64,
    pub consecutive_alerts_required: u32,
    pub hysteresis_margin: f64,
}

impl AlertPolicy {
    pub fn new(alert_threshold: f64, consecutive_alerts_required: u32, hysteresis_margin: f64) -> Self {
        Self {
            alert_threshold,
            consecutive_alerts_required,
            hysteresis_margin,
        }
    }

    /// Readings at or below this clear an active alert.
    pub fn clear_below(&self) -> f64 {
        self.alert_threshold - self.hysteresis_margin
    }
}

impl From<&MonitorConfig> for AlertPolicy {
    fn from(config: &MonitorConfig) -> Self {
        Self::new(
            config.alert_threshold,
            config.consecutive_alerts_required,
            config.hysteresis_margin,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorState {
    pub current_temperature: f64,
    pub alert: AlertState,
    pub consecutive_over_threshold: u32,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            current_temperature: 0.0,
            alert: AlertState::Normal,
            consecutive_over_threshold: 0,
        }
    }
}

impl MonitorState {
    pub fn alert_active(&self) -> bool {
        self.alert.is_active()
    }
}

/// Which branch of the policy fired for a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Over threshold, streak still short of the required count.
    Accumulating { count: u32 },
    /// Streak reached the required count.
    Raised,
    /// Dropped far enough below threshold to end the alert.
    Cleared,
    /// A partial streak was broken by a normal reading.
    StreakReset,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub previous: MonitorState,
    pub state: MonitorState,
    pub outcome: Outcome,
}

impl Evaluation {
    pub fn temperature_changed(&self) -> bool {
        self.previous.current_temperature != self.state.current_temperature
    }

    pub fn alert_changed(&self) -> bool {
        self.previous.alert != self.state.alert
    }
}

/// Feed one successful reading through the policy.
pub fn apply(state: &MonitorState, temperature: f64, policy: &AlertPolicy) -> Evaluation {
    let mut next = *state;
    next.current_temperature = temperature;

    let outcome = if state.alert == AlertState::Normal && temperature >= policy.alert_threshold {
        next.consecutive_over_threshold = state.consecutive_over_threshold.saturating_add(1);
        // `>=` so that a required count of 0 raises on the first reading.
        if next.consecutive_over_threshold >= policy.consecutive_alerts_required {
            next.alert = AlertState::Alert;
            next.consecutive_over_threshold = 0;
            Outcome::Raised
        } else {
            Outcome::Accumulating {
                count: next.consecutive_over_threshold,
            }
        }
    } else if state.alert == AlertState::Alert && temperature <= policy.clear_below() {
        next.alert = AlertState::Normal;
        next.consecutive_over_threshold = 0;
        Outcome::Cleared
    } else if state.consecutive_over_threshold > 0 {
        next.consecutive_over_threshold = 0;
        Outcome::StreakReset
    } else {
        Outcome::Unchanged
    };

    Evaluation {
        previous: *state,
        state: next,
        outcome,
    }
}
