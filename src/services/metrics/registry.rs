use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

const NAMESPACE: &str = "freezer_alarm";

/// Central metrics registry for the alarm
pub struct MetricsRegistry {
    registry: Registry,

    // Poll Metrics
    pub polls_total: CounterVec,
    pub poll_duration_seconds: Histogram,

    // Appliance Metrics
    pub temperature_celsius: Gauge,
    pub alert_active: Gauge,
    pub consecutive_over_threshold: Gauge,
    pub alert_transitions_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        // Poll Metrics
        let polls_total = CounterVec::new(
            Opts::new("polls_total", "Poll cycles by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(polls_total.clone()))?;

        let poll_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("poll_duration_seconds", "Time spent fetching one reading")
                .namespace(NAMESPACE)
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(poll_duration_seconds.clone()))?;

        // Appliance Metrics
        let temperature_celsius = Gauge::with_opts(
            Opts::new("temperature_celsius", "Last reported appliance temperature")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(temperature_celsius.clone()))?;

        let alert_active = Gauge::with_opts(
            Opts::new("alert_active", "Whether the alert (contact open) is raised")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(alert_active.clone()))?;

        let consecutive_over_threshold = Gauge::with_opts(
            Opts::new(
                "consecutive_over_threshold",
                "Current run of readings at or above the threshold",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(consecutive_over_threshold.clone()))?;

        let alert_transitions_total = CounterVec::new(
            Opts::new("alert_transitions_total", "Alert raises and clears").namespace(NAMESPACE),
            &["direction"],
        )?;
        registry.register(Box::new(alert_transitions_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            polls_total,
            poll_duration_seconds,
            temperature_celsius,
            alert_active,
            consecutive_over_threshold,
            alert_transitions_total,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
