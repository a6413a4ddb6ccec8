pub mod collectors;
pub mod registry;

pub use collectors::MonitorMetricsCollector;
pub use registry::MetricsRegistry;
