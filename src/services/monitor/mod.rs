pub mod engine;
pub mod evaluator;
pub mod state;

pub use engine::{MonitorEngine, PollerHandle};
pub use evaluator::{AlertPolicy, AlertState, Evaluation, MonitorState, Outcome};
pub use state::{ContactState, LoggingListener, MonitorHandle, MonitorSnapshot, StateListener};
