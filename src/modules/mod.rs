pub mod accessory;
pub mod metrics;
