pub mod client;
pub mod types;

pub use client::{TasmotaClient, TasmotaSensor};
pub use types::{FetchError, TemperatureSource};
