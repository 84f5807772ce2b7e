//! Prometheus metrics and the HTTP surface of the simulated sensor.
//!
//! # Metrics Exposed
//!
//! - `sensor_requests_total` - Number of `/metrics` requests served
//! - `sensor_cpu_spike` - Simulated CPU spike state (0 or 1)
//! - `sensor_processing_latency_seconds` - Latest simulated acquisition time
//!
//! # Example
//!
//! ```no_run
//! use sensor_sim::metrics::SensorMetrics;
//!
//! let metrics = SensorMetrics::new().expect("Failed to create registry");
//!
//! metrics.publish(0.027, true);
//! metrics.record_request();
//!
//! println!("{}", metrics.encode().expect("Failed to encode"));
//! ```

mod collector;
mod server;

pub use collector::{MetricsError, SensorMetrics};
pub use server::{router, AppState, SensorServer, ServerError};
