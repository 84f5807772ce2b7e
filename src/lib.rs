//! Simulated Sensor Device Library
//!
//! A stand-in for a networked sensor: it fabricates readings instead of
//! polling hardware, and reports on its own simulated activity through
//! Prometheus metrics.
//!
//! # Architecture
//!
//! ```text
//! Sampler (background task) ──publish──▶ SensorMetrics ◀──read── GET /metrics
//!                                                       GET /sensor ──▶ DataBlob
//! ```
//!
//! The sampler and the HTTP handlers share one [`SensorMetrics`] handle whose
//! instruments are atomic cells. The large payload is allocated once and
//! shared read-only.
//!
//! # Example
//!
//! ```no_run
//! use sensor_sim::{
//!     config::SensorConfig,
//!     metrics::{AppState, SensorMetrics, SensorServer},
//!     sensor::{DataBlob, Sampler},
//! };
//! use tokio::sync::watch;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SensorConfig::default();
//! let metrics = SensorMetrics::new()?;
//! let blob = DataBlob::new(config.blob_size);
//! let (_stop, shutdown) = watch::channel(false);
//!
//! Sampler::new(metrics.clone(), config.sampler.clone()).spawn(shutdown.clone());
//!
//! let state = AppState::new(metrics, blob, config.payload_probability);
//! SensorServer::bind(config.bind_addr, state).await?.run(shutdown).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod sensor;

// Re-export commonly used types at crate root
pub use config::{FileConfig, SamplerConfig, SensorConfig};
pub use metrics::{AppState, SensorMetrics, SensorServer};
pub use sensor::{DataBlob, Sampler, SensorResponse};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
