//! Simulated sensor activity and payloads.
//!
//! The [`Sampler`] stands in for a device polling its hardware: it runs on a
//! background task and publishes latency and CPU spike readings into the
//! shared [`SensorMetrics`](crate::metrics::SensorMetrics). The `/sensor`
//! endpoint answers with a [`SensorResponse`], occasionally carrying the large
//! [`DataBlob`].

mod payload;
mod sampler;

pub use payload::{DataBlob, SensorResponse};
pub use sampler::{Reading, Sampler};
