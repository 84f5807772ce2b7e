//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus registry holding the simulated sensor's instruments.
///
/// Cloning is cheap: every instrument is a shared handle over atomic
/// cells, so the sampler and the HTTP handlers operate on the same values.
#[derive(Clone)]
pub struct SensorMetrics {
    registry: Registry,
    requests_total: IntCounter,
    processing_latency: Gauge,
    cpu_spike: IntGauge,
}

impl SensorMetrics {
    /// Creates a new registry with all sensor metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_total =
            IntCounter::new("sensor_requests_total", "Total sensor requests")?;
        let cpu_spike = IntGauge::new("sensor_cpu_spike", "Simulated CPU spike state")?;
        let processing_latency =
            Gauge::new("sensor_processing_latency_seconds", "Processing time")?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(cpu_spike.clone()))?;
        registry.register(Box::new(processing_latency.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            processing_latency,
            cpu_spike,
        })
    }

    /// Counts one `/metrics` request.
    pub fn record_request(&self) {
        self.requests_total.inc();
    }

    /// Publishes the latest sampler reading.
    pub fn publish(&self, latency_secs: f64, spike: bool) {
        self.processing_latency.set(latency_secs);
        self.cpu_spike.set(i64::from(spike));
    }

    /// Returns the number of `/metrics` requests served.
    pub fn requests_total(&self) -> u64 {
        self.requests_total.get()
    }

    /// Returns the last published latency, in seconds.
    pub fn processing_latency(&self) -> f64 {
        self.processing_latency.get()
    }

    /// Returns the last published spike state (0 or 1).
    pub fn cpu_spike(&self) -> i64 {
        self.cpu_spike.get()
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for SensorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorMetrics")
            .field("requests_total", &self.requests_total())
            .field("processing_latency", &self.processing_latency())
            .field("cpu_spike", &self.cpu_spike())
            .finish()
    }
}
