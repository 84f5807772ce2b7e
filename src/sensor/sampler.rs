//! Background task simulating periodic sensor activity.
//!
//! Every tick the sampler waits a random acquisition delay, publishes the
//! measured delay as the processing latency and flips a simulated CPU spike
//! indicator. Ticks are separated by a fixed cadence.

use crate::config::SamplerConfig;
use crate::metrics::SensorMetrics;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Values published by a single sampler tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Measured acquisition time in seconds.
    pub latency: f64,
    /// Simulated CPU spike state.
    pub spike: bool,
}

/// Periodic producer of simulated sensor readings.
pub struct Sampler {
    metrics: SensorMetrics,
    config: SamplerConfig,
    rng: ChaCha8Rng,
    ticks: u64,
}

impl Sampler {
    /// Creates a sampler seeded from the OS entropy source.
    pub fn new(metrics: SensorMetrics, config: SamplerConfig) -> Self {
        Self::from_rng(metrics, config, ChaCha8Rng::from_entropy())
    }

    /// Creates a sampler with a fixed seed for reproducible runs.
    pub fn with_seed(metrics: SensorMetrics, config: SamplerConfig, seed: u64) -> Self {
        Self::from_rng(metrics, config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(metrics: SensorMetrics, config: SamplerConfig, rng: ChaCha8Rng) -> Self {
        Self {
            metrics,
            config,
            rng,
            ticks: 0,
        }
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Performs one acquisition and publishes the result.
    pub async fn tick(&mut self) -> Reading {
        let start = Instant::now();

        let delay = self
            .rng
            .gen_range(self.config.min_latency_secs..=self.config.max_latency_secs);
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;

        let reading = Reading {
            latency: start.elapsed().as_secs_f64(),
            spike: self.rng.gen_bool(0.5),
        };

        self.metrics.publish(reading.latency, reading.spike);
        self.ticks += 1;

        tracing::trace!(
            tick = self.ticks,
            latency = reading.latency,
            spike = reading.spike,
            "Sensor reading published"
        );

        reading
    }

    /// Runs ticks at the configured cadence until `shutdown` turns true
    /// or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            cadence_secs = self.config.cadence_secs,
            min_latency_secs = self.config.min_latency_secs,
            max_latency_secs = self.config.max_latency_secs,
            "Sampler started"
        );

        let cadence = self.config.cadence();
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = async {
                    self.tick().await;
                    tokio::time::sleep(cadence).await;
                } => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!(ticks = self.ticks, "Sampler stopped");
    }

    /// Spawns [`Sampler::run`] on the tokio runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler(seed: u64) -> (Sampler, SensorMetrics) {
        let metrics = SensorMetrics::new().unwrap();
        let sampler = Sampler::with_seed(metrics.clone(), SamplerConfig::default(), seed);
        (sampler, metrics)
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_latency_in_range() {
        let (mut sampler, metrics) = sampler(1);

        for _ in 0..200 {
            let reading = sampler.tick().await;
            assert!(
                (0.01 - 1e-9..=0.05 + 1e-9).contains(&reading.latency),
                "latency {} out of range",
                reading.latency
            );
            assert_eq!(metrics.processing_latency(), reading.latency);
            assert_eq!(metrics.cpu_spike(), i64::from(reading.spike));
        }
        assert_eq!(sampler.ticks(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spike_takes_both_values() {
        let (mut sampler, metrics) = sampler(2);
        let mut seen = [false; 2];

        for _ in 0..100 {
            sampler.tick().await;
            let spike = metrics.cpu_spike();
            assert!(spike == 0 || spike == 1);
            seen[spike as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_publishes_then_stops() {
        let (sampler, metrics) = sampler(3);
        let (tx, rx) = watch::channel(false);
        let handle = sampler.spawn(rx);

        assert_eq!(metrics.processing_latency(), 0.0);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let latency = metrics.processing_latency();
        assert!((0.01..=0.05).contains(&latency), "latency {latency}");

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_when_sender_dropped() {
        let (sampler, _metrics) = sampler(4);
        let (tx, rx) = watch::channel(false);
        let handle = sampler.spawn(rx);

        drop(tx);
        handle.await.unwrap();
    }
}
