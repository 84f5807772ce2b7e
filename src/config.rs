//! Service configuration.
//!
//! The simulated device runs with fixed constants. [`SensorConfig::default`]
//! reproduces them exactly; a TOML file may override individual fields for
//! local experiments.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Port the HTTP listener binds to.
pub const DEFAULT_PORT: u16 = 8000;

/// Probability that `/sensor` returns the large payload.
pub const DEFAULT_PAYLOAD_PROBABILITY: f64 = 0.2;

/// Length of the simulated large sensor payload, in characters.
pub const DEFAULT_BLOB_SIZE: usize = 5_000_000;

/// Lower bound of the simulated acquisition latency, in seconds.
pub const DEFAULT_MIN_LATENCY_SECS: f64 = 0.01;

/// Upper bound of the simulated acquisition latency, in seconds.
pub const DEFAULT_MAX_LATENCY_SECS: f64 = 0.05;

/// Pause between sampler ticks, in seconds.
pub const DEFAULT_CADENCE_SECS: f64 = 1.0;

/// Configuration for the simulated sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Probability in [0, 1] of serving the large payload.
    pub payload_probability: f64,
    /// Number of characters in the large payload.
    pub blob_size: usize,
    /// Sampler settings.
    pub sampler: SamplerConfig,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], DEFAULT_PORT).into(),
            payload_probability: DEFAULT_PAYLOAD_PROBABILITY,
            blob_size: DEFAULT_BLOB_SIZE,
            sampler: SamplerConfig::default(),
        }
    }
}

impl SensorConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.payload_probability) {
            return Err(ConfigError::InvalidProbability(self.payload_probability));
        }
        if self.blob_size == 0 {
            return Err(ConfigError::EmptyBlob);
        }
        self.sampler.validate()
    }
}

/// Timing of the background sampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Shortest simulated acquisition delay, in seconds.
    pub min_latency_secs: f64,
    /// Longest simulated acquisition delay, in seconds.
    pub max_latency_secs: f64,
    /// Sleep after each tick, in seconds.
    pub cadence_secs: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_latency_secs: DEFAULT_MIN_LATENCY_SECS,
            max_latency_secs: DEFAULT_MAX_LATENCY_SECS,
            cadence_secs: DEFAULT_CADENCE_SECS,
        }
    }
}

impl SamplerConfig {
    /// Validates the sampler timing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_latency_secs, self.max_latency_secs);
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidLatencyRange { min, max });
        }
        if !self.cadence_secs.is_finite() || self.cadence_secs <= 0.0 {
            return Err(ConfigError::InvalidCadence(self.cadence_secs));
        }
        Ok(())
    }

    /// Returns the pause between ticks.
    pub fn cadence(&self) -> Duration {
        Duration::from_secs_f64(self.cadence_secs)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("payload probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    #[error("blob size must be non-zero")]
    EmptyBlob,
    #[error("invalid latency range [{min}, {max}]")]
    InvalidLatencyRange { min: f64, max: f64 },
    #[error("invalid sampler cadence {0}s")]
    InvalidCadence(f64),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub sensor: SensorConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.sensor.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SensorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.blob_size, 5_000_000);
        assert_eq!(config.sampler.cadence(), Duration::from_secs(1));
    }

    #[test]
    fn test_probability_out_of_range() {
        let config = SensorConfig {
            payload_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_inverted_latency_range() {
        let mut config = SensorConfig::default();
        config.sampler.min_latency_secs = 0.1;
        config.sampler.max_latency_secs = 0.05;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLatencyRange { .. })
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FileConfig::from_toml(
            r#"
            [sensor]
            payload_probability = 0.5

            [sensor.sampler]
            cadence_secs = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.sensor.payload_probability, 0.5);
        assert_eq!(config.sensor.blob_size, DEFAULT_BLOB_SIZE);
        assert_eq!(config.sensor.sampler.cadence_secs, 2.0);
        assert_eq!(config.sensor.sampler.min_latency_secs, DEFAULT_MIN_LATENCY_SECS);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.sensor.bind_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            FileConfig::from_toml("[sensor\nblob_size = "),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            FileConfig::from_toml("[sensor]\nblob_size = 0"),
            Err(ConfigError::EmptyBlob)
        ));
    }
}
