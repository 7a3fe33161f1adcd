//! Application configuration, read from a TOML file.
//!
//! Every key is optional; missing keys fall back to the defaults below.
//!
//! ```toml
//! [submission]
//! latency_ms = 1000
//! success_window_ms = 3000
//! eco_points = 25
//! all_bills_probability = 0.5
//!
//! [logging]
//! level = "info"
//! file = "water-bill.log"
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("all_bills_probability must be between 0 and 1, got {0}")]
    InvalidProbability(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionConfig {
    /// Simulated network latency before the bill counts as recorded.
    pub latency_ms: u64,
    /// How long the success state stays up before the screen resets.
    pub success_window_ms: u64,
    pub eco_points: u32,
    /// Chance that the simulated backend reports every bill type as entered.
    pub all_bills_probability: f64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            success_window_ms: 3000,
            eco_points: 25,
            all_bills_probability: 0.5,
        }
    }
}

impl SubmissionConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn success_window(&self) -> Duration {
        Duration::from_millis(self.success_window_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub submission: SubmissionConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let p = self.submission.all_bills_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidProbability(p));
        }
        Ok(())
    }
}
