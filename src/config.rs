use crate::backoff::Backoff;
use crate::defaults;
use crate::error::BackoffError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backoff: BackoffConfig,
    /// Process-wide overrides for zero-configured counters
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Base interval in milliseconds; 0 uses the process-wide default
    #[serde(default)]
    pub interval_ms: u64,
    /// Upper bound in milliseconds; 0 uses the process-wide default
    #[serde(default)]
    pub max_duration_ms: u64,
    /// Full jitter on or off
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub interval_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "jitter_backoff=trace"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; console only when absent
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub json: bool,
    /// Daily rotation of the log file
    #[serde(default)]
    pub rotation: bool,
}

fn default_jitter() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            interval_ms: 0,
            max_duration_ms: 0,
            jitter: default_jitter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
            rotation: false,
        }
    }
}

impl BackoffConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    /// Create a counter from these settings
    pub fn build(&self) -> Backoff {
        if self.jitter {
            Backoff::new(self.max_duration(), self.interval())
        } else {
            Backoff::without_jitter(self.max_duration(), self.interval())
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse config file")?;
        Ok(config)
    }

    /// Load configuration from file or use default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config file, using defaults: {}", e);
            Self::default()
        })
    }

    /// Check the configuration before it is used
    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.logging.level).map_err(|e| {
            BackoffError::Config(format!(
                "invalid logging level {:?}: {}",
                self.logging.level, e
            ))
        })?;

        let backoff = &self.backoff;
        if backoff.interval_ms != 0
            && backoff.max_duration_ms != 0
            && backoff.interval_ms > backoff.max_duration_ms
        {
            tracing::warn!(
                "Backoff interval {}ms exceeds max duration {}ms, every delay will be capped",
                backoff.interval_ms,
                backoff.max_duration_ms
            );
        }

        Ok(())
    }

    /// Push the `[defaults]` section into the process-wide defaults
    pub fn apply_defaults(&self) {
        if let Some(ms) = self.defaults.interval_ms {
            defaults::set_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.defaults.max_duration_ms {
            defaults::set_max_duration(Duration::from_millis(ms));
        }
    }
}
