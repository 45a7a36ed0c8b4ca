//! Configuration system for seatsweep.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `seatsweep.toml` file
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `SEATSWEEP_SERVER_HOST` - Server bind address
//! - `SEATSWEEP_SERVER_PORT` - Server port
//! - `SEATSWEEP_API_BASE_URL` - Provider API base URL
//! - `SEATSWEEP_ACCOUNT_ID` - Provider account identifier
//! - `SEATSWEEP_AUTH_EMAIL` - Value of the `X-Auth-Email` header
//! - `SEATSWEEP_API_KEY` - Value of the `X-Auth-Key` header
//! - `SEATSWEEP_PER_PAGE` - Directory page size
//! - `SEATSWEEP_TIMEOUT_SECS` - Provider request timeout
//! - `SEATSWEEP_THRESHOLD_DAYS` - Days without a login before a user is inactive
//! - `SEATSWEEP_BATCH_SIZE` - Seats per bulk revocation request
//! - `SEATSWEEP_MAX_CONCURRENT_BATCHES` - Revocation requests in flight (1 = sequential)
//! - `SEATSWEEP_SCHEDULE_ENABLED` - Run the sweep on a schedule
//! - `SEATSWEEP_SCHEDULE_CRON` - Cron expression for the scheduled sweep
//! - `SEATSWEEP_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
//!
//! The loaded [`SeatsweepConfig`] is an ordinary value: pass it (or parts of
//! it) to the components that need it.

use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::errors::{SweepError, SweepResult};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeatsweepConfig {
    /// HTTP trigger configuration
    pub server: ServerConfig,
    /// Directory + seat registry provider
    pub provider: ProviderConfig,
    /// Sweep parameters
    pub sweep: SweepConfig,
    /// Scheduled trigger
    pub schedule: ScheduleConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Provider API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL, without a trailing slash
    pub api_base_url: String,
    pub account_id: String,
    pub auth_email: String,
    pub api_key: String,
    /// Directory page size
    pub per_page: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.cloudflare.com/client/v4".to_string(),
            account_id: String::new(),
            auth_email: String::new(),
            api_key: String::new(),
            per_page: 1000,
            timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sweep parameters used by both triggers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Days since the last successful login after which a user is inactive
    pub threshold_days: f64,
    /// Seats per bulk revocation request
    pub batch_size: usize,
    /// Revocation requests in flight; 1 keeps strict sequential order
    pub max_concurrent_batches: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            threshold_days: 5.0,
            batch_size: 50,
            max_concurrent_batches: 1,
        }
    }
}

/// Scheduled trigger configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first)
    pub cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // Daily at midnight
            cron: "0 0 0 * * *".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn config_error(e: ConfigError) -> SweepError {
    SweepError::Config(e.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

fn env_i64(name: &str) -> Option<i64> {
    env_parsed::<i64>(name)
}

impl SeatsweepConfig {
    /// Load configuration from `seatsweep.toml` (optional) and environment.
    pub fn load() -> SweepResult<Self> {
        Self::load_from("seatsweep")
    }

    /// Load configuration using `file` as the config file base name.
    ///
    /// The file is optional; its extension is resolved by the `config` crate.
    pub fn load_from(file: &str) -> SweepResult<Self> {
        let defaults = Self::default();

        let builder = Config::builder()
            .set_default("server.host", defaults.server.host)
            .map_err(config_error)?
            .set_default("server.port", defaults.server.port as i64)
            .map_err(config_error)?
            .set_default("provider.api_base_url", defaults.provider.api_base_url)
            .map_err(config_error)?
            .set_default("provider.per_page", defaults.provider.per_page as i64)
            .map_err(config_error)?
            .set_default("provider.timeout_secs", defaults.provider.timeout_secs as i64)
            .map_err(config_error)?
            .set_default("sweep.threshold_days", defaults.sweep.threshold_days)
            .map_err(config_error)?
            .set_default("sweep.batch_size", defaults.sweep.batch_size as i64)
            .map_err(config_error)?
            .set_default(
                "sweep.max_concurrent_batches",
                defaults.sweep.max_concurrent_batches as i64,
            )
            .map_err(config_error)?
            .set_default("schedule.enabled", defaults.schedule.enabled)
            .map_err(config_error)?
            .set_default("schedule.cron", defaults.schedule.cron)
            .map_err(config_error)?
            .set_default("logging.level", defaults.logging.level)
            .map_err(config_error)?
            // Load from seatsweep.toml (optional)
            .add_source(config::File::with_name(file).required(false))
            // Override with environment variables
            .set_override_option("server.host", env::var("SEATSWEEP_SERVER_HOST").ok())
            .map_err(config_error)?
            .set_override_option("server.port", env_i64("SEATSWEEP_SERVER_PORT"))
            .map_err(config_error)?
            .set_override_option(
                "provider.api_base_url",
                env::var("SEATSWEEP_API_BASE_URL").ok(),
            )
            .map_err(config_error)?
            .set_override_option("provider.account_id", env::var("SEATSWEEP_ACCOUNT_ID").ok())
            .map_err(config_error)?
            .set_override_option("provider.auth_email", env::var("SEATSWEEP_AUTH_EMAIL").ok())
            .map_err(config_error)?
            .set_override_option("provider.api_key", env::var("SEATSWEEP_API_KEY").ok())
            .map_err(config_error)?
            .set_override_option("provider.per_page", env_i64("SEATSWEEP_PER_PAGE"))
            .map_err(config_error)?
            .set_override_option("provider.timeout_secs", env_i64("SEATSWEEP_TIMEOUT_SECS"))
            .map_err(config_error)?
            .set_override_option(
                "sweep.threshold_days",
                env_parsed::<f64>("SEATSWEEP_THRESHOLD_DAYS"),
            )
            .map_err(config_error)?
            .set_override_option("sweep.batch_size", env_i64("SEATSWEEP_BATCH_SIZE"))
            .map_err(config_error)?
            .set_override_option(
                "sweep.max_concurrent_batches",
                env_i64("SEATSWEEP_MAX_CONCURRENT_BATCHES"),
            )
            .map_err(config_error)?
            .set_override_option(
                "schedule.enabled",
                env_parsed::<bool>("SEATSWEEP_SCHEDULE_ENABLED"),
            )
            .map_err(config_error)?
            .set_override_option("schedule.cron", env::var("SEATSWEEP_SCHEDULE_CRON").ok())
            .map_err(config_error)?
            .set_override_option("logging.level", env::var("SEATSWEEP_LOG_LEVEL").ok())
            .map_err(config_error)?;

        let settings = builder
            .build()
            .map_err(|e| SweepError::Config(format!("failed to build config: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| SweepError::Config(format!("failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SweepResult<()> {
        if self.server.port == 0 {
            return Err(SweepError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.provider.api_base_url.trim().is_empty() {
            return Err(SweepError::Config(
                "provider.api_base_url cannot be empty".to_string(),
            ));
        }
        if self.provider.per_page == 0 {
            return Err(SweepError::Config(
                "provider.per_page must be greater than 0".to_string(),
            ));
        }

        if !self.sweep.threshold_days.is_finite() || self.sweep.threshold_days < 0.0 {
            return Err(SweepError::Config(
                "sweep.threshold_days must be a non-negative number".to_string(),
            ));
        }
        if self.sweep.batch_size == 0 {
            return Err(SweepError::Config(
                "sweep.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.sweep.max_concurrent_batches == 0 {
            return Err(SweepError::Config(
                "sweep.max_concurrent_batches must be greater than 0".to_string(),
            ));
        }

        if self.schedule.enabled && self.schedule.cron.trim().is_empty() {
            return Err(SweepError::Config(
                "schedule.cron is required when schedule.enabled is true".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(SweepError::Config(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }

    /// Check that provider credentials are present.
    ///
    /// Kept separate from [`validate`](Self::validate) so tooling and tests
    /// can load a config without real credentials.
    pub fn require_credentials(&self) -> SweepResult<()> {
        for (name, value) in [
            ("provider.account_id", &self.provider.account_id),
            ("provider.auth_email", &self.provider.auth_email),
            ("provider.api_key", &self.provider.api_key),
        ] {
            if value.trim().is_empty() {
                return Err(SweepError::Config(format!("{name} is required")));
            }
        }
        Ok(())
    }
}
