//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `verdant.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use verdant_app::services::{GrowthPolicy, PestPolicy};
use verdant_domain::health::HealthThresholds;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Periodic pass schedule.
    pub jobs: JobsConfig,
    /// Lifecycle tunables.
    pub policy: PolicyConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// How often each pass runs, in seconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Start the periodic passes at all. The HTTP triggers work either way.
    pub enabled: bool,
    pub maintenance_secs: u64,
    pub growth_secs: u64,
    pub health_secs: u64,
    pub pests_secs: u64,
    pub reminders_secs: u64,
    pub cleanup_secs: u64,
}

/// Tunables handed to the services.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Minimum UTC calendar days between two growth updates of a plant.
    pub growth_min_interval_days: i64,
    pub wilting_days: i64,
    pub dead_days: i64,
    /// Infestation chance per plant and pest pass, in `[0, 1]`.
    pub pest_probability: f64,
    pub pest_treatment_window_days: i64,
    /// Seed for the pest dice. Unset means seeded from OS entropy.
    pub pest_seed: Option<u64>,
}

impl Config {
    /// Load configuration from `verdant.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("verdant.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("VERDANT_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("VERDANT_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("VERDANT_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("VERDANT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("VERDANT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(seed) = var("VERDANT_PEST_SEED").and_then(|val| val.parse().ok()) {
            self.policy.pest_seed = Some(seed);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        let intervals = [
            ("maintenance_secs", self.jobs.maintenance_secs),
            ("growth_secs", self.jobs.growth_secs),
            ("health_secs", self.jobs.health_secs),
            ("pests_secs", self.jobs.pests_secs),
            ("reminders_secs", self.jobs.reminders_secs),
            ("cleanup_secs", self.jobs.cleanup_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::Validation(format!(
                "jobs.{name} must be non-zero"
            )));
        }
        let policy = &self.policy;
        if !(0.0..=1.0).contains(&policy.pest_probability) {
            return Err(ConfigError::Validation(format!(
                "pest probability must be within [0, 1], got {}",
                policy.pest_probability
            )));
        }
        if policy.growth_min_interval_days < 0 || policy.pest_treatment_window_days < 0 {
            return Err(ConfigError::Validation(
                "day counts must not be negative".to_string(),
            ));
        }
        if policy.wilting_days < 1 || policy.wilting_days >= policy.dead_days {
            return Err(ConfigError::Validation(format!(
                "wilting threshold ({}) must be positive and below dead threshold ({})",
                policy.wilting_days, policy.dead_days
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl PolicyConfig {
    #[must_use]
    pub fn growth(&self) -> GrowthPolicy {
        GrowthPolicy {
            min_update_interval_days: self.growth_min_interval_days,
        }
    }

    #[must_use]
    pub fn health(&self) -> HealthThresholds {
        HealthThresholds {
            wilting_days: self.wilting_days,
            dead_days: self.dead_days,
        }
    }

    #[must_use]
    pub fn pests(&self) -> PestPolicy {
        PestPolicy {
            probability: self.pest_probability,
            treatment_window_days: self.pest_treatment_window_days,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:verdant.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "verdantd=info,verdant_app=info,tower_http=debug".to_string(),
        }
    }
}

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            maintenance_secs: DAY,
            growth_secs: DAY,
            health_secs: HOUR,
            pests_secs: DAY,
            reminders_secs: DAY,
            cleanup_secs: DAY,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let growth = GrowthPolicy::default();
        let health = HealthThresholds::default();
        let pests = PestPolicy::default();
        Self {
            growth_min_interval_days: growth.min_update_interval_days,
            wilting_days: health.wilting_days,
            dead_days: health.dead_days,
            pest_probability: pests.probability,
            pest_treatment_window_days: pests.treatment_window_days,
            pest_seed: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
