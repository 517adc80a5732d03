use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so running without a `config.toml`
/// is supported.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub network: NetworkDefaults,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects values that would make the client or the calculators misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("api.base_url must not be empty".to_string()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (name, value) in [
            ("network.hashrate_ths", self.network.hashrate_ths),
            ("network.block_reward", self.network.block_reward),
            ("network.block_time_secs", self.network.block_time_secs),
            ("network.difficulty", self.network.difficulty),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.url must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Settings for the market-data REST client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the CoinGecko v3 API.
    pub base_url: String,
    /// How long a response stays fresh in the client's cache. `0` disables caching.
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            cache_ttl_secs: 5 * 60,
            request_timeout_secs: 10,
        }
    }
}

/// Bitcoin network figures the price API does not provide.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkDefaults {
    /// Aggregate network hash rate in TH/s.
    pub hashrate_ths: f64,
    pub difficulty: f64,
    /// Block subsidy in BTC.
    pub block_reward: f64,
    /// Target block interval in seconds.
    pub block_time_secs: f64,
}

impl Default for NetworkDefaults {
    fn default() -> Self {
        Self {
            hashrate_ths: 350_000_000.0,
            difficulty: 70_000_000_000_000.0,
            block_reward: 6.25,
            block_time_secs: 600.0,
        }
    }
}

/// Where saved preferences and calculation history live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cryptocalc.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set (e.g. `"info"`, `"api_client=debug"`).
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
            file_prefix: "cryptocalc.log".to_string(),
        }
    }
}
