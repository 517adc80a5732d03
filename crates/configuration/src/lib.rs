use crate::error::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{ApiConfig, Config, DatabaseConfig, LoggingConfig, NetworkDefaults};

/// Prefix of environment overrides, e.g. `CRYPTOCALC__API__CACHE_TTL_SECS=60`.
pub const ENV_PREFIX: &str = "CRYPTOCALC";

/// Loads the application configuration.
///
/// Reads `config.toml` from the working directory when present, then applies
/// `CRYPTOCALC__SECTION__KEY` environment overrides on top of it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(env_source());
    finish(builder)
}

/// Loads the configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(env_source());
    finish(builder)
}

/// Parses a configuration from TOML text, without environment overrides.
pub fn config_from_toml(contents: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder().add_source(File::from_str(contents, FileFormat::Toml));
    finish(builder)
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    tracing::debug!(api = %config.api.base_url, database = %config.database.url, "Configuration loaded.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = config_from_toml("").unwrap();
        assert_eq!(config.api.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.api.cache_ttl().as_secs(), 300);
        assert_eq!(config.network.hashrate_ths, 350_000_000.0);
        assert_eq!(config.network.block_reward, 6.25);
        assert_eq!(config.network.block_time_secs, 600.0);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn sections_override_defaults_field_by_field() {
        let config = config_from_toml(
            r#"
            [api]
            cache_ttl_secs = 60

            [network]
            block_reward = 3.125

            [database]
            url = "sqlite::memory:"

            [logging]
            level = "debug"
            directory = "logs"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.cache_ttl_secs, 60);
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.network.block_reward, 3.125);
        assert_eq!(config.network.block_time_secs, 600.0);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory.as_deref(), Some(Path::new("logs")));
    }

    #[test]
    fn invalid_network_values_fail_validation() {
        let err = config_from_toml("[network]\nblock_time_secs = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("block_time_secs")));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        assert!(config_from_toml("[api]\nrequest_timeout_secs = 0\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
