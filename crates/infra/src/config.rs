//! Ledger configuration.
//!
//! Sources, later ones override earlier ones:
//! 1. Default values in code
//! 2. Optional `config/<environment>.toml`
//! 3. Environment variables with the `WINECHAIN__` prefix (e.g.
//!    `WINECHAIN__SEED_ON_START=false`)

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings for a ledger process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Current environment (development, production, test).
    pub environment: String,

    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Load the sample products before serving the first call.
    pub seed_on_start: bool,

    /// First key handed out by the key generator.
    pub first_generated_key: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_filter: "info".to_string(),
            seed_on_start: true,
            first_generated_key: 1,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from files and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WINECHAIN__ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self::load_for(&environment)
    }

    /// Load configuration for an explicit environment name.
    pub fn load_for(environment: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = config::Config::builder()
            .set_default("environment", environment)?
            .set_default("log_filter", defaults.log_filter)?
            .set_default("seed_on_start", defaults.seed_on_start)?
            .set_default("first_generated_key", defaults.first_generated_key)?
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(
                Environment::with_prefix("WINECHAIN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let config = LedgerConfig::load_for("unit-test-no-such-file").unwrap();
        assert_eq!(config.environment, "unit-test-no-such-file");
        assert_eq!(config.log_filter, "info");
        assert!(config.seed_on_start);
        assert_eq!(config.first_generated_key, 1);
    }

    #[test]
    fn default_matches_development() {
        let config = LedgerConfig::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.first_generated_key, 1);
    }
}
