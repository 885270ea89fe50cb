//! # Provider Configuration
//!
//! YAML-based configuration for the store provider and its logging, with
//! development/test/production override sections.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use backend_store_provider::config::ConfigManager;
//! use backend_store_provider::provider::StoreProvider;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration (environment auto-detected)
//! let manager = ConfigManager::load()?;
//!
//! let provider = StoreProvider::with_config(manager.config())?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::defaults;
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring store-provider.yaml
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProviderConfig {
    /// Store provider construction settings
    pub provider: ProviderSettings,

    /// Structured logging settings
    pub logging: LoggingConfig,
}

/// Settings applied when constructing a `StoreProvider`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Name of the provider's event hub
    pub hub_name: String,
    /// Shard amount of the concurrent store map, a power of two greater than 1
    pub store_map_shards: usize,
    pub initial_store_capacity: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            hub_name: defaults::HUB_NAME.to_string(),
            store_map_shards: defaults::STORE_MAP_SHARDS,
            initial_store_capacity: defaults::INITIAL_STORE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `backend_store_provider=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl ProviderConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.provider.hub_name.is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "provider.hub_name",
                "provider configuration",
            ));
        }

        let shards = self.provider.store_map_shards;
        if shards < 2 || !shards.is_power_of_two() {
            return Err(ConfigurationError::invalid_value(
                "provider.store_map_shards",
                shards.to_string(),
                "shard amount must be a power of two greater than 1",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "logging.level",
                "logging configuration",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.hub_name, "store");
        assert_eq!(config.provider.store_map_shards, 16);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_config_validation_errors() {
        let mut config = ProviderConfig::default();
        config.provider.hub_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::MissingRequiredField { .. })
        ));

        for shards in [0, 1, 6, 24] {
            let mut config = ProviderConfig::default();
            config.provider.store_map_shards = shards;
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigurationError::InvalidValue { .. })
                ),
                "shard amount {shards} should be rejected"
            );
        }

        let mut config = ProviderConfig::default();
        config.logging.level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ProviderConfig =
            serde_yaml::from_str("provider:\n  hub_name: graph\n").unwrap();
        assert_eq!(config.provider.hub_name, "graph");
        assert_eq!(config.provider.store_map_shards, 16);
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
