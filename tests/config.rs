//! Configuration Module Tests
//!
//! Loads the shipped configuration file and builds providers from it.

use backend_store_provider::{ConfigManager, ProviderConfig, StoreProvider};
use std::path::PathBuf;

fn shipped_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config")
}

#[test]
fn shipped_config_loads_for_every_environment() {
    for environment in ["development", "test", "production"] {
        let manager =
            ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), environment)
                .expect("shipped configuration should be valid");

        assert_eq!(manager.environment(), environment);
        assert_eq!(manager.config().provider.hub_name, "store");
    }
}

#[test]
fn production_overrides_apply() {
    let manager =
        ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), "production")
            .unwrap();
    let config = manager.config();

    assert_eq!(config.provider.store_map_shards, 64);
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.json);
}

#[test]
fn provider_builds_from_loaded_config() {
    let manager =
        ConfigManager::load_from_directory_with_env(Some(shipped_config_dir()), "test").unwrap();
    let provider = StoreProvider::with_config(manager.config()).unwrap();

    assert_eq!(provider.events().name(), "store");
    assert!(!provider.is_opened());
}

#[test]
fn default_config_matches_default_provider() {
    let provider = StoreProvider::with_config(&ProviderConfig::default()).unwrap();
    assert_eq!(provider.stats(), StoreProvider::new().stats());
}
