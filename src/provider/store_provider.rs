//! # Store Provider Registry
//!
//! Lifecycle registry for a named collection of backend stores.
//!
//! ## Overview
//!
//! A `StoreProvider` starts unopened. `open` names it and installs a fresh,
//! empty store table; external wiring then registers stores into that
//! table. `init` and `clear` fan out to every registered store and announce
//! success on the provider's event hub. `close` only announces the
//! transition: name and stores stay in place until the next `open`, so the
//! provider can still be inspected after closing and a second `close`
//! succeeds again.
//!
//! ## Concurrency
//!
//! The opened state (name + table) is swapped as one value under a
//! `parking_lot::RwLock`. Lifecycle calls take a snapshot of the current
//! table and release the lock before calling into stores or listeners, so
//! a listener may call back into the provider. An `init` racing an `open`
//! sees either the old or the new table; ordering the two is up to the
//! caller.
//!
//! ## Usage
//!
//! ```rust
//! use backend_store_provider::error::BackendError;
//! use backend_store_provider::events::listener_fn;
//! use backend_store_provider::provider::{BackendStore, StoreProvider};
//! use std::sync::Arc;
//!
//! struct NullStore;
//!
//! impl BackendStore for NullStore {
//!     fn store_name(&self) -> &str { "null" }
//!     fn init(&self) -> Result<(), BackendError> { Ok(()) }
//!     fn clear(&self) -> Result<(), BackendError> { Ok(()) }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = StoreProvider::new();
//! provider.listen(listener_fn(|event| {
//!     println!("store event: {}", event.topic());
//!     Ok(())
//! }));
//!
//! provider.open("hugegraph")?;
//! provider.register_store("graph", Arc::new(NullStore))?;
//! provider.init()?;
//! provider.close()?;
//! # Ok(())
//! # }
//! ```

use super::backend_store::{BackendStore, StoreOperation};
use crate::config::{ConfigurationError, ProviderConfig};
use crate::constants::{
    defaults,
    events::{ANY_EVENT, STORE_CLOSE, STORE_OPEN},
};
use crate::error::{ProviderError, ProviderResult};
use crate::events::{EventHub, EventListener, HubStats};
use crate::logging::{log_error, log_provider_operation};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

const NOT_OPENED: &str = "The StoreProvider has not been opened";

struct RegisteredStore {
    /// Registration sequence within the current generation
    seq: u64,
    store: Arc<dyn BackendStore>,
}

/// Stores registered since the last `open`
struct StoreTable {
    entries: DashMap<String, RegisteredStore>,
    next_seq: AtomicU64,
}

impl StoreTable {
    fn new(capacity: usize, shards: usize) -> Self {
        Self {
            entries: DashMap::with_capacity_and_shard_amount(capacity, shards),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Copy of the registered stores in registration order
    fn snapshot(&self) -> Vec<(String, Arc<dyn BackendStore>)> {
        let mut stores: Vec<(u64, String, Arc<dyn BackendStore>)> = self
            .entries
            .iter()
            .map(|entry| (entry.seq, entry.key().clone(), Arc::clone(&entry.store)))
            .collect();
        stores.sort_by_key(|(seq, _, _)| *seq);
        stores
            .into_iter()
            .map(|(_, id, store)| (id, store))
            .collect()
    }
}

#[derive(Clone)]
struct OpenedState {
    name: Arc<str>,
    table: Arc<StoreTable>,
}

/// Registry coordinating a named set of backend stores through one lifecycle
pub struct StoreProvider {
    state: RwLock<Option<OpenedState>>,
    hub: EventHub,
    store_map_shards: usize,
    initial_store_capacity: usize,
}

impl StoreProvider {
    /// Create an unopened provider with default settings
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
            hub: EventHub::new(defaults::HUB_NAME),
            store_map_shards: defaults::STORE_MAP_SHARDS,
            initial_store_capacity: defaults::INITIAL_STORE_CAPACITY,
        }
    }

    /// Create an unopened provider from validated configuration
    pub fn with_config(config: &ProviderConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let settings = &config.provider;
        Ok(Self {
            state: RwLock::new(None),
            hub: EventHub::new(settings.hub_name.clone()),
            store_map_shards: settings.store_map_shards,
            initial_store_capacity: settings.initial_store_capacity,
        })
    }

    fn opened(&self) -> ProviderResult<OpenedState> {
        self.state
            .read()
            .clone()
            .ok_or_else(|| ProviderError::illegal_state(NOT_OPENED))
    }

    pub fn is_opened(&self) -> bool {
        self.state.read().is_some()
    }

    /// Register a listener for every lifecycle event this provider publishes
    pub fn listen(&self, listener: Arc<dyn EventListener>) {
        self.hub.listen(ANY_EVENT, listener);
    }

    /// Remove a listener added through [`listen`](Self::listen)
    pub fn unlisten(&self, listener: &Arc<dyn EventListener>) -> usize {
        self.hub.unlisten(ANY_EVENT, listener)
    }

    pub fn events(&self) -> &EventHub {
        &self.hub
    }

    pub fn name(&self) -> ProviderResult<String> {
        Ok(self.opened()?.name.to_string())
    }

    /// Open the provider under `name`, discarding any previously registered stores.
    ///
    /// Accepts a `&str` or an `Option<&str>`; `None` and `""` are rejected
    /// without touching the current state.
    pub fn open<'a>(&self, name: impl Into<Option<&'a str>>) -> ProviderResult<()> {
        let name = name
            .into()
            .ok_or_else(|| ProviderError::invalid_argument("The store name can't be null"))?;
        if name.is_empty() {
            return Err(ProviderError::invalid_argument(
                "The store name can't be empty",
            ));
        }

        let table = Arc::new(StoreTable::new(
            self.initial_store_capacity,
            self.store_map_shards,
        ));
        let previous = self.state.write().replace(OpenedState {
            name: Arc::from(name),
            table,
        });

        let details = previous.map(|state| {
            format!(
                "reopened, dropped {} stores of '{}'",
                state.table.entries.len(),
                state.name
            )
        });
        log_provider_operation("open", name, "success", details.as_deref());

        self.hub.notify(STORE_OPEN, self, None);
        Ok(())
    }

    /// Announce that the provider is closed. Name and stores are retained.
    pub fn close(&self) -> ProviderResult<()> {
        let state = self.opened()?;
        log_provider_operation("close", &state.name, "success", None);
        self.hub.notify(STORE_CLOSE, self, None);
        Ok(())
    }

    /// Initialize every registered store, stopping at the first failure
    pub fn init(&self) -> ProviderResult<()> {
        self.fan_out(StoreOperation::Init)
    }

    /// Clear every registered store, stopping at the first failure
    pub fn clear(&self) -> ProviderResult<()> {
        self.fan_out(StoreOperation::Clear)
    }

    fn fan_out(&self, operation: StoreOperation) -> ProviderResult<()> {
        let state = self.opened()?;
        let stores = state.table.snapshot();

        for (completed, (store_id, store)) in stores.iter().enumerate() {
            if let Err(e) = operation.apply(store.as_ref()) {
                let context = format!(
                    "provider '{}', store '{}' ({}): {} completed, {} skipped",
                    state.name,
                    store_id,
                    store.store_name(),
                    completed,
                    stores.len() - completed - 1
                );
                log_error("StoreProvider", operation.as_str(), &e.to_string(), Some(&context));
                return Err(e.into());
            }
            debug!(
                provider = %state.name,
                store = %store_id,
                backend = %store.store_name(),
                operation = %operation,
                "Store operation completed"
            );
        }

        let details = format!("{} stores", stores.len());
        log_provider_operation(operation.as_str(), &state.name, "success", Some(&details));

        self.hub.notify(operation.topic(), self, None);
        Ok(())
    }

    /// Register a store under `store_id` in the current generation.
    ///
    /// Returns the store previously registered under the same id; the
    /// replacement keeps the original registration position.
    pub fn register_store(
        &self,
        store_id: &str,
        store: Arc<dyn BackendStore>,
    ) -> ProviderResult<Option<Arc<dyn BackendStore>>> {
        if store_id.is_empty() {
            return Err(ProviderError::invalid_argument("The store id can't be empty"));
        }
        let state = self.opened()?;

        let previous = match state.table.entries.entry(store_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                Some(std::mem::replace(&mut occupied.get_mut().store, store))
            }
            Entry::Vacant(vacant) => {
                let seq = state.table.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(RegisteredStore { seq, store });
                None
            }
        };

        debug!(
            provider = %state.name,
            store = %store_id,
            replaced = previous.is_some(),
            "Registered backend store"
        );
        Ok(previous)
    }

    pub fn store(&self, store_id: &str) -> ProviderResult<Option<Arc<dyn BackendStore>>> {
        let state = self.opened()?;
        let store = state
            .table
            .entries
            .get(store_id)
            .map(|entry| Arc::clone(&entry.store));
        Ok(store)
    }

    /// Ids of the registered stores in registration order
    pub fn store_names(&self) -> ProviderResult<Vec<String>> {
        let state = self.opened()?;
        Ok(state
            .table
            .snapshot()
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    pub fn store_count(&self) -> ProviderResult<usize> {
        Ok(self.opened()?.table.entries.len())
    }

    pub fn stats(&self) -> ProviderStats {
        let state = self.state.read().clone();
        ProviderStats {
            name: state.as_ref().map(|s| s.name.to_string()),
            opened: state.is_some(),
            store_count: state.map_or(0, |s| s.table.entries.len()),
            hub: self.hub.stats(),
        }
    }
}

impl Default for StoreProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoreProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("StoreProvider")
            .field("name", &state.as_ref().map(|s| &*s.name))
            .field(
                "stores",
                &state.as_ref().map(|s| s.table.entries.len()),
            )
            .field("hub", &self.hub.name())
            .finish()
    }
}

/// Snapshot of provider state for monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStats {
    pub name: Option<String>,
    pub opened: bool,
    pub store_count: usize,
    pub hub: HubStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    struct NamedStore(&'static str);

    impl BackendStore for NamedStore {
        fn store_name(&self) -> &str {
            self.0
        }

        fn init(&self) -> Result<(), BackendError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = StoreProvider::new();
        let stats = provider.stats();

        assert!(!provider.is_opened());
        assert_eq!(stats.name, None);
        assert_eq!(stats.store_count, 0);
        assert_eq!(stats.hub.name, "store");
    }

    #[test]
    fn test_open_rejects_null_and_empty_names() {
        let provider = StoreProvider::new();

        let err = provider.open(None).unwrap_err();
        assert_eq!(
            err,
            ProviderError::invalid_argument("The store name can't be null")
        );

        let err = provider.open("").unwrap_err();
        assert_eq!(
            err,
            ProviderError::invalid_argument("The store name can't be empty")
        );

        assert!(!provider.is_opened());
        assert_eq!(provider.events().stats().events_published, 0);
    }

    #[test]
    fn test_register_requires_open_and_id() {
        let provider = StoreProvider::new();
        let err = provider
            .register_store("graph", Arc::new(NamedStore("graph")))
            .err()
            .unwrap();
        assert!(err.is_illegal_state());

        provider.open("g1").unwrap();
        let err = provider
            .register_store("", Arc::new(NamedStore("graph")))
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_replacing_store_keeps_position() {
        let provider = StoreProvider::new();
        provider.open("g1").unwrap();

        provider
            .register_store("schema", Arc::new(NamedStore("schema-v1")))
            .unwrap();
        provider
            .register_store("graph", Arc::new(NamedStore("graph")))
            .unwrap();
        let previous = provider
            .register_store("schema", Arc::new(NamedStore("schema-v2")))
            .unwrap();

        assert_eq!(previous.map(|s| s.store_name().to_string()).as_deref(), Some("schema-v1"));
        assert_eq!(provider.store_names().unwrap(), vec!["schema", "graph"]);
        assert_eq!(
            provider
                .store("schema")
                .unwrap()
                .map(|s| s.store_name().to_string())
                .as_deref(),
            Some("schema-v2")
        );
        assert_eq!(provider.store_count().unwrap(), 2);
    }

    #[test]
    fn test_with_config_rejects_invalid_shards() {
        let mut config = ProviderConfig::default();
        config.provider.store_map_shards = 3;

        assert!(StoreProvider::with_config(&config).is_err());

        config.provider.store_map_shards = 4;
        config.provider.hub_name = "graph-stores".to_string();
        let provider = StoreProvider::with_config(&config).unwrap();
        assert_eq!(provider.events().name(), "graph-stores");
    }
}
