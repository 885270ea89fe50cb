//! # Store Provider
//!
//! Registry owning a named set of backend stores that share one lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! StoreProvider
//! ├── state: RwLock<Option<OpenedState>>   (name + store table, swapped by open)
//! │   └── StoreTable: DashMap<id, store>   (concurrent registration and iteration)
//! └── EventHub "store"                     (lifecycle notifications)
//! ```

pub mod backend_store;
pub mod store_provider;

pub use backend_store::{BackendStore, StoreOperation};
pub use store_provider::{ProviderStats, StoreProvider};
