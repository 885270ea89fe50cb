#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Backend Store Provider
//!
//! Lifecycle registry for pluggable backend stores.
//!
//! ## Overview
//!
//! A [`StoreProvider`] owns a named collection of backend stores (for example
//! the schema, graph and system partitions of a graph database) and drives
//! them through one lifecycle: *unopened → opened → initialized/cleared →
//! closed*. Every transition is announced on the provider's [`EventHub`] so
//! that caches, indexes and other observers can react without the provider
//! knowing about them.
//!
//! ## Module Organization
//!
//! - [`provider`] - The store provider registry and the [`BackendStore`] trait
//! - [`events`] - Topic-keyed publish/subscribe with listener failure isolation
//! - [`constants`] - Reserved lifecycle topics and defaults
//! - [`error`] - Structured error handling
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - Structured `tracing` setup
//!
//! ## Lifecycle
//!
//! ```text
//! UNOPENED --open(name)--> OPENED --open(name)--> OPENED (stores reset)
//!                          OPENED --close()-----> OPENED (name and stores retained)
//! UNOPENED --name/close/init/clear--> IllegalState
//! ```
//!
//! `init` and `clear` stop at the first failing store: stores before it keep
//! their new state, stores after it are untouched, and no event is published.
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod provider;

pub use config::{ConfigManager, ConfigurationError, LoggingConfig, ProviderConfig, ProviderSettings};
pub use constants::events as store_events;
pub use error::{BackendError, ProviderError, ProviderResult};
pub use events::{listener_fn, Event, EventHub, EventListener, HubStats, ListenerResult};
pub use provider::{BackendStore, ProviderStats, StoreOperation, StoreProvider};
