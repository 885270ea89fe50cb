//! # System Constants
//!
//! Reserved event topics published by the store provider and the defaults
//! used when no configuration file is supplied.

/// Lifecycle events published on the provider's event hub
pub mod events {
    /// Wildcard topic: listeners registered here receive every event
    pub const ANY_EVENT: &str = "*";

    pub const STORE_OPEN: &str = "store.open";
    pub const STORE_CLOSE: &str = "store.close";
    pub const STORE_INIT: &str = "store.init";
    pub const STORE_CLEAR: &str = "store.clear";

    /// All lifecycle topics in the order a full open/init/clear/close cycle emits them
    pub const LIFECYCLE: [&str; 4] = [STORE_OPEN, STORE_INIT, STORE_CLEAR, STORE_CLOSE];
}

/// Defaults for provider construction
pub mod defaults {
    /// Name of the event hub owned by every provider
    pub const HUB_NAME: &str = "store";

    /// Shard amount for the concurrent store map (must be a power of two)
    pub const STORE_MAP_SHARDS: usize = 16;

    pub const INITIAL_STORE_CAPACITY: usize = 8;

    pub const LOG_LEVEL: &str = "info";
}
