//! Capability contract implemented by every concrete backend store.

use crate::error::BackendError;
use std::fmt;

/// A pluggable backend unit managed by a [`StoreProvider`](super::StoreProvider).
///
/// The provider calls `init` and `clear` once per lifecycle call and never
/// depends on the concrete store type. Implementations own their resources
/// and decide what initializing or clearing means.
pub trait BackendStore: Send + Sync {
    /// Name used to identify the store in logs and errors
    fn store_name(&self) -> &str;

    fn init(&self) -> Result<(), BackendError>;

    fn clear(&self) -> Result<(), BackendError>;
}

/// Lifecycle operation fanned out to every registered store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Init,
    Clear,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Clear => "clear",
        }
    }

    /// Topic published once the operation succeeded on every store
    pub fn topic(&self) -> &'static str {
        use crate::constants::events::{STORE_CLEAR, STORE_INIT};
        match self {
            Self::Init => STORE_INIT,
            Self::Clear => STORE_CLEAR,
        }
    }

    pub fn apply(&self, store: &dyn BackendStore) -> Result<(), BackendError> {
        match self {
            Self::Init => store.init(),
            Self::Clear => store.clear(),
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
