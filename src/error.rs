//! # Provider Error Types
//!
//! Structured errors for the store provider using thiserror. Argument and
//! state errors are raised before any side effect; backend errors come from
//! a store's `init`/`clear` and are surfaced to the caller unchanged.

use thiserror::Error;

/// Failure reported by a backend store while initializing or clearing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Backend error in store '{store}' during {operation}: {message}")]
pub struct BackendError {
    pub store: String,
    pub operation: String,
    pub message: String,
}

impl BackendError {
    pub fn new(
        store: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            store: store.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an error for a failed `init`
    pub fn init_failed(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(store, "init", message)
    }

    /// Create an error for a failed `clear`
    pub fn clear_failed(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(store, "clear", message)
    }
}

/// Errors returned by `StoreProvider` lifecycle operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Illegal state: {message}")]
    IllegalState { message: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ProviderError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an illegal state error
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState { .. })
    }

    /// The underlying store failure, if this error came from a backend
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
