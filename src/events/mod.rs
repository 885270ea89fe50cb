//! # Event System
//!
//! Publish/subscribe foundation used by the store provider to announce
//! lifecycle transitions. This module has no dependency on the provider and
//! can be reused by any component that needs topic-keyed notifications.

pub mod event;
pub mod hub;

pub use event::{listener_fn, Event, EventListener, ListenerResult};
pub use hub::{EventHub, HubStats};
