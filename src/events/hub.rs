//! # Event Hub
//!
//! Topic-keyed publish/subscribe registry with synchronous delivery.
//!
//! ## Overview
//!
//! The EventHub keeps an ordered list of listeners per topic. Publishing an
//! event delivers it on the caller's thread to every listener of that topic
//! and then to every listener of the wildcard topic ([`ANY_EVENT`]).
//!
//! ## Key Features
//!
//! - **Registration order delivery** per topic
//! - **Failure isolation**: a listener returning an error or panicking is
//!   logged and counted, and delivery continues with the next listener
//! - **Snapshot delivery**: the listener list is copied before delivery, so
//!   listeners may register or unregister from inside a callback
//! - **Delivery statistics** for monitoring
//!
//! ## Usage
//!
//! ```rust
//! use backend_store_provider::events::{listener_fn, EventHub};
//! use backend_store_provider::constants::events::ANY_EVENT;
//!
//! let hub = EventHub::new("store");
//! hub.listen(ANY_EVENT, listener_fn(|event| {
//!     println!("received {}", event.topic());
//!     Ok(())
//! }));
//!
//! let delivered = hub.notify("store.open", &(), None);
//! assert_eq!(delivered, 1);
//! ```

use super::event::{same_listener, Event, EventListener};
use crate::constants::events::ANY_EVENT;
use parking_lot::RwLock;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of listeners keyed by topic
pub struct EventHub {
    name: String,
    /// Map of topic to listeners in registration order
    listeners: RwLock<HashMap<String, Vec<Arc<dyn EventListener>>>>,
    events_published: AtomicU64,
    listener_failures: AtomicU64,
}

impl EventHub {
    /// Create a new, empty event hub
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: RwLock::new(HashMap::new()),
            events_published: AtomicU64::new(0),
            listener_failures: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a listener for a topic, or for [`ANY_EVENT`] to receive everything
    pub fn listen(&self, topic: &str, listener: Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write();
        listeners
            .entry(topic.to_string())
            .or_insert_with(Vec::new)
            .push(listener);

        debug!(hub = %self.name, topic = %topic, "Registered event listener");
    }

    /// Remove every registration of `listener` under `topic`, returning how many were removed
    pub fn unlisten(&self, topic: &str, listener: &Arc<dyn EventListener>) -> usize {
        let mut listeners = self.listeners.write();
        let Some(registered) = listeners.get_mut(topic) else {
            return 0;
        };

        let before = registered.len();
        registered.retain(|candidate| !same_listener(candidate, listener));
        let removed = before - registered.len();

        if registered.is_empty() {
            listeners.remove(topic);
        }

        if removed > 0 {
            debug!(hub = %self.name, topic = %topic, removed, "Unregistered event listener");
        }
        removed
    }

    /// Remove all listeners of a topic, returning them
    pub fn unlisten_all(&self, topic: &str) -> Vec<Arc<dyn EventListener>> {
        self.listeners.write().remove(topic).unwrap_or_default()
    }

    /// Listeners currently registered for exactly `topic`
    pub fn listeners(&self, topic: &str) -> Vec<Arc<dyn EventListener>> {
        self.listeners
            .read()
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains_listener(&self, topic: &str) -> bool {
        self.listeners
            .read()
            .get(topic)
            .is_some_and(|registered| !registered.is_empty())
    }

    /// Topics that have at least one listener, sorted
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.listeners.read().keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Publish an event synchronously.
    ///
    /// Listeners of `topic` run first, then wildcard listeners. Returns the
    /// number of listeners that handled the event without failing.
    pub fn notify(
        &self,
        topic: &str,
        source: &(dyn Any + Send + Sync),
        payload: Option<&Value>,
    ) -> usize {
        let targets = self.matching_listeners(topic);
        self.events_published.fetch_add(1, Ordering::Relaxed);

        if targets.is_empty() {
            debug!(hub = %self.name, topic = %topic, "No listeners found for event");
            return 0;
        }

        let event = Event::new(topic, &self.name, source, payload);
        let mut delivered = 0;
        for listener in targets {
            match self.deliver(listener.as_ref(), &event) {
                Ok(()) => delivered += 1,
                Err(reason) => {
                    self.listener_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        hub = %self.name,
                        topic = %topic,
                        listener = %listener.listener_name(),
                        error = %reason,
                        "Failed to handle event"
                    );
                }
            }
        }

        delivered
    }

    fn matching_listeners(&self, topic: &str) -> Vec<Arc<dyn EventListener>> {
        let listeners = self.listeners.read();
        let mut matching = Vec::new();

        if let Some(registered) = listeners.get(topic) {
            matching.extend(registered.iter().cloned());
        }
        if topic != ANY_EVENT {
            if let Some(registered) = listeners.get(ANY_EVENT) {
                matching.extend(registered.iter().cloned());
            }
        }

        matching
    }

    fn deliver(&self, listener: &dyn EventListener, event: &Event<'_>) -> Result<(), String> {
        match panic::catch_unwind(AssertUnwindSafe(|| listener.event(event))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic_payload) => Err(panic_message(&*panic_payload)),
        }
    }

    /// Get delivery statistics
    pub fn stats(&self) -> HubStats {
        let listeners = self.listeners.read();
        HubStats {
            name: self.name.clone(),
            total_topics: listeners.len(),
            total_listeners: listeners.values().map(Vec::len).sum(),
            events_published: self.events_published.load(Ordering::Relaxed),
            listener_failures: self.listener_failures.load(Ordering::Relaxed),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("listener panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("listener panicked: {message}")
    } else {
        "listener panicked".to_string()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("name", &self.name)
            .field("topics", &self.topics())
            .field("events_published", &self.events_published)
            .field("listener_failures", &self.listener_failures)
            .finish()
    }
}

/// Statistics about an event hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubStats {
    pub name: String,
    pub total_topics: usize,
    pub total_listeners: usize,
    pub events_published: u64,
    pub listener_failures: u64,
}
