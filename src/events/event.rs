//! Event and listener types delivered by the [`EventHub`](super::EventHub).

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Outcome of a listener handling an event
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A single notification raised on an event hub.
///
/// Events borrow their source and payload from the publisher and only live
/// for the duration of delivery. Listeners that need the source afterwards
/// must copy what they need out of it.
#[derive(Clone, Copy)]
pub struct Event<'a> {
    topic: &'a str,
    hub: &'a str,
    source: &'a (dyn Any + Send + Sync),
    payload: Option<&'a Value>,
    published_at: DateTime<Utc>,
}

impl<'a> Event<'a> {
    pub fn new(
        topic: &'a str,
        hub: &'a str,
        source: &'a (dyn Any + Send + Sync),
        payload: Option<&'a Value>,
    ) -> Self {
        Self {
            topic,
            hub,
            source,
            payload,
            published_at: Utc::now(),
        }
    }

    pub fn topic(&self) -> &'a str {
        self.topic
    }

    /// Name of the hub that published this event
    pub fn hub(&self) -> &'a str {
        self.hub
    }

    pub fn source(&self) -> &'a (dyn Any + Send + Sync) {
        self.source
    }

    /// Downcast the source to a concrete publisher type
    pub fn source_as<T: Any>(&self) -> Option<&'a T> {
        self.source.downcast_ref::<T>()
    }

    /// Check whether `candidate` is the exact instance that published this event
    pub fn is_from<T: Any>(&self, candidate: &T) -> bool {
        std::ptr::eq(
            self.source as *const (dyn Any + Send + Sync) as *const (),
            candidate as *const T as *const (),
        )
    }

    pub fn payload(&self) -> Option<&'a Value> {
        self.payload
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("topic", &self.topic)
            .field("hub", &self.hub)
            .field("source", &"<dyn Any>")
            .field("payload", &self.payload)
            .field("published_at", &self.published_at)
            .finish()
    }
}

/// Observer of hub events
pub trait EventListener: Send + Sync {
    /// Handle an event. Errors are logged by the hub and never reach the publisher.
    fn event(&self, event: &Event<'_>) -> ListenerResult;

    /// Get listener name for identification in logs
    fn listener_name(&self) -> &str {
        "unnamed_listener"
    }
}

impl<F> EventListener for F
where
    F: Fn(&Event<'_>) -> ListenerResult + Send + Sync,
{
    fn event(&self, event: &Event<'_>) -> ListenerResult {
        self(event)
    }
}

/// Wrap a closure as a shareable listener handle
pub fn listener_fn<F>(f: F) -> Arc<dyn EventListener>
where
    F: Fn(&Event<'_>) -> ListenerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Identity comparison for listener handles
pub(crate) fn same_listener(a: &Arc<dyn EventListener>, b: &Arc<dyn EventListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
