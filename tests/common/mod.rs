//! Shared test doubles for provider integration tests.

#![allow(dead_code)]

use backend_store_provider::events::{Event, EventListener, ListenerResult};
use backend_store_provider::{BackendError, BackendStore, StoreProvider};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Journal shared by stores so tests can assert cross-store call order
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Store whose `init`/`clear` outcome is scripted by the test
pub struct MockStore {
    name: String,
    fail_init: bool,
    fail_clear: bool,
    init_calls: AtomicUsize,
    clear_calls: AtomicUsize,
    journal: Option<Journal>,
}

impl MockStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_init: false,
            fail_clear: false,
            init_calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
            journal: None,
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(Arc::clone(journal));
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }

    fn record(&self, operation: &str) {
        if let Some(journal) = &self.journal {
            journal.lock().push(format!("{}:{operation}", self.name));
        }
    }
}

impl BackendStore for MockStore {
    fn store_name(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), BackendError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.record("init");
        if self.fail_init {
            return Err(BackendError::init_failed(&self.name, "scripted init failure"));
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.record("clear");
        if self.fail_clear {
            return Err(BackendError::clear_failed(&self.name, "scripted clear failure"));
        }
        Ok(())
    }
}

/// One event as seen by a [`RecordingListener`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub topic: String,
    pub hub: String,
    pub source_addr: usize,
}

/// Listener that records every event it receives
pub struct RecordingListener {
    name: String,
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingListener {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn topics(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.topic.clone()).collect()
    }

    pub fn count(&self, topic: &str) -> usize {
        self.events.lock().iter().filter(|e| e.topic == topic).count()
    }
}

impl EventListener for RecordingListener {
    fn event(&self, event: &Event<'_>) -> ListenerResult {
        self.events.lock().push(RecordedEvent {
            topic: event.topic().to_string(),
            hub: event.hub().to_string(),
            source_addr: event.source() as *const _ as *const () as usize,
        });
        Ok(())
    }

    fn listener_name(&self) -> &str {
        &self.name
    }
}

/// Listener that fails on every event
pub struct FailingListener;

impl EventListener for FailingListener {
    fn event(&self, event: &Event<'_>) -> ListenerResult {
        Err(format!("refusing {}", event.topic()).into())
    }

    fn listener_name(&self) -> &str {
        "failing_listener"
    }
}

pub fn addr_of(provider: &StoreProvider) -> usize {
    provider as *const StoreProvider as usize
}
