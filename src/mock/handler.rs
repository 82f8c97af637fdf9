use crate::model::{ChangeEvent, Topic};
use crate::registry::{ChangeHandler, HandlerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every change event it is notified of.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle to this recorder, ready to pass to `open` or `activate`.
    pub fn to_handler(&self) -> Arc<dyn ChangeHandler> {
        Arc::new(self.clone())
    }

    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn topics(&self) -> Vec<Topic> {
        self.events().into_iter().map(|event| event.topic).collect()
    }
}

impl ChangeHandler for RecordingHandler {
    fn notify(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Returns an error from every invocation.
#[derive(Clone)]
pub struct FailingHandler {
    reason: String,
    attempts: Arc<AtomicUsize>,
}

impl FailingHandler {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ChangeHandler for FailingHandler {
    fn notify(&self, _event: &ChangeEvent) -> Result<(), HandlerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(HandlerError::Failed(self.reason.clone()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Panics on every invocation.
#[derive(Clone, Default)]
pub struct PanickingHandler {
    attempts: Arc<AtomicUsize>,
}

impl PanickingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ChangeHandler for PanickingHandler {
    fn notify(&self, event: &ChangeEvent) -> Result<(), HandlerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        panic!("handler exploded on {}", event.topic);
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}
