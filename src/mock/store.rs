use crate::model::PresenceState;
use crate::transport::{PresenceStore, StoreError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct StoreState {
    calls: Vec<PresenceState>,
    fail_next: usize,
    failures: usize,
    unreachable: bool,
    delay: Duration,
}

/// A presence store that records every RPC it receives.
///
/// Failed and timed out calls are recorded too: they are RPCs that were issued.
#[derive(Clone, Default)]
pub struct MockPresenceStore {
    state: Arc<Mutex<StoreState>>,
}

impl MockPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every RPC received so far, in order.
    pub fn calls(&self) -> Vec<PresenceState> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The `is_online` flag of every RPC received so far.
    pub fn online_flags(&self) -> Vec<bool> {
        self.calls().iter().map(|call| call.is_online).collect()
    }

    /// How many RPCs were answered with a failure.
    pub fn failures(&self) -> usize {
        self.state.lock().unwrap().failures
    }

    /// Fails the next `count` RPCs.
    pub fn fail_next(&self, count: usize) {
        self.state.lock().unwrap().fail_next = count;
    }

    /// Fails every RPC with [`StoreError::Unreachable`] while set.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Delays every answer by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = delay;
    }
}

#[async_trait]
impl PresenceStore for MockPresenceStore {
    async fn set_presence(&self, presence: &PresenceState) -> Result<(), StoreError> {
        let (outcome, delay) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(presence.clone());
            let outcome = if state.unreachable {
                Err(StoreError::Unreachable)
            } else if state.fail_next > 0 {
                state.fail_next -= 1;
                Err(StoreError::Rpc("injected failure".into()))
            } else {
                Ok(())
            };
            if outcome.is_err() {
                state.failures += 1;
            }
            (outcome, state.delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}
