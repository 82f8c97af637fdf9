use crate::model::{ActorId, PresenceState};
use crate::presence::{PresenceError, PresenceRequest};
use crate::transport::PresenceStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// What happened to one presence request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reported {
    /// The RPC was issued and the store confirmed it.
    Sent,
    /// The store already confirmed this exact state; no RPC was issued.
    Unchanged,
}

/// The actor that talks to the presence store.
///
/// It remembers, per actor, the last state the store confirmed. A request for the
/// state that is already confirmed is skipped, which is what makes `announce`
/// idempotent from the caller's point of view. A failed or timed out RPC forgets the
/// confirmed state, so the next request for that actor always goes out.
pub struct PresenceReporter {
    receiver: mpsc::Receiver<PresenceRequest>,
    confirmed: HashMap<ActorId, bool>,
    rpc_timeout: Duration,
}

impl PresenceReporter {
    /// Creates the reporter and its client.
    ///
    /// `buffer_size` bounds the queue; when it is full new requests are dropped
    /// rather than blocking the sender.
    pub fn new(buffer_size: usize, rpc_timeout: Duration) -> (Self, PresenceClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let reporter = Self {
            receiver,
            confirmed: HashMap::new(),
            rpc_timeout,
        };
        (reporter, PresenceClient::new(sender))
    }

    /// Processes requests until every [`PresenceClient`] has been dropped.
    pub async fn run(mut self, store: Arc<dyn PresenceStore>) {
        info!("Presence reporter started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                PresenceRequest::Announce { actor_id } => {
                    self.apply(store.as_ref(), PresenceState::online(actor_id))
                        .await;
                }
                PresenceRequest::Retract { actor_id } => {
                    self.apply(store.as_ref(), PresenceState::offline(actor_id))
                        .await;
                }
                PresenceRequest::Invalidate { actor_id } => {
                    if self.confirmed.remove(&actor_id).is_some() {
                        debug!(%actor_id, "Confirmed presence invalidated");
                    }
                }
                PresenceRequest::Flush { respond_to } => {
                    let _ = respond_to.send(());
                }
            }
        }

        info!(confirmed = self.confirmed.len(), "Presence reporter shutdown");
    }

    async fn apply(&mut self, store: &dyn PresenceStore, state: PresenceState) {
        let actor_id = state.actor_id.clone();
        let is_online = state.is_online;
        match self.report(store, state).await {
            Ok(Reported::Sent) => info!(%actor_id, is_online, "Presence reported"),
            Ok(Reported::Unchanged) => debug!(%actor_id, is_online, "Presence unchanged"),
            Err(e) => warn!(%actor_id, is_online, error = %e, "Presence report failed"),
        }
    }

    /// Sends `state` to the store unless the store already confirmed it.
    pub async fn report(
        &mut self,
        store: &dyn PresenceStore,
        state: PresenceState,
    ) -> Result<Reported, PresenceError> {
        if self.confirmed.get(&state.actor_id) == Some(&state.is_online) {
            return Ok(Reported::Unchanged);
        }

        let outcome = tokio::time::timeout(self.rpc_timeout, store.set_presence(&state)).await;
        match outcome {
            Ok(Ok(())) => {
                self.confirmed.insert(state.actor_id, state.is_online);
                Ok(Reported::Sent)
            }
            Ok(Err(e)) => {
                self.confirmed.remove(&state.actor_id);
                Err(PresenceError::Store(e))
            }
            Err(_) => {
                self.confirmed.remove(&state.actor_id);
                Err(PresenceError::Timeout(self.rpc_timeout))
            }
        }
    }
}

/// Handle for queueing presence changes.
///
/// `announce` and `retract` return as soon as the request is queued. Cloning is
/// cheap; the reporter stops once every clone is gone.
#[derive(Clone, Debug)]
pub struct PresenceClient {
    sender: mpsc::Sender<PresenceRequest>,
}

impl PresenceClient {
    pub fn new(sender: mpsc::Sender<PresenceRequest>) -> Self {
        Self { sender }
    }

    pub fn announce(&self, actor_id: ActorId) -> Result<(), PresenceError> {
        self.enqueue(PresenceRequest::Announce { actor_id })
    }

    pub fn retract(&self, actor_id: ActorId) -> Result<(), PresenceError> {
        self.enqueue(PresenceRequest::Retract { actor_id })
    }

    /// Makes the next `announce` or `retract` for `actor_id` reach the store even if
    /// it matches what the store last confirmed.
    pub fn invalidate(&self, actor_id: ActorId) -> Result<(), PresenceError> {
        self.enqueue(PresenceRequest::Invalidate { actor_id })
    }

    /// Waits until every request queued before this call has been processed.
    pub async fn flush(&self) -> Result<(), PresenceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PresenceRequest::Flush { respond_to })
            .await
            .map_err(|_| PresenceError::ReporterClosed)?;
        response.await.map_err(|_| PresenceError::ReporterDropped)
    }

    fn enqueue(&self, request: PresenceRequest) -> Result<(), PresenceError> {
        self.sender.try_send(request).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PresenceError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => PresenceError::ReporterClosed,
        })
    }
}
