use crate::lifecycle::{
    ActivationReport, CoordinatorError, CoordinatorRequest, CoordinatorSnapshot, Response,
    TopicBinding,
};
use crate::model::{ActorId, Connectivity, SubscriptionId, Topic};
use crate::registry::ChangeHandler;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// A cloneable handle for driving a [`Coordinator`](super::Coordinator).
///
/// Each method maps to one host lifecycle signal:
///
/// | Host signal | Method |
/// |-------------|--------|
/// | actor session starts | [`activate`](Self::activate) |
/// | actor identity changes | [`reactivate`](Self::reactivate) |
/// | session ends / view unmounts | [`deactivate`](Self::deactivate) |
/// | host is about to close | [`host_closing`](Self::host_closing) |
/// | network online / offline | [`set_connectivity`](Self::set_connectivity) |
///
/// `activate` and `deactivate` return once subscriptions are opened or closed; they
/// never wait for the presence RPC.
#[derive(Clone)]
pub struct CoordinatorClient {
    sender: mpsc::Sender<CoordinatorRequest>,
    connectivity: watch::Receiver<Connectivity>,
}

impl CoordinatorClient {
    pub fn new(
        sender: mpsc::Sender<CoordinatorRequest>,
        connectivity: watch::Receiver<Connectivity>,
    ) -> Self {
        Self {
            sender,
            connectivity,
        }
    }

    /// Starts a session: announces presence, then opens one subscription per topic.
    ///
    /// Presence is announced only while online; otherwise it waits for the reconnect.
    /// Topics that fail to open are listed in the report; they do not fail the call.
    /// Fails with [`CoordinatorError::AlreadyActive`] if a session is running.
    #[instrument(skip(self, topics), fields(topics = topics.len()))]
    pub async fn activate(
        &self,
        actor_id: ActorId,
        topics: Vec<TopicBinding>,
    ) -> Result<ActivationReport, CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::Activate {
            actor_id,
            topics,
            respond_to,
        })
        .await
    }

    /// Ends the current session (if any) and starts a new one, with nothing
    /// processed in between.
    #[instrument(skip(self, topics), fields(topics = topics.len()))]
    pub async fn reactivate(
        &self,
        actor_id: ActorId,
        topics: Vec<TopicBinding>,
    ) -> Result<ActivationReport, CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::Reactivate {
            actor_id,
            topics,
            respond_to,
        })
        .await
    }

    /// Closes every subscription, last opened first, then retracts presence.
    ///
    /// Safe to call any number of times; returns `false` when there was no session.
    #[instrument(skip(self))]
    pub async fn deactivate(&self) -> Result<bool, CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::Deactivate { respond_to })
            .await
    }

    /// Opens one more subscription within the active session.
    #[instrument(skip(self, handler))]
    pub async fn open(
        &self,
        topic: Topic,
        handler: Arc<dyn ChangeHandler>,
    ) -> Result<SubscriptionId, CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::Open {
            topic,
            handler,
            respond_to,
        })
        .await
    }

    /// Closes the subscription for `topic`. Returns `false` if it was not open.
    #[instrument(skip(self))]
    pub async fn close(&self, topic: Topic) -> Result<bool, CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::Close { topic, respond_to })
            .await
    }

    /// Best-effort presence retract for a host that is about to go away.
    ///
    /// Does not wait and does not guarantee the retract reaches the store.
    /// Subscriptions are left alone; a later `deactivate` still tears them down.
    pub fn host_closing(&self) -> Result<(), CoordinatorError> {
        self.sender
            .try_send(CoordinatorRequest::HostClosing)
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => CoordinatorError::InboxFull,
                mpsc::error::TrySendError::Closed(_) => CoordinatorError::ActorClosed,
            })
    }

    /// Records a connectivity change reported by the host.
    ///
    /// Channels the transport created are left alone; reconnecting them is its job.
    /// Going online asks again for subscriptions it refused to create, and
    /// re-announces presence when `reannounce_on_reconnect` is set (or when the
    /// session started offline and was never announced).
    #[instrument(skip(self))]
    pub async fn set_connectivity(&self, connectivity: Connectivity) -> Result<(), CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::SetConnectivity {
            connectivity,
            respond_to,
        })
        .await
    }

    pub async fn network_online(&self) -> Result<(), CoordinatorError> {
        self.set_connectivity(Connectivity::Online).await
    }

    pub async fn network_offline(&self) -> Result<(), CoordinatorError> {
        self.set_connectivity(Connectivity::Offline).await
    }

    /// Watches the connectivity flag, e.g. to decide whether to offer a manual retry.
    pub fn connectivity(&self) -> watch::Receiver<Connectivity> {
        self.connectivity.clone()
    }

    /// Current state of the coordinator.
    ///
    /// Transport events queued before this call are applied before it is answered.
    pub async fn snapshot(&self) -> Result<CoordinatorSnapshot, CoordinatorError> {
        self.request(|respond_to| CoordinatorRequest::Snapshot { respond_to })
            .await
    }

    /// Tears down the session and stops the coordinator, even if other clients
    /// are still alive. They will see [`CoordinatorError::ActorClosed`] afterwards.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        debug!("Sending request");
        self.request(|respond_to| CoordinatorRequest::Shutdown { respond_to })
            .await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Response<T>) -> CoordinatorRequest,
    ) -> Result<T, CoordinatorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| CoordinatorError::ActorClosed)?;
        response.await.map_err(|_| CoordinatorError::ActorDropped)?
    }
}
