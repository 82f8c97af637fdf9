use crate::lifecycle::{
    ActivationReport, CoordinatorClient, CoordinatorConfig, CoordinatorError, CoordinatorRequest,
    CoordinatorSnapshot, TopicBinding,
};
use crate::model::{ActorId, Connectivity, PresenceState, SubscriptionId, Topic};
use crate::presence::PresenceClient;
use crate::registry::{ChangeHandler, ChannelRegistry};
use crate::transport::{Transport, TransportEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Dependencies injected into [`Coordinator::run`].
pub struct CoordinatorContext {
    pub transport: Arc<dyn Transport>,
    pub presence: PresenceClient,
}

/// The Lifecycle Coordinator.
///
/// # Concurrency Model
/// The coordinator is an actor. It owns the [`ChannelRegistry`], the local
/// [`PresenceState`] and the connectivity flag, and handles one message at a time:
/// commands from [`CoordinatorClient`]s and events pushed by the transport through
/// `EventSink`s. Nothing else touches that state, so registry mutations are atomic
/// with respect to each other without any locking.
///
/// Presence changes are handed to the presence reporter and not awaited, so a slow
/// or failing store never holds up activation or teardown.
///
/// # Teardown
/// `deactivate` closes every subscription (last opened first) and only then
/// retracts presence, so presence always covers the whole time any handler can run.
/// Dropping the last client, or sending `Shutdown`, runs the same teardown before
/// the loop exits.
pub struct Coordinator {
    receiver: mpsc::Receiver<CoordinatorRequest>,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    event_sender: mpsc::UnboundedSender<TransportEvent>,
    connectivity: watch::Sender<Connectivity>,
    reannounce_on_reconnect: bool,
}

impl Coordinator {
    /// Creates the coordinator and its client. Nothing runs until [`run`](Self::run).
    pub fn new(config: &CoordinatorConfig) -> (Self, CoordinatorClient) {
        let (sender, receiver) = mpsc::channel(config.inbox_capacity.max(1));
        let (event_sender, events) = mpsc::unbounded_channel();
        let (connectivity, connectivity_rx) = watch::channel(config.initial_connectivity);
        let coordinator = Self {
            receiver,
            events,
            event_sender,
            connectivity,
            reannounce_on_reconnect: config.reannounce_on_reconnect,
        };
        (coordinator, CoordinatorClient::new(sender, connectivity_rx))
    }

    /// Runs the event loop until shutdown is requested or every client is dropped.
    pub async fn run(mut self, context: CoordinatorContext) {
        info!(transport = context.transport.name(), "Coordinator started");
        let mut state = Session {
            registry: ChannelRegistry::new(context.transport, self.event_sender),
            presence: context.presence,
            local: None,
            announced: false,
            connectivity: self.connectivity,
            reannounce_on_reconnect: self.reannounce_on_reconnect,
        };

        let mut shutdown_ack = None;
        loop {
            tokio::select! {
                Some(event) = self.events.recv() => {
                    state.registry.dispatch(event);
                }
                msg = self.receiver.recv() => {
                    // Events queued before this command go first. Only those, so a
                    // transport that never stops pushing cannot starve commands.
                    for _ in 0..self.events.len() {
                        let Ok(event) = self.events.try_recv() else {
                            break;
                        };
                        state.registry.dispatch(event);
                    }
                    match msg {
                        Some(CoordinatorRequest::Shutdown { respond_to }) => {
                            shutdown_ack = Some(respond_to);
                            break;
                        }
                        Some(msg) => state.handle(msg).await,
                        None => break,
                    }
                }
            }
        }

        state.deactivate().await;
        info!("Coordinator shutdown");
        if let Some(respond_to) = shutdown_ack {
            let _ = respond_to.send(Ok(()));
        }
    }
}

/// State owned by the running loop.
struct Session {
    registry: ChannelRegistry,
    presence: PresenceClient,
    /// Local view of presence. `Some` exactly while a session is active.
    local: Option<PresenceState>,
    /// Whether an announce was queued for the current session.
    announced: bool,
    connectivity: watch::Sender<Connectivity>,
    reannounce_on_reconnect: bool,
}

impl Session {
    async fn handle(&mut self, msg: CoordinatorRequest) {
        match msg {
            CoordinatorRequest::Activate {
                actor_id,
                topics,
                respond_to,
            } => {
                let result = self.activate(actor_id, topics).await;
                let _ = respond_to.send(result);
            }
            CoordinatorRequest::Reactivate {
                actor_id,
                topics,
                respond_to,
            } => {
                self.deactivate().await;
                let result = self.activate(actor_id, topics).await;
                let _ = respond_to.send(result);
            }
            CoordinatorRequest::Deactivate { respond_to } => {
                let torn_down = self.deactivate().await;
                let _ = respond_to.send(Ok(torn_down));
            }
            CoordinatorRequest::Open {
                topic,
                handler,
                respond_to,
            } => {
                let result = self.open(topic, handler).await;
                let _ = respond_to.send(result);
            }
            CoordinatorRequest::Close { topic, respond_to } => {
                let closed = self.registry.close(&topic).await.is_some();
                let _ = respond_to.send(Ok(closed));
            }
            CoordinatorRequest::HostClosing => self.host_closing(),
            CoordinatorRequest::SetConnectivity {
                connectivity,
                respond_to,
            } => {
                self.set_connectivity(connectivity).await;
                let _ = respond_to.send(Ok(()));
            }
            CoordinatorRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.snapshot()));
            }
            // Intercepted by the run loop.
            CoordinatorRequest::Shutdown { respond_to } => {
                let _ = respond_to.send(Ok(()));
            }
        }
    }

    async fn activate(
        &mut self,
        actor_id: ActorId,
        topics: Vec<TopicBinding>,
    ) -> Result<ActivationReport, CoordinatorError> {
        if let Some(current) = &self.local {
            warn!(%actor_id, current = %current.actor_id, "Activate rejected, session already active");
            return Err(CoordinatorError::AlreadyActive(current.actor_id.clone()));
        }

        info!(%actor_id, topics = topics.len(), "Activating");
        let is_online = self.connectivity.borrow().is_online();
        self.local = Some(PresenceState {
            actor_id: actor_id.clone(),
            is_online,
            status_message: None,
        });
        self.announced = false;
        if is_online {
            self.announce(&actor_id);
        } else {
            info!(%actor_id, "Offline, announce deferred until reconnect");
        }

        let mut report = ActivationReport::new(actor_id);
        for (topic, handler) in topics {
            match self.registry.open(topic.clone(), handler).await {
                Ok(_) => report.opened.push(topic),
                Err(e) => report.failed.push((topic, e)),
            }
        }
        report.unbound = self.registry.unbound();

        info!(
            actor_id = %report.actor_id,
            opened = report.opened.len(),
            unbound = report.unbound.len(),
            failed = report.failed.len(),
            "Activated"
        );
        Ok(report)
    }

    /// Closes everything, then retracts. Returns `false` if there was no session.
    async fn deactivate(&mut self) -> bool {
        let Some(local) = self.local.take() else {
            debug!("Deactivate ignored, no active session");
            return false;
        };

        let closed = self.registry.close_all().await;
        self.announced = false;
        self.retract(&local.actor_id);
        info!(actor_id = %local.actor_id, closed, "Deactivated");
        true
    }

    async fn open(
        &mut self,
        topic: Topic,
        handler: Arc<dyn ChangeHandler>,
    ) -> Result<SubscriptionId, CoordinatorError> {
        if self.local.is_none() {
            warn!(%topic, "Open rejected, no active session");
            return Err(CoordinatorError::NotActive);
        }
        Ok(self.registry.open(topic, handler).await?)
    }

    /// Retracts presence without touching subscriptions.
    ///
    /// Delivery is not guaranteed: the request is only queued, and the host may be
    /// gone before the reporter gets to it.
    fn host_closing(&mut self) {
        let Some(local) = &mut self.local else {
            debug!("Host closing with no active session");
            return;
        };
        local.is_online = false;
        let actor_id = local.actor_id.clone();
        info!(%actor_id, "Host closing, retracting presence");
        self.retract(&actor_id);
    }

    async fn set_connectivity(&mut self, connectivity: Connectivity) {
        let previous = self.connectivity.send_replace(connectivity);
        if previous == connectivity {
            debug!(%connectivity, "Connectivity unchanged");
            return;
        }
        info!(%previous, %connectivity, "Connectivity changed");

        let Some(local) = &mut self.local else {
            return;
        };
        local.is_online = connectivity.is_online();
        let actor_id = local.actor_id.clone();

        if connectivity.is_online() {
            if self.reannounce_on_reconnect || !self.announced {
                self.announce(&actor_id);
            }
            self.registry.rebind().await;
        } else if self.reannounce_on_reconnect {
            // What the store confirmed before the drop is not trusted after it.
            self.invalidate(&actor_id);
        }
    }

    fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            presence: self.local.clone(),
            connectivity: *self.connectivity.borrow(),
            subscriptions: self.registry.subscriptions(),
        }
    }

    fn announce(&mut self, actor_id: &ActorId) {
        match self.presence.announce(actor_id.clone()) {
            Ok(()) => self.announced = true,
            Err(e) => warn!(%actor_id, error = %e, "Announce not queued"),
        }
    }

    fn invalidate(&self, actor_id: &ActorId) {
        if let Err(e) = self.presence.invalidate(actor_id.clone()) {
            warn!(%actor_id, error = %e, "Invalidate not queued");
        }
    }

    fn retract(&self, actor_id: &ActorId) {
        if let Err(e) = self.presence.retract(actor_id.clone()) {
            warn!(%actor_id, error = %e, "Retract not queued");
        }
    }
}
