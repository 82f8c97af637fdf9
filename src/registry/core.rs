use crate::model::{ChangeEvent, ChannelHandle, SubscriptionId, SubscriptionState, Topic};
use crate::registry::handler::invoke;
use crate::registry::{
    ChangeHandler, ChannelSubscription, HandlerError, RegistryError, SubscriptionInfo,
};
use crate::transport::{EventSink, Transport, TransportEvent, TransportEventKind};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What [`ChannelRegistry::dispatch`] did with one transport event.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The acknowledgement moved the subscription from `Pending` to `Active`.
    Activated,
    /// The handler ran and returned `Ok`.
    Delivered,
    /// The handler ran and failed. Nothing else is affected.
    HandlerFailed(HandlerError),
    /// The transport reported it could not establish the channel.
    Rejected,
    /// A repeated acknowledgement for an already active subscription.
    Ignored,
    /// The subscription the event belongs to is closed (or never existed).
    Stale,
}

/// Owns every open [`ChannelSubscription`] and routes transport events to handlers.
///
/// # Ordering
/// Subscriptions are remembered in creation order so that [`close_all`] can undo
/// them last-opened-first. No ordering is imposed on events of different topics.
///
/// [`close_all`]: ChannelRegistry::close_all
pub struct ChannelRegistry {
    transport: Arc<dyn Transport>,
    events: mpsc::UnboundedSender<TransportEvent>,
    subscriptions: HashMap<SubscriptionId, ChannelSubscription>,
    by_topic: HashMap<Topic, SubscriptionId>,
    order: Vec<SubscriptionId>,
    next_id: u64,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    ///
    /// Every sink handed to the transport feeds `events`; whoever owns the receiving
    /// end is expected to pass each event back to [`dispatch`](Self::dispatch).
    pub fn new(
        transport: Arc<dyn Transport>,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Self {
        Self {
            transport,
            events,
            subscriptions: HashMap::new(),
            by_topic: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Opens a `Pending` subscription for `topic`.
    ///
    /// The subscription becomes `Active` when the transport acknowledges it. If the
    /// acknowledgement never comes the subscription stays `Pending`; reconnecting is
    /// the transport's business, not the registry's.
    ///
    /// A transport that refuses to create the channel at all does not fail the call
    /// either. The subscription is kept `Pending` without a channel and
    /// [`rebind`](Self::rebind) asks the transport again later.
    pub async fn open(
        &mut self,
        topic: Topic,
        handler: Arc<dyn ChangeHandler>,
    ) -> Result<SubscriptionId, RegistryError> {
        if self.by_topic.contains_key(&topic) {
            warn!(%topic, "Topic already open");
            return Err(RegistryError::AlreadyOpen(topic));
        }

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        debug!(%topic, subscription = %id, handler = handler.name(), "Open");

        let handle = self.subscribe(id, &topic).await;
        self.by_topic.insert(topic.clone(), id);
        self.order.push(id);
        self.subscriptions.insert(
            id,
            ChannelSubscription {
                id,
                topic: topic.clone(),
                handler,
                handle,
                state: SubscriptionState::Pending,
                opened_at: Utc::now(),
                delivered: 0,
            },
        );
        info!(%topic, subscription = %id, bound = handle.is_some(), size = self.subscriptions.len(), "Opened");
        Ok(id)
    }

    /// Asks the transport again for every subscription that has no channel yet.
    /// Returns how many got one.
    pub async fn rebind(&mut self) -> usize {
        let unbound: Vec<(SubscriptionId, Topic)> = self
            .order
            .iter()
            .filter_map(|id| self.subscriptions.get(id))
            .filter(|subscription| subscription.handle.is_none())
            .map(|subscription| (subscription.id, subscription.topic.clone()))
            .collect();

        let mut bound = 0;
        for (id, topic) in unbound {
            let Some(handle) = self.subscribe(id, &topic).await else {
                continue;
            };
            if let Some(subscription) = self.subscriptions.get_mut(&id) {
                subscription.handle = Some(handle);
                bound += 1;
            }
        }
        if bound > 0 {
            info!(bound, "Rebound subscriptions");
        }
        bound
    }

    /// Topics whose subscription is still waiting for a transport channel, in
    /// creation order.
    pub fn unbound(&self) -> Vec<Topic> {
        self.order
            .iter()
            .filter_map(|id| self.subscriptions.get(id))
            .filter(|subscription| subscription.handle.is_none())
            .map(|subscription| subscription.topic.clone())
            .collect()
    }

    async fn subscribe(&self, id: SubscriptionId, topic: &Topic) -> Option<ChannelHandle> {
        let sink = EventSink::new(id, topic.clone(), self.events.clone());
        match self.transport.subscribe(topic, sink).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(%topic, subscription = %id, error = %e, "Subscribe failed, staying pending");
                None
            }
        }
    }

    /// Closes the subscription for `topic` and releases its transport channel.
    ///
    /// Returns the final view of the closed subscription, or `None` (doing nothing)
    /// if no subscription is open for the topic.
    pub async fn close(&mut self, topic: &Topic) -> Option<SubscriptionInfo> {
        match self.by_topic.get(topic).copied() {
            Some(id) => self.close_id(id).await,
            None => {
                debug!(%topic, "Close ignored, topic not open");
                None
            }
        }
    }

    /// Closes every subscription, last opened first. Returns how many were closed.
    pub async fn close_all(&mut self) -> usize {
        let ids: Vec<SubscriptionId> = self.order.iter().rev().copied().collect();
        let mut closed = 0;
        for id in ids {
            if self.close_id(id).await.is_some() {
                closed += 1;
            }
        }
        closed
    }

    async fn close_id(&mut self, id: SubscriptionId) -> Option<SubscriptionInfo> {
        let mut subscription = self.subscriptions.remove(&id)?;
        self.by_topic.remove(&subscription.topic);
        self.order.retain(|open| *open != id);
        subscription.state = SubscriptionState::Closed;

        // The subscription is already unreachable from dispatch at this point, so
        // nothing the transport still has in flight can reach the handler.
        let topic = &subscription.topic;
        if let Some(handle) = subscription.handle {
            if let Err(e) = self.transport.unsubscribe(handle).await {
                warn!(%topic, subscription = %id, error = %e, "Unsubscribe failed");
            }
        }
        info!(
            %topic,
            subscription = %id,
            state = %subscription.state,
            delivered = subscription.delivered,
            size = self.subscriptions.len(),
            "Closed"
        );
        Some(subscription.info())
    }

    /// Applies one transport event.
    ///
    /// A change event for a `Pending` subscription counts as its acknowledgement:
    /// the channel is evidently live.
    pub fn dispatch(&mut self, event: TransportEvent) -> Dispatch {
        let TransportEvent {
            subscription: id,
            topic,
            kind,
        } = event;

        let Some(subscription) = self.subscriptions.get_mut(&id) else {
            debug!(%topic, subscription = %id, "Dropping event for closed subscription");
            return Dispatch::Stale;
        };

        match kind {
            TransportEventKind::Subscribed => {
                if subscription.state == SubscriptionState::Pending {
                    subscription.state = SubscriptionState::Active;
                    info!(%topic, subscription = %id, "Active");
                    Dispatch::Activated
                } else {
                    debug!(%topic, subscription = %id, "Repeated acknowledgement");
                    Dispatch::Ignored
                }
            }
            TransportEventKind::Rejected(reason) => {
                warn!(%topic, subscription = %id, state = %subscription.state, %reason, "Transport rejected subscription");
                Dispatch::Rejected
            }
            TransportEventKind::Changed { occurred_at } => {
                if subscription.state == SubscriptionState::Pending {
                    subscription.state = SubscriptionState::Active;
                    info!(%topic, subscription = %id, "Active (implicit)");
                }
                subscription.delivered += 1;
                let change = ChangeEvent::new(subscription.topic.clone(), occurred_at);
                debug!(%topic, subscription = %id, %occurred_at, "Change");

                match invoke(subscription.handler.as_ref(), &change) {
                    Ok(()) => Dispatch::Delivered,
                    Err(e) => {
                        let handler = subscription.handler.name();
                        match &e {
                            HandlerError::Panicked(_) => {
                                error!(%topic, subscription = %id, handler, error = %e, "Handler panicked")
                            }
                            HandlerError::Failed(_) => {
                                warn!(%topic, subscription = %id, handler, error = %e, "Handler failed")
                            }
                        }
                        Dispatch::HandlerFailed(e)
                    }
                }
            }
        }
    }

    /// State of the subscription currently open for `topic`, if any.
    pub fn state(&self, topic: &Topic) -> Option<SubscriptionState> {
        self.by_topic
            .get(topic)
            .and_then(|id| self.subscriptions.get(id))
            .map(|subscription| subscription.state)
    }

    /// Open subscriptions in creation order.
    pub fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        self.order
            .iter()
            .filter_map(|id| self.subscriptions.get(id))
            .map(ChannelSubscription::info)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
