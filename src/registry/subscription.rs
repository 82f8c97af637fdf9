use crate::model::{ChannelHandle, SubscriptionId, SubscriptionState, Topic};
use crate::registry::ChangeHandler;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One open live-update feed.
///
/// Owned by the [`ChannelRegistry`](super::ChannelRegistry) together with the
/// transport handle, which is `None` while the transport has refused to create the
/// channel. The handler reference is released when the subscription closes.
pub struct ChannelSubscription {
    pub(crate) id: SubscriptionId,
    pub(crate) topic: Topic,
    pub(crate) handler: Arc<dyn ChangeHandler>,
    pub(crate) handle: Option<ChannelHandle>,
    pub(crate) state: SubscriptionState,
    pub(crate) opened_at: DateTime<Utc>,
    pub(crate) delivered: u64,
}

impl ChannelSubscription {
    pub fn info(&self) -> SubscriptionInfo {
        SubscriptionInfo {
            id: self.id,
            topic: self.topic.clone(),
            state: self.state,
            bound: self.handle.is_some(),
            opened_at: self.opened_at,
            delivered: self.delivered,
        }
    }
}

impl std::fmt::Debug for ChannelSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSubscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("handler", &self.handler.name())
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("delivered", &self.delivered)
            .finish()
    }
}

/// Point-in-time view of a subscription, safe to hand out of the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionInfo {
    pub id: SubscriptionId,
    pub topic: Topic,
    pub state: SubscriptionState,
    /// Whether the transport has created a channel for it.
    pub bound: bool,
    pub opened_at: DateTime<Utc>,
    /// Change events delivered to the handler, failed invocations included.
    pub delivered: u64,
}
