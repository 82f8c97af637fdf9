use crate::lifecycle::CoordinatorError;
use crate::model::{ActorId, Connectivity, PresenceState, SubscriptionId, Topic};
use crate::registry::{ChangeHandler, RegistryError, SubscriptionInfo};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the coordinator.
pub type Response<T> = oneshot::Sender<Result<T, CoordinatorError>>;

/// A topic together with the handler that should hear about its changes.
pub type TopicBinding = (Topic, Arc<dyn ChangeHandler>);

/// Internal message type sent to the [`Coordinator`](super::Coordinator).
pub enum CoordinatorRequest {
    Activate {
        actor_id: ActorId,
        topics: Vec<TopicBinding>,
        respond_to: Response<ActivationReport>,
    },
    Reactivate {
        actor_id: ActorId,
        topics: Vec<TopicBinding>,
        respond_to: Response<ActivationReport>,
    },
    Deactivate {
        respond_to: Response<bool>,
    },
    Open {
        topic: Topic,
        handler: Arc<dyn ChangeHandler>,
        respond_to: Response<SubscriptionId>,
    },
    Close {
        topic: Topic,
        respond_to: Response<bool>,
    },
    /// Best-effort retract; nobody waits for an answer.
    HostClosing,
    SetConnectivity {
        connectivity: Connectivity,
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: Response<CoordinatorSnapshot>,
    },
    Shutdown {
        respond_to: Response<()>,
    },
}

/// Outcome of an activation. Failed topics do not fail the activation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationReport {
    pub actor_id: ActorId,
    /// Every topic that got a subscription, in the order given.
    pub opened: Vec<Topic>,
    /// Opened topics the transport has not created a channel for yet. They stay
    /// `Pending` and are asked for again on reconnect.
    pub unbound: Vec<Topic>,
    /// Topics that got no subscription at all, such as duplicates.
    pub failed: Vec<(Topic, RegistryError)>,
}

impl ActivationReport {
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            opened: Vec::new(),
            unbound: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.unbound.is_empty()
    }
}

/// Diagnostic view of the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSnapshot {
    /// Local presence; `None` outside a session.
    pub presence: Option<PresenceState>,
    pub connectivity: Connectivity,
    /// Open subscriptions in creation order.
    pub subscriptions: Vec<SubscriptionInfo>,
}

impl CoordinatorSnapshot {
    pub fn is_active(&self) -> bool {
        self.presence.is_some()
    }

    pub fn actor_id(&self) -> Option<&ActorId> {
        self.presence.as_ref().map(|presence| &presence.actor_id)
    }

    pub fn subscription(&self, topic: &str) -> Option<&SubscriptionInfo> {
        self.subscriptions
            .iter()
            .find(|subscription| subscription.topic.as_str() == topic)
    }
}
