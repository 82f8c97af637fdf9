use crate::model::{ChannelHandle, SubscriptionId, Topic};
use crate::transport::TransportError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Something the transport reported about one subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEventKind {
    /// The transport confirmed the subscription.
    Subscribed,
    /// The transport could not (re)establish the subscription. Retrying is up to it.
    Rejected(String),
    /// Something changed on the topic.
    Changed { occurred_at: DateTime<Utc> },
}

/// An event routed back to the registry that opened the subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub subscription: SubscriptionId,
    pub topic: Topic,
    pub kind: TransportEventKind,
}

/// Delivery end handed to the transport for one subscription.
///
/// A sink is bound to the subscription it was created for. Once that subscription
/// closes, anything pushed through the sink is discarded by the registry, so the
/// transport may keep a stale sink around without risk.
///
/// All methods are synchronous and never block; they return `false` once the
/// coordinator that owns the subscription has shut down.
#[derive(Debug, Clone)]
pub struct EventSink {
    subscription: SubscriptionId,
    topic: Topic,
    sender: mpsc::UnboundedSender<TransportEvent>,
}

impl EventSink {
    pub(crate) fn new(
        subscription: SubscriptionId,
        topic: Topic,
        sender: mpsc::UnboundedSender<TransportEvent>,
    ) -> Self {
        Self {
            subscription,
            topic,
            sender,
        }
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Confirms the subscription (`Pending -> Active`).
    pub fn acknowledge(&self) -> bool {
        self.push(TransportEventKind::Subscribed)
    }

    /// Reports that the subscription could not be established.
    pub fn reject(&self, reason: impl Into<String>) -> bool {
        self.push(TransportEventKind::Rejected(reason.into()))
    }

    /// Reports a change committed upstream at `occurred_at`.
    pub fn changed(&self, occurred_at: DateTime<Utc>) -> bool {
        self.push(TransportEventKind::Changed { occurred_at })
    }

    /// Reports a change stamped with the current time.
    pub fn changed_now(&self) -> bool {
        self.changed(Utc::now())
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn push(&self, kind: TransportEventKind) -> bool {
        self.sender
            .send(TransportEvent {
                subscription: self.subscription,
                topic: self.topic.clone(),
                kind,
            })
            .is_ok()
    }
}

/// An already-connected publish/subscribe transport.
///
/// `subscribe` only creates the channel; the acknowledgement arrives later through
/// the sink. Reconnecting after a network blip is the transport's job, and a full
/// resync after reconnect may replay several `changed` calls for one mutation.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn subscribe(&self, topic: &Topic, sink: EventSink)
        -> Result<ChannelHandle, TransportError>;

    async fn unsubscribe(&self, handle: ChannelHandle) -> Result<(), TransportError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_tags_events_with_its_subscription() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let sink = EventSink::new(SubscriptionId(7), Topic::new("posts"), sender);

        assert!(sink.acknowledge());
        assert!(sink.reject("quota"));

        let ack = receiver.try_recv().unwrap();
        assert_eq!(ack.subscription, SubscriptionId(7));
        assert_eq!(ack.topic, Topic::new("posts"));
        assert_eq!(ack.kind, TransportEventKind::Subscribed);

        let rejected = receiver.try_recv().unwrap();
        assert_eq!(rejected.kind, TransportEventKind::Rejected("quota".into()));
    }

    #[test]
    fn sink_reports_closed_receiver() {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink = EventSink::new(SubscriptionId(1), Topic::new("comments"), sender);
        drop(receiver);

        assert!(sink.is_closed());
        assert!(!sink.changed_now());
    }
}
