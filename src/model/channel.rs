use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical resource identifier a subscription is scoped to (e.g. `"posts"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Registry-local identity of one subscription.
///
/// Never reused: reopening a topic after a close yields a new id, so events still in
/// flight for the old subscription cannot reach the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

/// Opaque handle the transport returns for an open channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle(pub u64);

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chan_{}", self.0)
    }
}

/// `Pending --(ack)--> Active --(close)--> Closed`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    Pending,
    Active,
    Closed,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionState::Pending => f.write_str("pending"),
            SubscriptionState::Active => f.write_str("active"),
            SubscriptionState::Closed => f.write_str("closed"),
        }
    }
}

/// A coalesced invalidation: something changed on `topic`.
///
/// Carries no payload. Receivers re-fetch whatever they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub topic: Topic,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(topic: Topic, occurred_at: DateTime<Utc>) -> Self {
        Self { topic, occurred_at }
    }
}
