use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the actor whose presence is reported.
///
/// Stable for the lifetime of one coordinator session. Switching actors is modelled
/// as a deactivate followed by a fresh activate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The current actor's visibility to other clients.
///
/// This is also the body of the presence RPC sent to the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceState {
    pub actor_id: ActorId,
    pub is_online: bool,
    /// Always `None` for now.
    pub status_message: Option<String>,
}

impl PresenceState {
    pub fn online(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            is_online: true,
            status_message: None,
        }
    }

    pub fn offline(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            is_online: false,
            status_message: None,
        }
    }
}

/// Connectivity as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        matches!(self, Connectivity::Online)
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Online => f.write_str("online"),
            Connectivity::Offline => f.write_str("offline"),
        }
    }
}
