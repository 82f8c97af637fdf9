//! Error types reported by the external collaborators.

use thiserror::Error;

/// Failures reported by a [`Transport`](super::Transport) implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The transport refused to create a channel for the topic.
    #[error("Subscribe rejected for topic {topic}: {reason}")]
    Rejected { topic: String, reason: String },

    /// The underlying connection is gone.
    #[error("Transport disconnected")]
    Disconnected,

    /// The channel handle is not known to the transport.
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
}

/// Failures reported by a [`PresenceStore`](super::PresenceStore) implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The remote call was delivered but failed.
    #[error("Presence RPC failed: {0}")]
    Rpc(String),

    /// The store could not be reached.
    #[error("Presence store unreachable")]
    Unreachable,
}
