//! Error types for the Lifecycle Coordinator.

use crate::model::ActorId;
use crate::registry::RegistryError;
use thiserror::Error;

/// Errors returned by [`CoordinatorClient`](super::CoordinatorClient).
///
/// Only channel failures and API misuse show up here, plus the outcome of an
/// explicit single-topic `open`. Presence and handler failures are logged inside
/// the coordinator and never returned, and per-topic failures during `activate` are
/// reported in the [`ActivationReport`](super::ActivationReport) instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinatorError {
    #[error("Coordinator closed")]
    ActorClosed,

    #[error("Coordinator dropped response channel")]
    ActorDropped,

    #[error("Coordinator inbox full")]
    InboxFull,

    /// `activate` was called while a session is running.
    #[error("Coordinator already active for actor {0}")]
    AlreadyActive(ActorId),

    /// The operation needs an active session.
    #[error("Coordinator is not active")]
    NotActive,

    /// A single-topic `open` failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A background task panicked or was cancelled.
    #[error("Task failed: {0}")]
    TaskFailed(String),
}
