//! Error types for the Presence Reporter.

use crate::transport::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while reporting presence.
///
/// None of these ever reach host code through the coordinator; they are logged
/// where they occur.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PresenceError {
    /// The reporter's queue is full; the request was dropped.
    #[error("Presence queue full")]
    QueueFull,

    /// The reporter task has stopped.
    #[error("Presence reporter closed")]
    ReporterClosed,

    /// The reporter stopped before answering.
    #[error("Presence reporter dropped response channel")]
    ReporterDropped,

    /// The store answered with a failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store did not answer in time.
    #[error("Presence RPC timed out after {0:?}")]
    Timeout(Duration),
}
