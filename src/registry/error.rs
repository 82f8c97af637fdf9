//! Error types for the Channel Registry.

use crate::model::Topic;
use thiserror::Error;

/// Errors that can occur while opening a subscription.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    /// A subscription for this topic is already open.
    #[error("Topic already open: {0}")]
    AlreadyOpen(Topic),
}
