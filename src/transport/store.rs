use crate::model::PresenceState;
use crate::transport::StoreError;
use async_trait::async_trait;

/// The remote presence row owned by the external store.
///
/// One idempotent call: writing the same state twice has the same effect as once.
/// Only success or failure is consumed.
#[async_trait]
pub trait PresenceStore: Send + Sync + 'static {
    async fn set_presence(&self, state: &PresenceState) -> Result<(), StoreError>;
}
