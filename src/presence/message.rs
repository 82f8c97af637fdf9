use crate::model::ActorId;
use tokio::sync::oneshot;

/// Internal message type sent to the [`PresenceReporter`](super::PresenceReporter).
#[derive(Debug)]
pub enum PresenceRequest {
    Announce { actor_id: ActorId },
    Retract { actor_id: ActorId },
    /// Forgets the confirmed state so the next request for the actor always goes out.
    Invalidate { actor_id: ActorId },
    /// Answered once every request queued before it has been processed.
    Flush { respond_to: oneshot::Sender<()> },
}
