//! Simulated session against the in-memory transport and presence store.
//!
//! Shows the full lifecycle: activation, a few change events (including a failing
//! handler and a resync burst), a connectivity blip, and teardown.

use presence_coordinator::lifecycle::{setup_tracing, CoordinatorConfig, PresenceSystem};
use presence_coordinator::mock::{FailingHandler, MockPresenceStore, MockTransport, RecordingHandler};
use presence_coordinator::model::{ActorId, Connectivity, Topic};
use presence_coordinator::registry::ChangeHandler;
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let transport = MockTransport::auto_ack();
    let store = MockPresenceStore::new();
    let system = PresenceSystem::new(
        CoordinatorConfig::default(),
        Arc::new(transport.clone()),
        Arc::new(store.clone()),
    );

    let posts = RecordingHandler::new();
    let comments = RecordingHandler::new();
    let notifications = FailingHandler::new("notification cache unavailable");
    let notifications_handler: Arc<dyn ChangeHandler> = Arc::new(notifications.clone());

    let span = tracing::info_span!("session", actor_id = "user-1");
    async {
        let report = system
            .coordinator
            .activate(
                ActorId::new("user-1"),
                vec![
                    (Topic::new("posts"), posts.to_handler()),
                    (Topic::new("comments"), comments.to_handler()),
                    (Topic::new("notifications"), notifications_handler),
                ],
            )
            .await
            .map_err(|e| e.to_string())?;
        info!(opened = report.opened.len(), "Session started");

        transport.emit("posts");
        transport.emit("notifications");

        // A reconnect replays the current state as a burst of changes.
        system
            .coordinator
            .set_connectivity(Connectivity::Offline)
            .await
            .map_err(|e| e.to_string())?;
        system
            .coordinator
            .set_connectivity(Connectivity::Online)
            .await
            .map_err(|e| e.to_string())?;
        for _ in 0..3 {
            transport.emit("comments");
        }

        let snapshot = system.coordinator.snapshot().await.map_err(|e| e.to_string())?;
        for subscription in &snapshot.subscriptions {
            info!(
                topic = %subscription.topic,
                state = %subscription.state,
                delivered = subscription.delivered,
                "Subscription"
            );
        }

        system.coordinator.deactivate().await.map_err(|e| e.to_string())?;
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!(
        posts = posts.count(),
        comments = comments.count(),
        notification_failures = notifications.attempts(),
        presence_rpcs = store.calls().len(),
        "Demo completed"
    );
    Ok(())
}
