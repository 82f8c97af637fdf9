use presence_coordinator::lifecycle::{CoordinatorConfig, CoordinatorError, PresenceSystem};
use presence_coordinator::mock::{
    FailingHandler, MockPresenceStore, MockTransport, RecordingHandler, TransportCall,
};
use presence_coordinator::model::{ActorId, PresenceState, Topic};
use presence_coordinator::registry::ChangeHandler;
use std::sync::Arc;
use std::time::Duration;

/// Full end-to-end session through the `PresenceSystem` orchestrator.
#[tokio::test]
async fn test_full_session_lifecycle() {
    let transport = MockTransport::auto_ack();
    let store = MockPresenceStore::new();
    let system = PresenceSystem::new(
        CoordinatorConfig::default(),
        Arc::new(transport.clone()),
        Arc::new(store.clone()),
    );

    let posts = RecordingHandler::new();
    let comments = RecordingHandler::new();
    let notifications = FailingHandler::new("cache unavailable");
    let notifications_handler: Arc<dyn ChangeHandler> = Arc::new(notifications.clone());

    // Start the session
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
        .expect("Failed to activate");
    assert!(report.is_complete());

    // Live updates, including a resync burst and a failing handler
    transport.emit("posts");
    transport.emit("notifications");
    for _ in 0..3 {
        transport.emit("comments");
    }

    let snapshot = system
        .coordinator
        .snapshot()
        .await
        .expect("Failed to snapshot");
    assert_eq!(posts.count(), 1);
    assert_eq!(comments.count(), 3);
    assert_eq!(notifications.attempts(), 1);
    assert_eq!(snapshot.subscriptions.len(), 3);
    assert_eq!(snapshot.actor_id(), Some(&ActorId::new("user-1")));

    // Add one more topic mid-session
    let likes = RecordingHandler::new();
    system
        .coordinator
        .open(Topic::new("likes"), likes.to_handler())
        .await
        .expect("Failed to open");
    transport.emit("likes");

    // End the session
    assert!(system.coordinator.deactivate().await.unwrap());
    assert_eq!(likes.count(), 1);
    assert_eq!(
        transport.unsubscribed(),
        vec![
            Topic::new("likes"),
            Topic::new("notifications"),
            Topic::new("comments"),
            Topic::new("posts"),
        ]
    );

    system.shutdown().await.expect("Failed to shut down");

    assert_eq!(
        store.calls(),
        vec![
            PresenceState::online(ActorId::new("user-1")),
            PresenceState::offline(ActorId::new("user-1")),
        ]
    );
}

/// Shutting down with a session still running tears it down first.
#[tokio::test]
async fn test_shutdown_tears_down_running_session() {
    let transport = MockTransport::new();
    let store = MockPresenceStore::new();
    let system = PresenceSystem::new(
        CoordinatorConfig::default(),
        Arc::new(transport.clone()),
        Arc::new(store.clone()),
    );
    let other = system.coordinator.clone();

    let handler = RecordingHandler::new();
    system
        .coordinator
        .activate(
            ActorId::new("user-1"),
            vec![
                (Topic::new("a"), handler.to_handler()),
                (Topic::new("b"), handler.to_handler()),
            ],
        )
        .await
        .unwrap();

    system.shutdown().await.unwrap();

    assert_eq!(
        transport.calls(),
        vec![
            TransportCall::Subscribe(Topic::new("a")),
            TransportCall::Subscribe(Topic::new("b")),
            TransportCall::Unsubscribe(Topic::new("b")),
            TransportCall::Unsubscribe(Topic::new("a")),
        ]
    );
    // The retract queued during teardown was drained before the reporter stopped.
    assert_eq!(store.online_flags(), vec![true, false]);
    assert_eq!(other.deactivate().await, Err(CoordinatorError::ActorClosed));
}

/// A slow store delays neither activation nor teardown.
#[tokio::test]
async fn test_slow_presence_store_does_not_block_session() {
    let transport = MockTransport::auto_ack();
    let store = MockPresenceStore::new();
    store.set_delay(Duration::from_millis(200));
    let config = CoordinatorConfig {
        presence_rpc_timeout_ms: 50,
        ..CoordinatorConfig::default()
    };
    let system = PresenceSystem::new(
        config,
        Arc::new(transport.clone()),
        Arc::new(store.clone()),
    );

    let posts = RecordingHandler::new();
    let activated = tokio::time::timeout(
        Duration::from_millis(100),
        system
            .coordinator
            .activate(ActorId::new("user-1"), vec![(Topic::new("posts"), posts.to_handler())]),
    )
    .await;
    assert!(activated.is_ok(), "activate waited for the presence store");

    transport.emit("posts");
    system.coordinator.snapshot().await.unwrap();
    assert_eq!(posts.count(), 1);

    system.shutdown().await.unwrap();
    // Both RPCs were issued; each timed out on the coordinator's budget.
    assert_eq!(store.online_flags(), vec![true, false]);
}

/// Two sessions back to back against the same system.
#[tokio::test]
async fn test_sessions_can_be_repeated() {
    let transport = MockTransport::auto_ack();
    let store = MockPresenceStore::new();
    let system = PresenceSystem::new(
        CoordinatorConfig::default(),
        Arc::new(transport.clone()),
        Arc::new(store.clone()),
    );
    let posts = RecordingHandler::new();

    for _ in 0..2 {
        system
            .coordinator
            .activate(ActorId::new("user-1"), vec![(Topic::new("posts"), posts.to_handler())])
            .await
            .unwrap();
        transport.emit("posts");
        system.coordinator.deactivate().await.unwrap();
    }

    system.shutdown().await.unwrap();
    assert_eq!(posts.count(), 2);
    assert_eq!(store.online_flags(), vec![true, false, true, false]);
}
