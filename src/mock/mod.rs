//! # Test Doubles
//!
//! In-memory stand-ins for the coordinator's collaborators, shipped with the crate so
//! that host applications can test their own wiring without a live backend.
//!
//! | Double | Stands in for | Useful for |
//! |--------|---------------|------------|
//! | [`MockTransport`] | [`Transport`](crate::transport::Transport) | Recording subscribe/unsubscribe order, injecting acks, changes and failures |
//! | [`MockPresenceStore`] | [`PresenceStore`](crate::transport::PresenceStore) | Recording presence RPCs, injecting failures and latency |
//! | [`RecordingHandler`] | [`ChangeHandler`](crate::registry::ChangeHandler) | Asserting which topics were notified and how often |
//! | [`FailingHandler`], [`PanickingHandler`] | [`ChangeHandler`](crate::registry::ChangeHandler) | Checking handler isolation |
//!
//! All doubles are cheap to clone and every clone shares the same recorded state, so
//! a test keeps one clone for assertions and hands another to the coordinator.
//!
//! ```rust
//! use presence_coordinator::mock::{MockPresenceStore, MockTransport, RecordingHandler};
//! use presence_coordinator::lifecycle::{CoordinatorConfig, PresenceSystem};
//! use presence_coordinator::model::{ActorId, Topic};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = MockTransport::new();
//!     let store = MockPresenceStore::new();
//!     let system = PresenceSystem::new(
//!         CoordinatorConfig::default(),
//!         Arc::new(transport.clone()),
//!         Arc::new(store.clone()),
//!     );
//!
//!     let posts = RecordingHandler::new();
//!     system
//!         .coordinator
//!         .activate(ActorId::new("user-1"), vec![(Topic::new("posts"), posts.to_handler())])
//!         .await
//!         .unwrap();
//!
//!     transport.ack("posts");
//!     transport.emit("posts");
//!     system.coordinator.snapshot().await.unwrap();
//!     assert_eq!(posts.count(), 1);
//!
//!     system.shutdown().await.unwrap();
//!     assert_eq!(store.calls().len(), 2);
//! }
//! ```

pub mod handler;
pub mod store;
pub mod transport;

pub use handler::*;
pub use store::*;
pub use transport::*;
