//! # Session Lifecycle & Orchestration
//!
//! This module holds the Lifecycle Coordinator: the component that ties presence and
//! live-update subscriptions to the host's idea of a session.
//!
//! ## Activation and Teardown
//!
//! ```text
//! activate(actor, topics)              deactivate()
//!   1. announce presence                 1. close_all (last opened, first closed)
//!   2. open every topic                  2. retract presence
//! ```
//!
//! Teardown mirrors setup, and presence is retracted only after the last handler
//! has become unreachable. `deactivate` is idempotent; a second call does nothing.
//! Switching actors is a `deactivate` followed by a fresh `activate`
//! ([`CoordinatorClient::reactivate`] does both as one step).
//!
//! ## Host Signals
//!
//! - **Host closing**: a best-effort retract, fire-and-forget. There is no guarantee
//!   it reaches the store before the process goes away.
//! - **Network online/offline**: updates the connectivity flag and the local
//!   presence view. Going online re-announces presence and asks the transport again
//!   for any subscription it refused to create. Channels it did create are left to
//!   it, since it owns reconnection.
//!
//! ## Failure Policy
//!
//! Presence is advisory and live updates are an enhancement. Failed presence RPCs,
//! failed subscribes and failing handlers are logged and isolated; none of them
//! fails `activate` or `deactivate`. A topic whose subscribe failed stays `Pending`.
//!
//! ## Wiring
//!
//! [`PresenceSystem`] spawns the coordinator and the presence reporter with their
//! dependencies injected, and shuts both down in order. [`setup_tracing`] installs
//! the log subscriber.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod message;
pub mod system;
pub mod tracing;

pub use client::*;
pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use message::*;
pub use system::*;
pub use self::tracing::*;
