//! # Presence Coordinator
//!
//! > **Client-side presence and live-update coordination on top of a publish/subscribe transport.**
//!
//! This crate is the piece of a client application that keeps the current actor's
//! online presence in a shared store and keeps a handful of live-update
//! subscriptions open while a session is running. When the session ends, everything
//! is torn down in a fixed order, whatever happened in between.
//!
//! ## 🚀 Core Concepts
//!
//! ### Topics and Coalesced Invalidation
//! A subscription is scoped to a [`Topic`](model::Topic) such as `"posts"`. The
//! handler behind it is told *that* something changed, never *what*: a
//! [`ChangeEvent`](model::ChangeEvent) carries only the topic and a timestamp.
//! Delivery is at-least-once, so handlers must tolerate repeats.
//!
//! ### Presence
//! A small `{actor_id, is_online, status_message}` row in an external store. It is
//! advisory: failures are logged and swallowed, and the coordinator never waits
//! for the store.
//!
//! ### Deterministic Teardown
//! `deactivate` closes subscriptions last-opened-first and only then retracts
//! presence. Once a subscription is closed, nothing the transport still has in
//! flight can reach its handler.
//!
//! ## 🏗️ Architecture Notes
//!
//! ### 1. Actors, not locks
//! The [`Coordinator`](lifecycle::Coordinator) and the
//! [`PresenceReporter`](presence::PresenceReporter) each run in their own Tokio task
//! and process one message at a time. The coordinator exclusively owns the channel
//! registry, so subscription bookkeeping needs no `Mutex`.
//!
//! ### 2. Injected collaborators
//! The transport and the presence store are traits
//! ([`Transport`](transport::Transport), [`PresenceStore`](transport::PresenceStore))
//! passed in at start-up. There is no global connection, and tests run against the
//! doubles in [`mock`].
//!
//! ### 3. Observability
//! Everything is logged with `tracing` using structured fields. See
//! [`lifecycle::tracing`] for what is logged at which level.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: plain data types.
//! - [`transport`]: the boundary traits for the transport and the presence store.
//! - [`presence`]: the Presence Reporter actor.
//! - [`registry`]: the Channel Registry and the [`ChangeHandler`](registry::ChangeHandler) trait.
//! - [`lifecycle`]: the Lifecycle Coordinator, its client, config and the [`PresenceSystem`](lifecycle::PresenceSystem) orchestrator.
//! - [`mock`]: test doubles.
//!
//! ## ▶️ Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod lifecycle;
pub mod mock;
pub mod model;
pub mod presence;
pub mod registry;
pub mod transport;
