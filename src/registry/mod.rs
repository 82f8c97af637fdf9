//! Channel Registry: the set of open topic subscriptions and the handler behind each.
//!
//! The registry is the only owner of transport channel handles. It is driven by the
//! coordinator's message loop, so `open`, `close`, `close_all` and `dispatch` never
//! interleave with each other.
//!
//! Delivery is at-least-once. A reconnect may replay several change events for a
//! single upstream mutation and the registry passes every one of them through;
//! handlers must tolerate redundant invalidations.

pub mod error;
pub mod handler;
pub mod core;
pub mod subscription;

pub use error::*;
pub use handler::*;
pub use self::core::*;
pub use subscription::*;
