//! Presence Reporter: announces and retracts the current actor's online state.
//!
//! The reporter is its own actor so that the coordinator can hand off a presence
//! change and move on. Requests are applied in FIFO order, which keeps an announce
//! ahead of the retract that follows it, but the caller never waits for the RPC.
//!
//! Presence is best-effort. A failed RPC is logged and dropped; nothing is retried
//! until the next lifecycle transition asks for the same state again.

pub mod error;
pub mod message;
pub mod reporter;

pub use error::*;
pub use message::*;
pub use reporter::*;
