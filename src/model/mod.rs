//! Plain data types shared by the presence reporter, the channel registry and the coordinator.

pub mod channel;
pub mod presence;

pub use channel::*;
pub use presence::*;
