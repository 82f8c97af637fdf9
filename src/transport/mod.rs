//! Boundaries to the external collaborators: the publish/subscribe transport and the
//! presence store.
//!
//! The coordinator never manages connection establishment, retries or wire framing.
//! It only needs the two traits defined here, which keeps it testable against the
//! doubles in [`crate::mock`].

pub mod channel;
pub mod error;
pub mod store;

pub use channel::*;
pub use error::*;
pub use store::*;
