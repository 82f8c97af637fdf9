//! # Observability & Tracing
//!
//! The coordinator logs through `tracing` with structured fields rather than
//! formatted strings, so output can be filtered per topic or per actor.
//!
//! ## What Gets Traced
//!
//! | Level | Events |
//! |-------|--------|
//! | `info` | Coordinator start/stop, activation, deactivation, subscriptions opened/activated/closed, presence reported, connectivity changes |
//! | `debug` | Every routed change event, skipped presence updates, ignored no-op calls |
//! | `warn` | Isolated failures: subscribe/unsubscribe, presence RPC, handler errors, dropped queue entries |
//! | `error` | Handler panics, background task failures |
//!
//! Common fields: `actor_id`, `topic`, `subscription`, `handle`, `state`, `error`.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run                                  # lifecycle only
//! RUST_LOG=debug cargo run                                 # every event
//! RUST_LOG=presence_coordinator::registry=debug cargo run  # routing only
//! ```
//!
//! A typical session at `info`:
//!
//! ```text
//! INFO Coordinator started transport="mock"
//! INFO activate: Activating actor_id=user-1 topics=2
//! INFO Presence reported actor_id=user-1 is_online=true
//! INFO activate: Opened topic=posts subscription=sub_1 handle=chan_1 size=1
//! INFO activate: Opened topic=comments subscription=sub_2 handle=chan_2 size=2
//! INFO Active topic=posts subscription=sub_1
//! INFO deactivate: Closed topic=comments subscription=sub_2 delivered=0 size=1
//! INFO deactivate: Closed topic=posts subscription=sub_1 delivered=3 size=0
//! INFO Presence reported actor_id=user-1 is_online=false
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already installed.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns `false` instead of panicking when a
/// subscriber is already installed (handy in tests).
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported_not_panicking() {
        try_setup_tracing();
        assert!(!try_setup_tracing());
    }
}
