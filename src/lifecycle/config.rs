//! Tunables for the coordinator and the presence reporter.

use crate::model::Connectivity;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coordinator configuration.
///
/// Every field has a default, so a host can embed this in its own config file and
/// only spell out what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Capacity of the coordinator's command inbox.
    pub inbox_capacity: usize,
    /// Capacity of the presence reporter's queue. Overflowing requests are dropped.
    pub presence_queue_capacity: usize,
    /// Upper bound on a single presence RPC.
    pub presence_rpc_timeout_ms: u64,
    /// Connectivity assumed until the host reports otherwise.
    pub initial_connectivity: Connectivity,
    /// Announce presence again when the host comes back online during a session.
    pub reannounce_on_reconnect: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: 32,
            presence_queue_capacity: 64,
            presence_rpc_timeout_ms: 5_000,
            initial_connectivity: Connectivity::Online,
            reannounce_on_reconnect: true,
        }
    }
}

impl CoordinatorConfig {
    pub fn presence_rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.presence_rpc_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: CoordinatorConfig = serde_json::from_str(
            r#"{ "presence_rpc_timeout_ms": 250, "initial_connectivity": "offline" }"#,
        )
        .unwrap();

        assert_eq!(config.presence_rpc_timeout(), Duration::from_millis(250));
        assert_eq!(config.initial_connectivity, Connectivity::Offline);
        assert_eq!(config.inbox_capacity, 32);
        assert_eq!(config.presence_queue_capacity, 64);
        assert!(config.reannounce_on_reconnect);
    }

    #[test]
    fn empty_config_is_default() {
        let config: CoordinatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CoordinatorConfig::default());
    }
}
