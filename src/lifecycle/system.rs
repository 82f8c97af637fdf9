use crate::lifecycle::{
    Coordinator, CoordinatorClient, CoordinatorConfig, CoordinatorContext, CoordinatorError,
};
use crate::presence::{PresenceClient, PresenceReporter};
use crate::transport::{PresenceStore, Transport};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Runs a [`Coordinator`] and its [`PresenceReporter`] side by side.
///
/// `PresenceSystem` is responsible for:
/// - **Wiring**: the coordinator gets the transport and a presence client; the
///   reporter gets the presence store.
/// - **Lifecycle**: both actors are spawned on construction and stopped, in order,
///   by [`shutdown`](Self::shutdown).
///
/// # Example
///
/// ```ignore
/// let system = PresenceSystem::new(config, transport, store);
///
/// system.coordinator.activate(actor_id, topics).await?;
/// // ... live updates flow to the handlers ...
///
/// system.shutdown().await?;
/// ```
pub struct PresenceSystem {
    /// Client for driving the coordinator.
    pub coordinator: CoordinatorClient,

    /// Client for the presence reporter, mostly useful for [`PresenceClient::flush`].
    pub presence: PresenceClient,

    coordinator_handle: JoinHandle<()>,
    reporter_handle: JoinHandle<()>,
}

impl PresenceSystem {
    /// Spawns both actors. Must be called from within a Tokio runtime.
    pub fn new(
        config: CoordinatorConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn PresenceStore>,
    ) -> Self {
        let (reporter, presence) = PresenceReporter::new(
            config.presence_queue_capacity,
            config.presence_rpc_timeout(),
        );
        let (coordinator, client) = Coordinator::new(&config);

        let reporter_handle = tokio::spawn(reporter.run(store));
        let coordinator_handle = tokio::spawn(coordinator.run(CoordinatorContext {
            transport,
            presence: presence.clone(),
        }));

        Self {
            coordinator: client,
            presence,
            coordinator_handle,
            reporter_handle,
        }
    }

    /// Gracefully shuts down both actors.
    ///
    /// # Shutdown Process
    /// 1. The coordinator tears down the session (close all, then retract) and stops.
    /// 2. The presence reporter works through whatever is still queued, including
    ///    that final retract.
    /// 3. The reporter stops once the last presence client is gone.
    ///
    /// A reporter still blocked on a slow store delays step 2 by at most the
    /// configured RPC timeout per queued request.
    pub async fn shutdown(self) -> Result<(), CoordinatorError> {
        info!("Shutting down presence system...");

        // =====================================================================
        // Step 1: Stop the coordinator
        // =====================================================================

        if let Err(e) = self.coordinator.shutdown().await {
            warn!(error = %e, "Coordinator already stopped");
        }
        drop(self.coordinator);
        if let Err(e) = self.coordinator_handle.await {
            error!("Coordinator task failed: {:?}", e);
            return Err(CoordinatorError::TaskFailed(e.to_string()));
        }

        // =====================================================================
        // Step 2: Drain and stop the presence reporter
        // =====================================================================

        if let Err(e) = self.presence.flush().await {
            warn!(error = %e, "Presence reporter already stopped");
        }
        drop(self.presence);
        if let Err(e) = self.reporter_handle.await {
            error!("Presence reporter task failed: {:?}", e);
            return Err(CoordinatorError::TaskFailed(e.to_string()));
        }

        info!("Presence system shutdown complete.");
        Ok(())
    }
}
