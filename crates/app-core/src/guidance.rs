//! Guidance session control
//!
//! Starts sessions on the provider and pumps their updates into the shared
//! [`GuidanceTracker`].

use app_state::GuidanceTracker;
use maps_client::{Coordinate, GuidanceProvider, RouteStatus, TravelMode};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owns at most one running guidance session
pub struct GuidanceController {
    provider: Arc<dyn GuidanceProvider>,
    tracker: Arc<GuidanceTracker>,
    pump: Option<JoinHandle<()>>,
}

impl GuidanceController {
    /// Create an idle controller
    pub fn new(provider: Arc<dyn GuidanceProvider>, tracker: Arc<GuidanceTracker>) -> Self {
        Self {
            provider,
            tracker,
            pump: None,
        }
    }

    /// Tracker the session state is published on
    pub fn tracker(&self) -> &Arc<GuidanceTracker> {
        &self.tracker
    }

    /// Whether a session is being pumped
    pub fn is_running(&self) -> bool {
        self.pump.as_ref().is_some_and(|pump| !pump.is_finished())
    }

    /// Start guiding, replacing any running session
    ///
    /// A non-Ok status stops the session again and is left on the tracker.
    pub async fn start(&mut self, destination: Coordinate, mode: TravelMode) -> RouteStatus {
        self.stop().await;
        self.tracker.begin(destination, mode).await;

        let mut session = match self.provider.start(destination, mode).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Guidance failed to start: {}", e);
                let status = e.status();
                self.tracker.set_status(status).await;
                self.tracker.stop().await;
                return status;
            }
        };

        self.tracker.set_status(RouteStatus::Ok).await;

        let tracker = Arc::clone(&self.tracker);
        self.pump = Some(tokio::spawn(async move {
            while let Some(update) = session.next_update().await {
                tracker.apply_update(update).await;
            }
            debug!("guidance session ended by provider");
            tracker.stop().await;
        }));

        RouteStatus::Ok
    }

    /// Stop the session and clear its state
    pub async fn stop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        self.tracker.stop().await;
    }
}

impl Drop for GuidanceController {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}
