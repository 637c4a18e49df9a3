//! Guidance session state
//!
//! Reactive state for a running turn-by-turn session: the current and
//! remaining steps, remaining distance and time, the ETA and the last status.
//! Views subscribe through watch channels; one-shot reactions (vibrate on a
//! new step, show an error) use the event broadcast.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use maps_client::{Coordinate, GuidanceStep, GuidanceUpdate, RouteStatus, TravelMode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, RwLock};
use tracing::debug;

/// Distance and time left until the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingProgress {
    /// Meters left
    pub distance_meters: f64,
    /// Seconds left
    pub time_seconds: f64,
    /// Estimated arrival
    pub eta: DateTime<Utc>,
}

/// Events broadcast when the session changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum GuidanceEvent {
    /// A session began
    Started {
        /// Target of the session
        destination: Coordinate,
        /// Travel mode of the session
        mode: TravelMode,
    },
    /// The current step changed
    StepChanged(GuidanceStep),
    /// The provider reported a status
    StatusChanged(RouteStatus),
    /// The session ended and its state was cleared
    Stopped,
}

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceState {
    /// Target of the running session
    pub destination: Option<Coordinate>,
    /// Travel mode of the running session
    pub mode: TravelMode,
    /// The step the user is on
    pub current_step: Option<GuidanceStep>,
    /// Steps after the current one
    pub remaining_steps: Vec<GuidanceStep>,
    /// Distance, time and ETA
    pub remaining: Option<RemainingProgress>,
    /// Last reported status; kept after the session stops
    pub status: Option<RouteStatus>,
}

impl GuidanceState {
    /// Whether a session is running
    pub fn is_active(&self) -> bool {
        self.destination.is_some()
    }
}

/// Tracker for the guidance session
pub struct GuidanceTracker {
    state: Arc<RwLock<GuidanceState>>,
    step_tx: watch::Sender<Option<GuidanceStep>>,
    remaining_tx: watch::Sender<Option<RemainingProgress>>,
    events_tx: broadcast::Sender<GuidanceEvent>,
}

impl GuidanceTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        let (step_tx, _) = watch::channel(None);
        let (remaining_tx, _) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(16);

        GuidanceTracker {
            state: Arc::new(RwLock::new(GuidanceState::default())),
            step_tx,
            remaining_tx,
            events_tx,
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> GuidanceState {
        self.state.read().await.clone()
    }

    /// Mark a session as started
    pub async fn begin(&self, destination: Coordinate, mode: TravelMode) {
        let mut state = self.state.write().await;
        *state = GuidanceState {
            destination: Some(destination),
            mode,
            ..Default::default()
        };
        drop(state);

        debug!("guidance started toward {}", destination);
        let _ = self.step_tx.send(None);
        let _ = self.remaining_tx.send(None);
        let _ = self
            .events_tx
            .send(GuidanceEvent::Started { destination, mode });
    }

    /// Record the provider's status
    pub async fn set_status(&self, status: RouteStatus) {
        let mut state = self.state.write().await;
        if state.status == Some(status) {
            return;
        }
        state.status = Some(status);
        drop(state);

        let _ = self.events_tx.send(GuidanceEvent::StatusChanged(status));
    }

    /// Apply an update pushed by the provider
    pub async fn apply_update(&self, update: GuidanceUpdate) {
        let remaining = RemainingProgress {
            distance_meters: update.remaining_distance_meters.max(0.0),
            time_seconds: update.remaining_time_seconds.max(0.0),
            eta: Utc::now()
                + ChronoDuration::milliseconds(
                    (update.remaining_time_seconds.max(0.0) * 1000.0) as i64,
                ),
        };

        let mut state = self.state.write().await;
        if !state.is_active() {
            debug!("dropping guidance update for a stopped session");
            return;
        }
        let step_changed = state.current_step != update.current_step;
        state.current_step = update.current_step.clone();
        state.remaining_steps = update.remaining_steps;
        state.remaining = Some(remaining.clone());
        drop(state);

        let _ = self.remaining_tx.send(Some(remaining));
        if step_changed {
            let _ = self.step_tx.send(update.current_step.clone());
            if let Some(step) = update.current_step {
                let _ = self.events_tx.send(GuidanceEvent::StepChanged(step));
            }
        }
    }

    /// Clear the session; the last status is kept
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        let was_active = state.is_active();
        let status = state.status;
        *state = GuidanceState {
            status,
            ..Default::default()
        };
        drop(state);

        let _ = self.step_tx.send(None);
        let _ = self.remaining_tx.send(None);
        if was_active {
            debug!("guidance stopped");
            let _ = self.events_tx.send(GuidanceEvent::Stopped);
        }
    }

    /// Subscribe to current step changes
    pub fn subscribe_step(&self) -> watch::Receiver<Option<GuidanceStep>> {
        self.step_tx.subscribe()
    }

    /// Subscribe to remaining distance and time
    pub fn subscribe_remaining(&self) -> watch::Receiver<Option<RemainingProgress>> {
        self.remaining_tx.subscribe()
    }

    /// Subscribe to all guidance events
    pub fn subscribe_events(&self) -> broadcast::Receiver<GuidanceEvent> {
        self.events_tx.subscribe()
    }
}

impl Default for GuidanceTracker {
    fn default() -> Self {
        Self::new()
    }
}
