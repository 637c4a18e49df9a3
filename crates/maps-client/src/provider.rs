//! Provider traits consumed by the app
//!
//! The app only ever talks to these traits. [`crate::MapsClient`] implements
//! the HTTP-backed ones; guidance and place search are supplied by the host's
//! navigation SDK.

use crate::{
    types::{Address, Coordinate, GuidanceUpdate, Route, RouteRequest, TravelMode},
    Result,
};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Turn-by-turn directions between two points
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Fetch the best route for a request
    async fn directions(&self, request: &RouteRequest) -> Result<Route>;
}

/// Coordinate to address lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Reverse geocode a coordinate; `Ok(None)` when nothing is there
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>>;
}

/// Keyword and proximity place lookup
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Autocomplete predictions for a keyword
    async fn autocomplete(&self, keyword: &str) -> Result<Vec<Address>>;

    /// The most likely place at a coordinate
    async fn nearby(&self, coordinate: Coordinate) -> Result<Option<Address>>;
}

/// Live guidance sessions
#[async_trait]
pub trait GuidanceProvider: Send + Sync {
    /// Start guiding toward a destination
    async fn start(&self, destination: Coordinate, mode: TravelMode) -> Result<GuidanceSession>;
}

/// A running guidance session
///
/// Updates arrive until the provider closes the channel or the session is
/// stopped. Dropping the session stops it.
#[derive(Debug)]
pub struct GuidanceSession {
    updates: mpsc::Receiver<GuidanceUpdate>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl GuidanceSession {
    /// Wrap the provider side of a session
    pub fn new(updates: mpsc::Receiver<GuidanceUpdate>, stop_tx: oneshot::Sender<()>) -> Self {
        Self {
            updates,
            stop_tx: Some(stop_tx),
        }
    }

    /// Create a session and the handles a provider drives it with
    pub fn channel(buffer: usize) -> (Self, mpsc::Sender<GuidanceUpdate>, oneshot::Receiver<()>) {
        let (update_tx, update_rx) = mpsc::channel(buffer);
        let (stop_tx, stop_rx) = oneshot::channel();
        (Self::new(update_rx, stop_tx), update_tx, stop_rx)
    }

    /// Wait for the next update; `None` once the session has ended
    pub async fn next_update(&mut self) -> Option<GuidanceUpdate> {
        self.updates.recv().await
    }

    /// Stop the session
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        self.updates.close();
    }
}

impl Drop for GuidanceSession {
    fn drop(&mut self) {
        self.stop();
    }
}
