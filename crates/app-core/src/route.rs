//! Route preview between the user's location and the destination

use crate::format::RouteSummary;
use maps_client::{
    Coordinate, CoordinateBounds, DirectionsProvider, Route, RouteRequest, RouteStatus,
    TravelMode,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// A route ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    /// The provider's route
    pub route: Route,
    /// Decoded overview path
    pub path: Vec<Coordinate>,
    /// Box to fit the camera to
    pub bounds: Option<CoordinateBounds>,
    /// Split distance and duration
    pub summary: RouteSummary,
}

/// What the map should do after a refresh
#[derive(Debug, Clone, PartialEq)]
pub enum RouteUpdate {
    /// Draw this route and show its summary
    Drawn(RouteOverlay),
    /// Remove any drawn route and blank the summary
    Cleared,
}

/// Plans the previewed route
pub struct RoutePlanner {
    directions: Arc<dyn DirectionsProvider>,
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
    mode: TravelMode,
    current: Option<RouteOverlay>,
    last_status: Option<RouteStatus>,
}

impl RoutePlanner {
    /// Create a planner with no endpoints
    pub fn new(directions: Arc<dyn DirectionsProvider>) -> Self {
        Self {
            directions,
            origin: None,
            destination: None,
            mode: TravelMode::default(),
            current: None,
            last_status: None,
        }
    }

    /// Start point
    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    /// Set the start point
    pub fn set_origin(&mut self, origin: Option<Coordinate>) {
        self.origin = origin;
    }

    /// End point
    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    /// Set the end point
    pub fn set_destination(&mut self, destination: Option<Coordinate>) {
        self.destination = destination;
    }

    /// Travel mode
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Set the travel mode
    pub fn set_mode(&mut self, mode: TravelMode) {
        self.mode = mode;
    }

    /// The route currently drawn
    pub fn current(&self) -> Option<&RouteOverlay> {
        self.current.as_ref()
    }

    /// Status of the last directions lookup
    pub fn last_status(&self) -> Option<RouteStatus> {
        self.last_status
    }

    /// Fetch the route for the current endpoints and mode
    ///
    /// A missing endpoint or a failed lookup clears the route.
    pub async fn refresh(&mut self) -> RouteUpdate {
        let (Some(origin), Some(destination)) = (self.origin, self.destination) else {
            self.current = None;
            return RouteUpdate::Cleared;
        };

        let request = RouteRequest {
            origin,
            destination,
            mode: self.mode,
        };

        match self.fetch(&request).await {
            Ok(overlay) => {
                debug!(
                    "route drawn: {} m, {} s",
                    overlay.route.distance_meters, overlay.route.duration_seconds
                );
                self.last_status = Some(RouteStatus::Ok);
                self.current = Some(overlay.clone());
                RouteUpdate::Drawn(overlay)
            }
            Err(e) => {
                warn!("Directions lookup failed: {}", e);
                self.last_status = Some(e.status());
                self.current = None;
                RouteUpdate::Cleared
            }
        }
    }

    async fn fetch(&self, request: &RouteRequest) -> maps_client::Result<RouteOverlay> {
        let route = self.directions.directions(request).await?;
        let path = route.path()?;

        Ok(RouteOverlay {
            bounds: CoordinateBounds::from_path(&path),
            summary: RouteSummary::from_route(&route),
            route,
            path,
        })
    }
}
