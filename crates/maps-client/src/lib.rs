//! Maps provider client for Wayfinder
//!
//! This crate holds the value types shared across the workspace (coordinates,
//! addresses, travel modes, routes), the narrow provider traits the app talks
//! to, and an HTTP client for the directions and geocoding web services.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod polyline;
pub mod provider;
pub mod types;

pub use client::{MapsClient, MapsClientConfig};
pub use provider::{DirectionsProvider, Geocoder, GuidanceProvider, GuidanceSession, PlaceSearch};
pub use types::{
    Address, Coordinate, CoordinateBounds, GuidanceStep, GuidanceUpdate, ManeuverKind, Route,
    RouteRequest, RouteStatus, SavedAddress, TravelMode,
};

/// Result type for maps provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for maps provider operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider found no route between the endpoints
    #[error("No route found")]
    NoRouteFound,

    /// The API key ran out of quota
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// API error with provider status and message
    #[error("API error ({status}): {message}")]
    Api {
        /// Provider status string or HTTP status code
        status: String,
        /// Error message from server
        message: String,
    },

    /// The provider session ended unexpectedly
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error onto the status reported to the user
    pub fn status(&self) -> RouteStatus {
        match self {
            Error::Network(_) => RouteStatus::NetworkError,
            Error::NoRouteFound => RouteStatus::NoRouteFound,
            Error::QuotaExceeded(_) => RouteStatus::QuotaExceeded,
            Error::Json(_) | Error::InvalidInput(_) | Error::Api { .. } | Error::Internal(_) => {
                RouteStatus::InternalError
            }
        }
    }
}
