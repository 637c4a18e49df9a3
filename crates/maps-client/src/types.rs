//! Value types shared by the maps provider and the app
//!
//! Everything here is serialized with camelCase field names so that persisted
//! addresses keep the `{primaryText, secondaryText, coordinate:{latitude,
//! longitude}}` shape.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Coordinate
// =============================================================================

/// A WGS84 latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within their ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Formats as `lat,lon`, the form the web APIs take in query strings
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Smallest box containing a set of coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateBounds {
    /// Minimum latitude and longitude
    pub south_west: Coordinate,
    /// Maximum latitude and longitude
    pub north_east: Coordinate,
}

impl CoordinateBounds {
    /// Bounds of a path, or `None` when it is empty
    pub fn from_path(path: &[Coordinate]) -> Option<Self> {
        let first = *path.first()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in &path[1..] {
            bounds.south_west.latitude = bounds.south_west.latitude.min(point.latitude);
            bounds.south_west.longitude = bounds.south_west.longitude.min(point.longitude);
            bounds.north_east.latitude = bounds.north_east.latitude.max(point.latitude);
            bounds.north_east.longitude = bounds.north_east.longitude.max(point.longitude);
        }
        Some(bounds)
    }

    /// Midpoint of the box
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// A resolved place: two display lines and a coordinate
///
/// Addresses are immutable once built; a new destination means a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    primary_text: String,
    secondary_text: String,
    coordinate: Coordinate,
}

impl Address {
    /// Create an address
    pub fn new(
        primary_text: impl Into<String>,
        secondary_text: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            primary_text: primary_text.into(),
            secondary_text: secondary_text.into(),
            coordinate,
        }
    }

    /// Main line, usually the full formatted address or place name
    pub fn primary_text(&self) -> &str {
        &self.primary_text
    }

    /// Supporting line, usually a street or locality
    pub fn secondary_text(&self) -> &str {
        &self.secondary_text
    }

    /// Location of the place
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Same text at a different coordinate
    pub fn with_coordinate(&self, coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            ..self.clone()
        }
    }
}

/// A user-named address from the saved list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAddress {
    /// Name chosen by the user; used as the removal key
    pub name: String,
    /// The saved place
    pub address: Address,
}

impl SavedAddress {
    /// Create a saved address
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

// =============================================================================
// Routing
// =============================================================================

/// How the user intends to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelMode {
    /// On foot
    #[default]
    Walking,
    /// Scooter or motorcycle
    TwoWheeler,
    /// Car
    Driving,
}

impl TravelMode {
    /// All modes in indicator order
    pub const ALL: [TravelMode; 3] = [
        TravelMode::Walking,
        TravelMode::TwoWheeler,
        TravelMode::Driving,
    ];

    /// Mode for a travel-mode indicator position; anything past the end is driving
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => TravelMode::Walking,
            1 => TravelMode::TwoWheeler,
            _ => TravelMode::Driving,
        }
    }

    /// Position of this mode in the indicator
    pub fn index(&self) -> usize {
        match self {
            TravelMode::Walking => 0,
            TravelMode::TwoWheeler => 1,
            TravelMode::Driving => 2,
        }
    }

    /// Value of the `mode` query parameter of the directions API
    pub fn as_query_value(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::TwoWheeler => "motorcycle",
            TravelMode::Driving => "driving",
        }
    }
}

/// Input of a directions lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Start point
    pub origin: Coordinate,
    /// End point
    pub destination: Coordinate,
    /// Travel mode
    pub mode: TravelMode,
}

/// A single route returned by the directions provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Overview path in encoded polyline format
    pub encoded_polyline: String,
    /// Total length in meters
    pub distance_meters: u64,
    /// Expected travel time in seconds
    pub duration_seconds: u64,
}

impl Route {
    /// Decode the overview path
    pub fn path(&self) -> crate::Result<Vec<Coordinate>> {
        crate::polyline::decode(&self.encoded_polyline)
    }
}

/// Outcome reported to the user for routing and guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteStatus {
    /// Success
    Ok,
    /// The endpoints could not be connected
    NoRouteFound,
    /// The provider was unreachable
    NetworkError,
    /// The API key ran out of quota
    QuotaExceeded,
    /// Anything else
    InternalError,
}

// =============================================================================
// Guidance
// =============================================================================

/// Maneuver drawn next to a guidance instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ManeuverKind {
    /// Unrecognized maneuver
    #[default]
    Unknown,
    /// Leave the origin
    Depart,
    /// Continue straight
    Straight,
    /// Turn left
    TurnLeft,
    /// Turn right
    TurnRight,
    /// Bear slightly left
    TurnSlightLeft,
    /// Bear slightly right
    TurnSlightRight,
    /// Sharp left
    TurnSharpLeft,
    /// Sharp right
    TurnSharpRight,
    /// Turn around
    UTurn,
    /// Enter a roundabout
    Roundabout,
    /// Merge onto a road
    Merge,
    /// Arrive at the destination
    Destination,
}

/// One instruction of a guidance session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceStep {
    /// Human-readable instruction
    pub instruction_text: String,
    /// Distance from the previous step in meters
    pub distance_from_previous_step_meters: u64,
    /// Maneuver icon
    pub maneuver_kind: ManeuverKind,
}

/// A snapshot pushed by the guidance provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceUpdate {
    /// The step the user is on, if any
    pub current_step: Option<GuidanceStep>,
    /// Steps after the current one
    pub remaining_steps: Vec<GuidanceStep>,
    /// Distance to the destination in meters
    pub remaining_distance_meters: f64,
    /// Time to the destination in seconds
    pub remaining_time_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_json_shape() {
        let address = Address::new("Taipei 101", "Xinyi Road", Coordinate::new(25.0330, 121.5654));
        let json = serde_json::to_value(&address).unwrap();

        assert_eq!(json["primaryText"], "Taipei 101");
        assert_eq!(json["secondaryText"], "Xinyi Road");
        assert_eq!(json["coordinate"]["latitude"], 25.0330);
        assert_eq!(json["coordinate"]["longitude"], 121.5654);

        let decoded: Address = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, address);
    }

    #[test]
    fn test_saved_address_json_shape() {
        let saved = SavedAddress::new(
            "gym",
            Address::new("Gym", "", Coordinate::new(1.0, 2.0)),
        );
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["name"], "gym");
        assert_eq!(json["address"]["primaryText"], "Gym");
    }

    #[test]
    fn test_travel_mode_index() {
        assert_eq!(TravelMode::from_index(0), TravelMode::Walking);
        assert_eq!(TravelMode::from_index(1), TravelMode::TwoWheeler);
        assert_eq!(TravelMode::from_index(2), TravelMode::Driving);
        assert_eq!(TravelMode::from_index(7), TravelMode::Driving);
        for mode in TravelMode::ALL {
            assert_eq!(TravelMode::from_index(mode.index()), mode);
        }
    }

    #[test]
    fn test_travel_mode_query_value() {
        assert_eq!(TravelMode::Walking.as_query_value(), "walking");
        assert_eq!(TravelMode::TwoWheeler.as_query_value(), "motorcycle");
        assert_eq!(TravelMode::Driving.as_query_value(), "driving");
    }

    #[test]
    fn test_coordinate_display_and_validity() {
        let c = Coordinate::new(25.5, 121.25);
        assert_eq!(c.to_string(), "25.5,121.25");
        assert!(c.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_bounds_from_path() {
        assert!(CoordinateBounds::from_path(&[]).is_none());

        let bounds = CoordinateBounds::from_path(&[
            Coordinate::new(25.0, 121.5),
            Coordinate::new(25.2, 121.4),
            Coordinate::new(24.9, 121.6),
        ])
        .unwrap();
        assert_eq!(bounds.south_west, Coordinate::new(24.9, 121.4));
        assert_eq!(bounds.north_east, Coordinate::new(25.2, 121.6));
    }
}
