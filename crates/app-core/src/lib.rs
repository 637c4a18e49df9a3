//! Core application logic for Wayfinder
//!
//! This crate contains the view-models behind the map screen: the address
//! picker with its debounced search, the route planner, the home/company
//! editor, the guidance controller and the distance/duration labels.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod favorites;
pub mod format;
pub mod guidance;
pub mod picker;
pub mod route;
pub mod search;

#[cfg(test)]
mod testing;

pub use favorites::{FavoriteRow, FavoriteSlot, FavoritesEditor};
pub use format::RouteSummary;
pub use guidance::GuidanceController;
pub use picker::{resolve_coordinate, AddressPickerModel, PickerConfig};
pub use route::{RouteOverlay, RoutePlanner, RouteUpdate};
pub use search::KeywordSearch;
