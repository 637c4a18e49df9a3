//! Application screens

pub mod map;

pub use map::{MapProviders, MapScreen, ScreenIntent, DEFAULT_ZOOM, FALLBACK_CENTER};
