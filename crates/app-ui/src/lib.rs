//! User interface for Wayfinder
//!
//! This crate holds the headless view layer of the map screen: the
//! bottom-sheet drawer state machine, the two-endpoint address input it
//! morphs, the per-frame animation primitives driving both, and the screen
//! that wires them to the models in `app-core`.
//!
//! # Modules
//!
//! - [`tokens`] - Layout metrics, timings and gesture thresholds
//! - [`animator`] - Converging stepper and settle curves
//! - [`ticker`] - Cancellable frame ticker
//! - [`connector`] - Address input connector
//! - [`indicator`] - Travel-mode indicator
//! - [`drawer`] - Drawer controller
//! - [`screens`] - Application screens
//!
//! # Example
//!
//! ```rust
//! use app_state::event_channel;
//! use app_ui::drawer::{DrawerConfig, DrawerController, DrawerState};
//!
//! let (tx, _rx) = event_channel();
//! let mut drawer = DrawerController::new(DrawerConfig::default(), tx);
//! drawer.install_metrics(800.0, 34.0);
//!
//! drawer.pan_began(0.0);
//! drawer.pan_changed(5000.0);
//! assert_eq!(drawer.offset(), 619.0);
//!
//! let settle = drawer.pan_ended(0.0).unwrap();
//! assert_eq!(settle.state, DrawerState::Collapsed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animator;
pub mod connector;
pub mod drawer;
pub mod indicator;
pub mod screens;
pub mod ticker;
pub mod tokens;

// Re-export commonly used types
pub use animator::{step, Convergence, Curve, SettleAnimation};
pub use connector::{AddressInputConnector, DashSegment};
pub use drawer::{
    ContainerSizing, DrawerConfig, DrawerController, DrawerEvent, DrawerLayout, DrawerMetrics,
    DrawerState, Settle,
};
pub use indicator::{IndicatorItem, TravelModeIndicator};
pub use screens::{MapProviders, MapScreen, ScreenIntent};
pub use ticker::{Animated, Tick, TickerHandle};
