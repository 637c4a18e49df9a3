//! Application state for Wayfinder
//!
//! This crate provides the typed event channel components use to talk to the
//! screen that owns them, and the reactive guidance session tracker.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod events;
pub mod guidance;

pub use events::{event_channel, EventReceiver, EventSender};
pub use guidance::{GuidanceEvent, GuidanceState, GuidanceTracker, RemainingProgress};
