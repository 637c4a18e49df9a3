//! Bottom-sheet drawer
//!
//! The drawer slides between Expanded (offset 0) and Collapsed (offset equal
//! to the active collapse target). Which collapse target is active depends on
//! whether a destination is chosen: without one the drawer collapses to the
//! short address panel, with one it collapses to the route panel.
//!
//! Progress is derived from the offset on every change and drives the
//! address input connector and panel alphas. Committed moves are returned as
//! [`Settle`] descriptions for the host to animate; user-facing actions are
//! reported upward as [`DrawerEvent`]s.

use crate::animator::SettleAnimation;
use crate::connector::AddressInputConnector;
use crate::indicator::TravelModeIndicator;
use crate::ticker::{Animated, Tick};
use crate::tokens::{drawer as metrics, duration, gesture};
use app_state::EventSender;
use maps_client::{Address, Coordinate, TravelMode};
use std::time::Duration;
use tracing::{debug, trace};

// =============================================================================
// Configuration
// =============================================================================

/// Drawer heights and gesture thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct DrawerConfig {
    /// Visible height when collapsed without a destination
    pub collapse_address_height: f32,
    /// Visible height of the route panel
    pub collapse_route_height: f32,
    /// Gap kept below the collapsed drawer
    pub bottom_gap: f32,
    /// Side inset in route mode
    pub route_side_inset: f32,
    /// Separator height when fully expanded
    pub separator_height: f32,
    /// Address input height when collapsed
    pub connector_collapsed_height: f32,
    /// Address input height when expanded
    pub connector_expanded_height: f32,
    /// Release speed above which the direction alone decides
    pub fling_velocity: f32,
    /// Fraction of the container height separating expand from collapse
    pub decision_fraction: f32,
    /// Divisor turning release speed into the spring's initial velocity
    pub spring_velocity_scale: f32,
    /// Duration of a committed move
    pub settle_duration: Duration,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            collapse_address_height: metrics::COLLAPSE_ADDRESS_HEIGHT,
            collapse_route_height: metrics::COLLAPSE_ROUTE_HEIGHT,
            bottom_gap: metrics::BOTTOM_GAP,
            route_side_inset: metrics::ROUTE_SIDE_INSET,
            separator_height: metrics::SEPARATOR_HEIGHT,
            connector_collapsed_height: metrics::CONNECTOR_COLLAPSED_HEIGHT,
            connector_expanded_height: metrics::CONNECTOR_EXPANDED_HEIGHT,
            fling_velocity: gesture::FLING_VELOCITY,
            decision_fraction: gesture::DECISION_FRACTION,
            spring_velocity_scale: gesture::SPRING_VELOCITY_SCALE,
            settle_duration: Duration::from_millis(duration::SETTLE),
        }
    }
}

impl DrawerConfig {
    /// Set the release speed threshold
    pub fn with_fling_velocity(mut self, velocity: f32) -> Self {
        self.fling_velocity = velocity;
        self
    }

    /// Set the expand/collapse decision fraction
    pub fn with_decision_fraction(mut self, fraction: f32) -> Self {
        self.decision_fraction = fraction;
        self
    }

    /// Set the settle duration
    pub fn with_settle_duration(mut self, duration: Duration) -> Self {
        self.settle_duration = duration;
        self
    }

    /// Set both collapsed heights
    pub fn with_collapse_heights(mut self, address: f32, route: f32) -> Self {
        self.collapse_address_height = address;
        self.collapse_route_height = route;
        self
    }
}

// =============================================================================
// State
// =============================================================================

/// Resting position of the drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerState {
    /// Fully open
    #[default]
    Expanded,
    /// Showing only the address or route panel
    Collapsed,
}

/// Collapse targets computed from the container bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerMetrics {
    /// Container height
    pub container_height: f32,
    /// Bottom safe-area inset
    pub bottom_inset: f32,
    /// Offset of the collapsed address panel
    pub collapse_address_distance: f32,
    /// Offset of the collapsed route panel
    pub collapse_route_distance: f32,
}

impl DrawerMetrics {
    /// Compute both collapse targets; negative or malformed results become 0
    pub fn compute(config: &DrawerConfig, container_height: f32, bottom_inset: f32) -> Self {
        let height = non_negative(container_height);
        let inset = non_negative(bottom_inset);

        Self {
            container_height: height,
            bottom_inset: inset,
            collapse_address_distance: non_negative(
                height - config.collapse_address_height + inset - config.bottom_gap,
            ),
            collapse_route_distance: non_negative(
                height - (config.collapse_route_height + inset) + inset - config.bottom_gap,
            ),
        }
    }
}

/// How the drawer container is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerSizing {
    /// Fixed height, moved by the offset
    FixedHeight,
    /// Pinned to the bottom edge (collapsed route panel)
    BottomAnchored,
}

/// Everything a renderer needs for one drawer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerLayout {
    /// Distance of the drawer top from the expanded position
    pub top_offset: f32,
    /// 1 when expanded, 0 when collapsed
    pub progress: f32,
    /// Separator below the address input
    pub separator_height: f32,
    /// Horizontal inset of the drawer
    pub side_inset: f32,
    /// Address input height
    pub connector_height: f32,
    /// Address panel alpha
    pub address_panel_alpha: f32,
    /// Route panel alpha
    pub route_panel_alpha: f32,
    /// Recenter button alpha
    pub recenter_button_alpha: f32,
    /// Container sizing
    pub sizing: ContainerSizing,
}

/// A committed move for the host to animate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settle {
    /// State committed to
    pub state: DrawerState,
    /// Offset before the move
    pub from_offset: f32,
    /// Offset after the move
    pub to_offset: f32,
    /// Timing
    pub animation: SettleAnimation,
    /// Layout at the end of the move
    pub layout: DrawerLayout,
}

impl Settle {
    /// Offset after `elapsed`
    pub fn offset_at(&self, elapsed: Duration) -> f32 {
        self.animation
            .interpolate(self.from_offset, self.to_offset, elapsed)
    }
}

/// Actions reported to the host screen
#[derive(Debug, Clone, PartialEq)]
pub enum DrawerEvent {
    /// A list row was chosen as destination
    DestinationSelected(Address),
    /// The destination was cleared
    DestinationCleared,
    /// A travel mode was picked
    TravelModeSelected(TravelMode),
    /// Start navigating to this coordinate
    StartRequested(Coordinate),
    /// The home favorite was tapped
    HomeRequested,
    /// The company favorite was tapped
    CompanyRequested,
    /// The edit favorite was tapped
    EditRequested,
    /// Center the map on the user
    RecenterRequested,
    /// The destination field text changed
    KeywordChanged(String),
}

#[derive(Debug, Clone, Copy)]
struct Pan {
    last_y: f32,
    start_state: DrawerState,
}

// =============================================================================
// Controller
// =============================================================================

/// Drawer state machine
pub struct DrawerController {
    config: DrawerConfig,
    events: EventSender<DrawerEvent>,
    metrics: Option<DrawerMetrics>,
    state: DrawerState,
    offset: f32,
    pan: Option<Pan>,
    destination: Option<Address>,
    indicator: TravelModeIndicator,
    route_info: Option<String>,
    connector: AddressInputConnector,
    pending_settle: Option<Settle>,
    appeared: bool,
}

impl DrawerController {
    /// Create an expanded drawer without metrics
    pub fn new(config: DrawerConfig, events: EventSender<DrawerEvent>) -> Self {
        let connector = AddressInputConnector::new(
            config.connector_collapsed_height,
            config.connector_expanded_height,
        );

        Self {
            config,
            events,
            metrics: None,
            state: DrawerState::Expanded,
            offset: 0.0,
            pan: None,
            destination: None,
            indicator: TravelModeIndicator::default(),
            route_info: None,
            connector,
            pending_settle: None,
            appeared: false,
        }
    }

    /// Configuration
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// Install the container bounds; only the first call has any effect
    ///
    /// The drawer starts at the address collapse offset while still reporting
    /// Expanded; the first [`appear`](Self::appear) opens it.
    pub fn install_metrics(&mut self, container_height: f32, bottom_inset: f32) -> bool {
        if self.metrics.is_some() {
            return false;
        }

        let metrics = DrawerMetrics::compute(&self.config, container_height, bottom_inset);
        debug!(
            "drawer metrics: address {} route {}",
            metrics.collapse_address_distance, metrics.collapse_route_distance
        );
        self.metrics = Some(metrics);
        self.offset = metrics.collapse_address_distance;
        self.apply_progress();
        true
    }

    /// Installed metrics
    pub fn metrics(&self) -> Option<&DrawerMetrics> {
        self.metrics.as_ref()
    }

    /// Resting state
    pub fn state(&self) -> DrawerState {
        self.state
    }

    /// Current offset
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Offset of the active collapsed position
    pub fn collapse_target(&self) -> f32 {
        let Some(metrics) = &self.metrics else {
            return 0.0;
        };
        if self.destination.is_some() {
            metrics.collapse_route_distance
        } else {
            metrics.collapse_address_distance
        }
    }

    /// Progress for the current offset
    pub fn progress(&self) -> f32 {
        self.progress_at(self.offset)
    }

    fn progress_at(&self, offset: f32) -> f32 {
        let target = self.collapse_target();
        if target <= 0.0 {
            return 0.0;
        }
        (1.0 - offset / target).clamp(0.0, 1.0)
    }

    /// Layout for the current offset
    pub fn layout(&self) -> DrawerLayout {
        self.layout_at(self.offset)
    }

    fn layout_at(&self, offset: f32) -> DrawerLayout {
        let progress = self.progress_at(offset);
        let (address_panel_alpha, route_panel_alpha, side_inset) = if self.destination.is_some() {
            (
                progress,
                1.0 - progress,
                self.config.route_side_inset * (1.0 - progress),
            )
        } else {
            (1.0, 0.0, 0.0)
        };
        let sizing = if self.destination.is_some() && self.state == DrawerState::Collapsed {
            ContainerSizing::BottomAnchored
        } else {
            ContainerSizing::FixedHeight
        };
        // The route panel keeps the input at full height
        let connector_height = if self.destination.is_some() {
            self.config.connector_expanded_height
        } else {
            self.config.connector_collapsed_height
                + (self.config.connector_expanded_height - self.config.connector_collapsed_height)
                    * progress
        };

        DrawerLayout {
            top_offset: offset,
            progress,
            separator_height: self.config.separator_height * progress,
            side_inset,
            connector_height,
            address_panel_alpha,
            route_panel_alpha,
            recenter_button_alpha: 1.0 - progress,
            sizing,
        }
    }

    /// Push progress into the connector; only the address panel tracks it
    fn apply_progress(&mut self) {
        if self.destination.is_none() {
            self.connector.set_progress(self.progress());
        }
    }

    // =========================================================================
    // Pan gesture
    // =========================================================================

    /// Whether a pan is in progress
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// A pan started at `y`; ignored until metrics are installed
    pub fn pan_began(&mut self, y: f32) {
        if self.metrics.is_none() {
            trace!("pan ignored before metrics");
            return;
        }
        if self.destination.is_none() {
            self.connector.cancel_convergence();
        }
        self.connector.end_editing();
        self.pan = Some(Pan {
            last_y: y,
            start_state: self.state,
        });
    }

    /// The finger moved to `y`
    pub fn pan_changed(&mut self, y: f32) {
        let Some(pan) = self.pan.as_mut() else {
            return;
        };
        let delta = y - pan.last_y;
        pan.last_y = y;

        self.offset = (self.offset + delta).clamp(0.0, self.collapse_target());
        self.apply_progress();
    }

    /// The pan ended or was cancelled with vertical velocity `velocity_y`
    pub fn pan_ended(&mut self, velocity_y: f32) -> Option<Settle> {
        if self.pan.is_none() {
            return None;
        }
        let (state, spring_velocity) = self.release_target(velocity_y);
        self.pan = None;
        Some(self.commit(state, spring_velocity))
    }

    /// Where a release with `velocity_y` would go, and the spring velocity if
    /// the speed alone decided
    pub fn release_target(&self, velocity_y: f32) -> (DrawerState, Option<f32>) {
        if velocity_y.abs() > self.config.fling_velocity {
            let state = if velocity_y > 0.0 {
                DrawerState::Collapsed
            } else {
                DrawerState::Expanded
            };
            return (
                state,
                Some(velocity_y.abs() / self.config.spring_velocity_scale),
            );
        }

        let container_height = self.metrics.map(|m| m.container_height).unwrap_or(0.0);
        let threshold = container_height * self.config.decision_fraction;
        let state = if self.offset > threshold {
            DrawerState::Collapsed
        } else if self.offset < threshold {
            DrawerState::Expanded
        } else {
            self.pan.map(|p| p.start_state).unwrap_or(self.state)
        };
        (state, None)
    }

    // =========================================================================
    // Commits
    // =========================================================================

    fn commit(&mut self, state: DrawerState, spring_velocity: Option<f32>) -> Settle {
        let from_offset = self.offset;
        self.state = state;
        let to_offset = match state {
            DrawerState::Expanded => 0.0,
            DrawerState::Collapsed => self.collapse_target(),
        };
        self.offset = to_offset;

        match state {
            DrawerState::Collapsed if self.destination.is_none() => self.connector.collapse(),
            _ => self.connector.expand(),
        }

        let animation = match spring_velocity {
            Some(velocity) => SettleAnimation::spring(self.config.settle_duration, velocity),
            None => SettleAnimation::eased(self.config.settle_duration),
        };
        debug!(
            "drawer settling to {:?} ({} -> {})",
            state, from_offset, to_offset
        );

        let settle = Settle {
            state,
            from_offset,
            to_offset,
            animation,
            layout: self.layout_at(to_offset),
        };
        self.pending_settle = Some(settle);
        settle
    }

    /// Open the drawer
    pub fn expand(&mut self) -> Settle {
        self.commit(DrawerState::Expanded, None)
    }

    /// Close the drawer to the active collapse target
    pub fn collapse(&mut self) -> Settle {
        self.commit(DrawerState::Collapsed, None)
    }

    /// The last committed move not yet taken by the host
    pub fn take_settle(&mut self) -> Option<Settle> {
        self.pending_settle.take()
    }

    /// Whether the connector started a glide since the last call
    pub fn take_convergence_request(&mut self) -> bool {
        self.connector.take_convergence_request()
    }

    // =========================================================================
    // Destination field
    // =========================================================================

    /// Screen appeared; the first time, the destination field gets focus
    pub fn appear(&mut self) {
        if self.appeared {
            return;
        }
        self.appeared = true;
        self.begin_editing();
    }

    /// The destination field got focus
    pub fn begin_editing(&mut self) {
        self.connector.begin_editing();
        self.commit(DrawerState::Expanded, None);
    }

    /// The destination field lost focus
    pub fn end_editing(&mut self) {
        self.connector.end_editing();
    }

    /// The destination field text changed
    pub fn edit_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        self.connector.edit_text(&keyword);
        self.events.emit(DrawerEvent::KeywordChanged(keyword));
    }

    /// A history or search row was chosen
    pub fn select_address(&mut self, address: Address) {
        self.apply_destination(address.clone());
        self.events.emit(DrawerEvent::DestinationSelected(address));
    }

    /// The host chose a destination (map tap, marker drag, favorite)
    pub fn set_destination(&mut self, address: Address) {
        self.apply_destination(address);
    }

    fn apply_destination(&mut self, address: Address) {
        debug!("destination set: {}", address.primary_text());
        self.connector
            .set_destination_address(Some(address.primary_text()));
        self.connector.end_editing();
        self.destination = Some(address);
        self.commit(DrawerState::Collapsed, None);
    }

    /// The chosen destination
    pub fn destination(&self) -> Option<&Address> {
        self.destination.as_ref()
    }

    /// Clear button tapped
    pub fn tap_clear_destination(&mut self) {
        self.destination = None;
        self.route_info = None;
        self.connector.tap_clear();
        self.commit(self.state, None);
        self.events.emit(DrawerEvent::DestinationCleared);
    }

    /// The address input
    pub fn connector(&self) -> &AddressInputConnector {
        &self.connector
    }

    // =========================================================================
    // Route panel
    // =========================================================================

    /// A travel-mode segment was tapped
    pub fn select_travel_mode(&mut self, index: usize) -> TravelMode {
        let mode = self.indicator.select(index);
        self.events.emit(DrawerEvent::TravelModeSelected(mode));
        mode
    }

    /// Selected travel mode
    pub fn travel_mode(&self) -> TravelMode {
        self.indicator.selected()
    }

    /// Travel-mode indicator
    pub fn indicator(&self) -> &TravelModeIndicator {
        &self.indicator
    }

    /// A favorites row was tapped: home, company, then edit
    pub fn tap_favorite(&mut self, index: usize) {
        let event = match index {
            0 => DrawerEvent::HomeRequested,
            1 => DrawerEvent::CompanyRequested,
            _ => DrawerEvent::EditRequested,
        };
        self.events.emit(event);
    }

    /// Start button tapped; does nothing without a destination
    pub fn tap_start(&mut self) -> bool {
        let Some(destination) = &self.destination else {
            return false;
        };
        self.events
            .emit(DrawerEvent::StartRequested(destination.coordinate()));
        true
    }

    /// Recenter button tapped
    pub fn tap_recenter(&mut self) {
        self.events.emit(DrawerEvent::RecenterRequested);
    }

    /// Show a route summary
    pub fn set_route_info(&mut self, label: impl Into<String>) {
        self.route_info = Some(label.into());
    }

    /// Blank the route summary
    pub fn clear_route_info(&mut self) {
        self.route_info = None;
    }

    /// Route summary text
    pub fn route_info(&self) -> Option<&str> {
        self.route_info.as_deref()
    }
}

impl Animated for DrawerController {
    fn tick(&mut self) -> Tick {
        self.connector.tick()
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
