//! Two-endpoint "from / to" address input
//!
//! The top row shows the user's location, the bottom row the destination
//! field. Everything visual is derived from a single progress value in
//! `[0, 1]`: 0 is the collapsed single-row input, 1 the expanded pair joined
//! by a dashed line.

use crate::animator::Convergence;
use crate::ticker::{Animated, Tick};
use crate::tokens::{connector, drawer};
use tracing::trace;

/// Vertical run of the dashed line between the two endpoint dots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashSegment {
    /// Horizontal center of the line
    pub x: f32,
    /// Top end
    pub start_y: f32,
    /// Bottom end
    pub end_y: f32,
}

impl DashSegment {
    /// Length of the segment
    pub fn length(&self) -> f32 {
        self.end_y - self.start_y
    }

    /// Number of whole dashes that fit
    pub fn dash_count(&self) -> usize {
        let pitch = connector::DASH_LENGTH + connector::DASH_GAP;
        ((self.length() + connector::DASH_GAP) / pitch).floor().max(0.0) as usize
    }
}

/// Address input connector state
#[derive(Debug, Clone)]
pub struct AddressInputConnector {
    collapsed_height: f32,
    expanded_height: f32,
    progress: f32,
    destination_text: Option<String>,
    text: String,
    clear_visible: bool,
    editing: bool,
    convergence: Option<Convergence>,
    convergence_requested: bool,
}

impl Default for AddressInputConnector {
    fn default() -> Self {
        Self::new(
            drawer::CONNECTOR_COLLAPSED_HEIGHT,
            drawer::CONNECTOR_EXPANDED_HEIGHT,
        )
    }
}

impl AddressInputConnector {
    /// Create a collapsed connector
    ///
    /// `collapsed_height` is also the height of each row when expanded.
    pub fn new(collapsed_height: f32, expanded_height: f32) -> Self {
        Self {
            collapsed_height,
            expanded_height,
            progress: 0.0,
            destination_text: None,
            text: String::new(),
            clear_visible: false,
            editing: false,
            convergence: None,
            convergence_requested: false,
        }
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Current progress
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Jump to a progress value, cancelling any running convergence
    pub fn set_progress(&mut self, progress: f32) {
        self.cancel_convergence();
        self.progress = clamp_progress(progress);
    }

    /// Height of the whole control
    pub fn height(&self) -> f32 {
        self.collapsed_height + (self.expanded_height - self.collapsed_height) * self.progress
    }

    /// Height of one row
    pub fn row_height(&self) -> f32 {
        self.collapsed_height
    }

    /// Alpha of the "your location" row; hidden for the first half
    pub fn top_row_alpha(&self) -> f32 {
        (self.progress - 0.5).max(0.0) * 2.0
    }

    /// Opacity of the dashed line
    pub fn dash_opacity(&self) -> f32 {
        self.progress
    }

    /// The dashed line, if the endpoints are far enough apart to draw it
    pub fn dash_segment(&self) -> Option<DashSegment> {
        let inset = connector::DOT_SIZE / 2.0 + connector::DASH_PADDING;
        let top_anchor = self.row_height() / 2.0;
        let bottom_anchor = self.height() - self.row_height() / 2.0;

        let start_y = top_anchor + inset;
        let end_y = bottom_anchor - inset;

        (end_y > start_y).then_some(DashSegment {
            x: connector::IMAGE_COLUMN_WIDTH / 2.0,
            start_y,
            end_y,
        })
    }

    // =========================================================================
    // Convergence
    // =========================================================================

    /// Glide to fully expanded
    pub fn expand(&mut self) {
        self.converge_to(1.0);
    }

    /// Glide to fully collapsed
    pub fn collapse(&mut self) {
        self.converge_to(0.0);
    }

    fn converge_to(&mut self, target: f32) {
        trace!("connector converging {} -> {}", self.progress, target);
        self.convergence = Some(Convergence::new(self.progress, target));
        self.convergence_requested = true;
    }

    /// Stop the running glide where it is
    pub fn cancel_convergence(&mut self) {
        self.convergence = None;
    }

    /// Whether a glide is running
    pub fn is_converging(&self) -> bool {
        self.convergence.is_some()
    }

    /// Returns true once per started glide, so the owner can (re)start a ticker
    pub fn take_convergence_request(&mut self) -> bool {
        std::mem::take(&mut self.convergence_requested)
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Show or clear the chosen destination
    ///
    /// This is the only input that shows the clear affordance.
    pub fn set_destination_address(&mut self, text: Option<&str>) {
        self.destination_text = text.map(str::to_string);
        self.text = text.unwrap_or_default().to_string();
        self.clear_visible = text.is_some();
    }

    /// Chosen destination label
    pub fn destination_text(&self) -> Option<&str> {
        self.destination_text.as_deref()
    }

    /// Text in the destination field
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the clear affordance is shown
    pub fn clear_button_visible(&self) -> bool {
        self.clear_visible
    }

    /// Whether the destination field has focus
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Focus the destination field
    pub fn begin_editing(&mut self) {
        self.editing = true;
    }

    /// Replace the field text while editing; the clear affordance is untouched
    pub fn edit_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Drop focus; a chosen destination's label comes back
    pub fn end_editing(&mut self) {
        self.editing = false;
        if let Some(destination) = &self.destination_text {
            self.text = destination.clone();
        }
    }

    /// Clear button tapped
    pub fn tap_clear(&mut self) {
        self.destination_text = None;
        self.text.clear();
        self.clear_visible = false;
    }
}

impl Animated for AddressInputConnector {
    fn tick(&mut self) -> Tick {
        let Some(convergence) = self.convergence.as_mut() else {
            return Tick::Done;
        };

        self.progress = convergence.advance();
        if convergence.is_settled() {
            self.convergence = None;
            Tick::Done
        } else {
            Tick::Continue
        }
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}
