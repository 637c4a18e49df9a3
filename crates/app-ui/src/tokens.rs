//! Design tokens for Wayfinder
//!
//! Layout metrics, timings and gesture thresholds of the map screen. Sizes
//! are in points.

// =============================================================================
// Spacing Tokens
// =============================================================================

/// Spacing scale
pub mod spacing {
    /// 2pt
    pub const SPACE_2XS: f32 = 2.0;
    /// 8pt
    pub const SPACE_SM: f32 = 8.0;
    /// 16pt
    pub const SPACE_LG: f32 = 16.0;
}

// =============================================================================
// Sizing Tokens
// =============================================================================

/// Size tokens for component dimensions
pub mod sizing {
    /// Icon sizes
    pub mod icon {
        /// Endpoint dot (16pt)
        pub const SM: f32 = 16.0;
        /// Icon column (40pt)
        pub const XXL: f32 = 40.0;
    }

    /// Input sizes
    pub mod input {
        /// Large input height (52pt)
        pub const LG_HEIGHT: f32 = 52.0;
    }
}

// =============================================================================
// Drawer Tokens
// =============================================================================

/// Bottom-sheet drawer metrics
pub mod drawer {
    use super::{sizing, spacing};

    /// Visible height when collapsed without a destination
    pub const COLLAPSE_ADDRESS_HEIGHT: f32 = 185.0;
    /// Visible height of the route panel, before the bottom inset
    pub const COLLAPSE_ROUTE_HEIGHT: f32 = 350.0;
    /// Gap kept between the collapsed drawer and the bottom edge
    pub const BOTTOM_GAP: f32 = 30.0;
    /// Side inset of the drawer in route mode
    pub const ROUTE_SIDE_INSET: f32 = spacing::SPACE_LG;
    /// Separator height when fully expanded
    pub const SEPARATOR_HEIGHT: f32 = spacing::SPACE_2XS;
    /// Corner radius of the drawer
    pub const CORNER_RADIUS: f32 = 30.0;
    /// Address input height when collapsed
    pub const CONNECTOR_COLLAPSED_HEIGHT: f32 = sizing::input::LG_HEIGHT;
    /// Address input height when expanded
    pub const CONNECTOR_EXPANDED_HEIGHT: f32 = 130.0;
}

/// Address input connector metrics
pub mod connector {
    use super::{sizing, spacing};

    /// Width of the column holding the endpoint dots
    pub const IMAGE_COLUMN_WIDTH: f32 = sizing::icon::XXL;
    /// Endpoint dot diameter
    pub const DOT_SIZE: f32 = sizing::icon::SM;
    /// Gap between a dot and the dashed line
    pub const DASH_PADDING: f32 = spacing::SPACE_SM;
    /// Painted length of one dash
    pub const DASH_LENGTH: f32 = 4.0;
    /// Gap between dashes
    pub const DASH_GAP: f32 = 2.0;
    /// Stroke width of the dashed line
    pub const DASH_WIDTH: f32 = 1.0;
}

// =============================================================================
// Motion Tokens
// =============================================================================

/// Animation timings (in milliseconds)
pub mod duration {
    /// One display frame at ~60 Hz
    pub const FRAME: u64 = 16;
    /// Keystroke debounce before a place search
    pub const KEYWORD_DEBOUNCE: u64 = 300;
    /// Drawer settle animation
    pub const SETTLE: u64 = 500;
}

/// Pan gesture thresholds
pub mod gesture {
    /// Release speed (pt/s) above which the direction alone decides
    pub const FLING_VELOCITY: f32 = 1000.0;
    /// Fraction of the container height separating expand from collapse
    pub const DECISION_FRACTION: f32 = 0.25;
    /// Divisor turning release speed into the spring's initial velocity
    pub const SPRING_VELOCITY_SCALE: f32 = 1000.0;
}

/// Convergence animation constants
pub mod convergence {
    /// Share of the remaining distance covered per frame
    pub const FACTOR: f32 = 0.15;
    /// Distance below which the value snaps to its target
    pub const SNAP: f32 = 0.01;
}
