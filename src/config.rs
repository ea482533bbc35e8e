//! Chart tuning constants.
//!
//! The fade levels are visual parameters, not semantics; [`ChartStyle`]
//! carries them so a page can override any of them per chart.

// Opacity tiers
pub const FADED_OPACITY: f64 = 0.2;
pub const AFTER_HOVER_FADE: f64 = 0.2;
pub const INACTIVE_FLAG_OPACITY: f64 = 0.1;

// Stroke widths (px)
pub const STROKE_WIDTH: f64 = 2.0;
pub const EMPHASIZED_STROKE_WIDTH: f64 = 3.5;
pub const HIT_STROKE_WIDTH: f64 = 10.0;

// Scales
pub const POINTS_HEADROOM: f64 = 1.1;
pub const POINTS_TICK_TARGET: usize = 5;
pub const MAX_LAP_TICKS: usize = 12;

// Layout
pub const DEFAULT_CHART_WIDTH: f64 = 800.0;
pub const DEFAULT_CHART_HEIGHT: f64 = 420.0;
pub const LABEL_OFFSET_PX: f64 = 6.0;
pub const SPARKLINE_WIDTH: f64 = 100.0;
pub const SPARKLINE_HEIGHT: f64 = 24.0;
pub const SPARKLINE_PADDING: f64 = 2.0;

pub const FALLBACK_COLOR: &str = "#888888";

/// Space between the SVG edge and the plot area, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const STANDINGS_MARGINS: Margins = Margins {
    top: 16.0,
    right: 24.0,
    bottom: 48.0,
    left: 48.0,
};

// Extra right margin leaves room for the end-of-race labels.
pub const POSITION_MARGINS: Margins = Margins {
    top: 16.0,
    right: 64.0,
    bottom: 36.0,
    left: 40.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Opacity of entities pushed to the background by selection or hover.
    pub faded_opacity: f64,
    /// Multiplier applied to the part of a line after the hovered category.
    pub after_hover_fade: f64,
    /// Opacity of axis flags other than the hovered one.
    pub inactive_flag_opacity: f64,
    pub stroke_width: f64,
    pub emphasized_stroke_width: f64,
    pub hit_stroke_width: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            faded_opacity: FADED_OPACITY,
            after_hover_fade: AFTER_HOVER_FADE,
            inactive_flag_opacity: INACTIVE_FLAG_OPACITY,
            stroke_width: STROKE_WIDTH,
            emphasized_stroke_width: EMPHASIZED_STROKE_WIDTH,
            hit_stroke_width: HIT_STROKE_WIDTH,
        }
    }
}
