// File: crates/pulse-core/src/types.rs
// Summary: Shared surface types and constants (sizes, insets, plot viewport).

use crate::geometry::RectF;

/// Default surface width in pixels.
pub const WIDTH: i32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: i32 = 640;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    /// Room for y-axis labels on the left and the playback strip on top.
    fn default() -> Self {
        Self::new(56, 24, 48, 40)
    }
}

/// Host rendering surface: overall size plus the margins around the plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub insets: Insets,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, insets: Insets::default() }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Plot width; never negative.
    pub fn plot_width(&self) -> f32 {
        (self.width - self.insets.hsum() as f32).max(0.0)
    }

    /// Plot height; never negative.
    pub fn plot_height(&self) -> f32 {
        (self.height - self.insets.vsum() as f32).max(0.0)
    }

    /// Plot rectangle in surface coordinates.
    pub fn plot_rect(&self) -> RectF {
        RectF::from_ltwh(
            self.insets.left as f32,
            self.insets.top as f32,
            self.plot_width(),
            self.plot_height(),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(WIDTH as f32, HEIGHT as f32)
    }
}
