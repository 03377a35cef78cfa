/// Pixel dimensions of a drawing surface.
///
/// Sizes are in physical (device) pixels. The canvas is re-read from the
/// hosting widget every frame, so a resize is picked up on the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Physical pixels per logical point.
    pub pixel_ratio: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// True when both dimensions are positive and finite.
    ///
    /// Every mapping operation short-circuits on a non-drawable canvas:
    /// a minimised window or a collapsed panel skips interaction math for
    /// that frame instead of dividing by zero.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width over height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Whole-pixel size for allocating frame buffers.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.width.max(0.0).round() as u32,
            self.height.max(0.0).round() as u32,
        )
    }
}
