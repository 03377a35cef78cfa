//! Pixel ↔ complex-plane mapping.
//!
//! A view is a `center` and a log-scale `zoom`. The visible rectangle has
//! half-extents `(s^-zoom · aspect, s^-zoom)` where `s` is the zoom base
//! (`scale_per_zoom`). The same [`visible_half_extents`] feeds both the
//! interaction math here and the renderer's rectangle uniform.

use crate::canvas::Canvas;
use crate::complex::Complex;

/// The linear magnification for a zoom level: `scale_per_zoom^zoom`.
#[inline]
pub fn zoom_scale(zoom: f64, scale_per_zoom: f64) -> f64 {
    scale_per_zoom.powf(zoom)
}

/// Half-width and half-height of the visible plane rectangle.
#[inline]
pub fn visible_half_extents(zoom: f64, aspect: f64, scale_per_zoom: f64) -> Complex {
    let inv_scale = scale_per_zoom.powf(-zoom);
    Complex::new(inv_scale * aspect, inv_scale)
}

/// Zoom change that corresponds to a pinch going from `previous_distance`
/// to `current_distance`: `log(d1 / d0) / log(s)`.
#[inline]
pub fn pinch_zoom_delta(previous_distance: f64, current_distance: f64, scale_per_zoom: f64) -> f64 {
    (current_distance / previous_distance).ln() / scale_per_zoom.ln()
}

/// Map a point of a `width × height` pixel grid onto the rectangle with the
/// given `center` and `half_extents`.
///
/// `(0, 0)` is the top-left corner; pixel-y grows downward while the
/// imaginary axis grows upward. Pass `(x + 0.5, y + 0.5)` for pixel centers.
#[inline]
pub fn pixel_to_plane(
    center: Complex,
    half_extents: Complex,
    px: f64,
    py: f64,
    width: f64,
    height: f64,
) -> Complex {
    let nx = px / width * 2.0 - 1.0;
    let ny = py / height * 2.0 - 1.0;
    Complex::new(
        nx * half_extents.re + center.re,
        -ny * half_extents.im + center.im,
    )
}

/// A center and zoom pair, i.e. one placement of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneView {
    pub center: Complex,
    pub zoom: f64,
}

impl PlaneView {
    pub fn new(center: Complex, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Half-extents of this view on `canvas`.
    #[inline]
    pub fn half_extents(&self, canvas: &Canvas, scale_per_zoom: f64) -> Complex {
        visible_half_extents(self.zoom, canvas.aspect(), scale_per_zoom)
    }

    /// Map a canvas pixel to the plane point drawn there, via
    /// [`pixel_to_plane`]. Returns `None` on a non-drawable canvas.
    pub fn to_complex_plane(
        &self,
        px: f64,
        py: f64,
        canvas: &Canvas,
        scale_per_zoom: f64,
    ) -> Option<Complex> {
        if !canvas.is_drawable() {
            return None;
        }
        let half = self.half_extents(canvas, scale_per_zoom);
        Some(pixel_to_plane(
            self.center,
            half,
            px,
            py,
            canvas.width,
            canvas.height,
        ))
    }

    /// Inverse of [`to_complex_plane`](Self::to_complex_plane).
    pub fn to_pixel(
        &self,
        point: Complex,
        canvas: &Canvas,
        scale_per_zoom: f64,
    ) -> Option<(f64, f64)> {
        if !canvas.is_drawable() {
            return None;
        }
        let half = self.half_extents(canvas, scale_per_zoom);
        let nx = (point.re - self.center.re) / half.re;
        let ny = -(point.im - self.center.im) / half.im;
        Some(((nx + 1.0) * 0.5 * canvas.width, (ny + 1.0) * 0.5 * canvas.height))
    }

    /// Plane-space offset to add to the center so content follows a
    /// screen-space drag of `(dx, dy)` pixels.
    ///
    /// Dragging right moves the center left; dragging down moves it up
    /// (positive imaginary), matching the axis flip of the mapping.
    pub fn drag_offset(
        &self,
        dx: f64,
        dy: f64,
        canvas: &Canvas,
        scale_per_zoom: f64,
    ) -> Option<Complex> {
        if !canvas.is_drawable() {
            return None;
        }
        let half = self.half_extents(canvas, scale_per_zoom);
        Some(Complex::new(
            -dx * 2.0 * half.re / canvas.width,
            dy * 2.0 * half.im / canvas.height,
        ))
    }
}
