//! Julia cursor sync: the Julia view follows the pointer over the
//! Mandelbrot view.

use crate::canvas::Canvas;
use crate::complex::Complex;
use crate::settings::ViewSettings;
use crate::viewport::{Theme, ViewportState};

/// Record the Mandelbrot-space pointer position and adopt it as the Julia
/// constant. Returns true when the constant actually moved.
pub fn follow_pointer(state: &mut ViewportState, point: Complex) -> bool {
    state.pointer = Some(point);
    if state.julia_constant == point {
        return false;
    }
    state.julia_constant = point;
    true
}

/// Everything the Julia fragment program reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuliaUniforms {
    pub julia_constant: Complex,
    /// Plane point at the canvas center; the Julia view does not pan.
    pub center: Complex,
    /// `(aspect, 1.0)`: the Julia view is fixed at unit half-height.
    pub half_extents: Complex,
    pub max_iterations: u32,
    pub theme: Theme,
    pub color_compression: f64,
    /// Crosshair center, in Julia-plane units.
    pub cursor_position: Complex,
    /// Crosshair arm length, in plane units.
    pub cursor_size: f64,
}

/// Derive the Julia view's uniforms. `None` when the canvas has no area.
pub fn julia_uniforms(
    state: &ViewportState,
    canvas: &Canvas,
    settings: &ViewSettings,
) -> Option<JuliaUniforms> {
    if !canvas.is_drawable() {
        return None;
    }
    Some(JuliaUniforms {
        julia_constant: state.julia_constant,
        center: Complex::ZERO,
        half_extents: Complex::new(canvas.aspect(), 1.0),
        max_iterations: state.max_iterations,
        theme: state.theme,
        color_compression: state.color_compression,
        cursor_position: state.julia_constant,
        cursor_size: settings.julia_cursor_size,
    })
}
