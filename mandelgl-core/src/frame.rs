use crate::canvas::Canvas;
use crate::complex::Complex;
use crate::julia::{julia_uniforms, JuliaUniforms};
use crate::settings::ViewSettings;
use crate::viewport::{Theme, ViewportState};

/// Everything the Mandelbrot fragment program reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotUniforms {
    pub center: Complex,
    pub half_extents: Complex,
    pub max_iterations: u32,
    pub theme: Theme,
    pub color_compression: f64,
}

/// Derive the Mandelbrot view's uniforms from the eased (current) view.
///
/// The rectangle comes from the same half-extent function the handlers map
/// through, so what is drawn is exactly what the pointer hits.
pub fn mandelbrot_uniforms(
    state: &ViewportState,
    canvas: &Canvas,
    settings: &ViewSettings,
) -> Option<MandelbrotUniforms> {
    if !canvas.is_drawable() {
        return None;
    }
    Some(MandelbrotUniforms {
        center: state.center,
        half_extents: state
            .current_view()
            .half_extents(canvas, settings.scale_per_zoom),
        max_iterations: state.max_iterations,
        theme: state.theme,
        color_compression: state.color_compression,
    })
}

/// Uniforms for both views in one frame. A view whose canvas has no area
/// is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub mandelbrot: Option<MandelbrotUniforms>,
    pub julia: Option<JuliaUniforms>,
}

pub fn frame_uniforms(
    state: &ViewportState,
    mandelbrot_canvas: &Canvas,
    julia_canvas: &Canvas,
    settings: &ViewSettings,
) -> FrameUniforms {
    FrameUniforms {
        mandelbrot: mandelbrot_uniforms(state, mandelbrot_canvas, settings),
        julia: julia_uniforms(state, julia_canvas, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::zoom_scale;

    #[test]
    fn rectangle_is_inverse_scale_times_aspect() {
        let settings = ViewSettings::default();
        let mut state = ViewportState::default();
        state.zoom = 4.0;
        let canvas = Canvas::new(1600.0, 900.0, 1.0);
        let u = mandelbrot_uniforms(&state, &canvas, &settings).unwrap();
        let inv = 1.0 / zoom_scale(4.0, 1.5);
        assert!((u.half_extents.re - inv * 1600.0 / 900.0).abs() < 1e-12);
        assert!((u.half_extents.im - inv).abs() < 1e-12);
        assert_eq!(u.center, Complex::new(-0.5, 0.0));
        assert_eq!(u.theme.id(), 2);
    }

    #[test]
    fn rectangle_agrees_with_mapper_corners() {
        let settings = ViewSettings::default();
        let mut state = ViewportState::default();
        state.zoom = 2.3;
        state.center = Complex::new(0.1, -0.4);
        let canvas = Canvas::new(640.0, 480.0, 1.0);
        let u = mandelbrot_uniforms(&state, &canvas, &settings).unwrap();
        let corner = state
            .current_view()
            .to_complex_plane(640.0, 0.0, &canvas, settings.scale_per_zoom)
            .unwrap();
        assert!((corner.re - (u.center.re + u.half_extents.re)).abs() < 1e-12);
        assert!((corner.im - (u.center.im + u.half_extents.im)).abs() < 1e-12);
    }

    #[test]
    fn each_view_skips_independently() {
        let settings = ViewSettings::default();
        let state = ViewportState::default();
        let frame = frame_uniforms(
            &state,
            &Canvas::new(800.0, 600.0, 1.0),
            &Canvas::new(0.0, 0.0, 1.0),
            &settings,
        );
        assert!(frame.mandelbrot.is_some());
        assert!(frame.julia.is_none());
    }
}
