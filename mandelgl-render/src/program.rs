//! Per-pixel fragment programs for the two views.
//!
//! A program is bound to one frame's uniforms and shades a single plane
//! point at a time; [`render_frame`](crate::renderer::render_frame) fans it
//! out over the frame.

use mandelgl_core::{Complex, JuliaUniforms, MandelbrotUniforms};

use crate::palette::{blend, smooth_iteration, theme_palettes, Palette};

/// Bailout: an orbit has escaped once `|z|² > ESCAPE_RADIUS_SQ`.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

const CROSSHAIR_COLOR: [u8; 3] = [255, 255, 255];
const CROSSHAIR_ALPHA: u8 = 191;

/// Something that can colour one pixel of a view.
pub trait FragmentProgram {
    /// Plane point at the frame center.
    fn center(&self) -> Complex;

    /// Half-width and half-height of the visible rectangle.
    fn half_extents(&self) -> Complex;

    /// Colour at `point`. `pixel_size` is the plane-space height of one
    /// pixel, for overlays that must stay a fixed number of pixels wide.
    fn shade(&self, point: Complex, pixel_size: f64) -> [u8; 4];
}

/// Iterate `z ← z² + c` from `z0`; the smoothed escape count, or `None`
/// if the orbit stays bounded for `max_iterations` steps.
#[inline]
pub fn escape_time(z0: Complex, c: Complex, max_iterations: u32) -> Option<f64> {
    let mut z = z0;
    for n in 0..max_iterations {
        z = z.square_add(c);
        let norm_sq = z.norm_sq();
        if norm_sq > ESCAPE_RADIUS_SQ {
            return Some(smooth_iteration(n, norm_sq));
        }
    }
    None
}

/// The built programs: the baked palettes every frame samples from.
///
/// Building this is the only setup step; until it exists the app has
/// nothing to render with.
#[derive(Clone)]
pub struct ProgramSet {
    palettes: [Palette; 4],
}

impl ProgramSet {
    pub fn build() -> Self {
        Self {
            palettes: theme_palettes(),
        }
    }

    pub fn palette(&self, theme: mandelgl_core::Theme) -> &Palette {
        &self.palettes[theme.id() as usize]
    }

    pub fn mandelbrot<'a>(&'a self, uniforms: &MandelbrotUniforms) -> MandelbrotProgram<'a> {
        MandelbrotProgram {
            uniforms: *uniforms,
            palette: self.palette(uniforms.theme),
        }
    }

    pub fn julia<'a>(&'a self, uniforms: &JuliaUniforms) -> JuliaProgram<'a> {
        JuliaProgram {
            uniforms: *uniforms,
            palette: self.palette(uniforms.theme),
        }
    }
}

/// `z₀ = 0`, `c = point`.
pub struct MandelbrotProgram<'a> {
    uniforms: MandelbrotUniforms,
    palette: &'a Palette,
}

impl FragmentProgram for MandelbrotProgram<'_> {
    fn center(&self) -> Complex {
        self.uniforms.center
    }

    fn half_extents(&self) -> Complex {
        self.uniforms.half_extents
    }

    fn shade(&self, point: Complex, _pixel_size: f64) -> [u8; 4] {
        let u = &self.uniforms;
        let mu = escape_time(Complex::ZERO, point, u.max_iterations);
        self.palette.color(mu, u.max_iterations, u.color_compression)
    }
}

/// `z₀ = point`, `c = julia_constant`, with a crosshair marking the
/// constant.
pub struct JuliaProgram<'a> {
    uniforms: JuliaUniforms,
    palette: &'a Palette,
}

impl JuliaProgram<'_> {
    /// Whether `point` lies on one of the crosshair's two arms.
    fn on_crosshair(&self, point: Complex, pixel_size: f64) -> bool {
        let u = &self.uniforms;
        let d = point - u.cursor_position;
        let (dx, dy) = (d.re.abs(), d.im.abs());
        let half_width = pixel_size;
        (dx <= half_width && dy <= u.cursor_size) || (dy <= half_width && dx <= u.cursor_size)
    }
}

impl FragmentProgram for JuliaProgram<'_> {
    fn center(&self) -> Complex {
        self.uniforms.center
    }

    fn half_extents(&self) -> Complex {
        self.uniforms.half_extents
    }

    fn shade(&self, point: Complex, pixel_size: f64) -> [u8; 4] {
        let u = &self.uniforms;
        let mu = escape_time(point, u.julia_constant, u.max_iterations);
        let color = self.palette.color(mu, u.max_iterations, u.color_compression);
        if self.on_crosshair(point, pixel_size) {
            blend(color, CROSSHAIR_COLOR, CROSSHAIR_ALPHA)
        } else {
            color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelgl_core::Theme;

    fn julia_uniforms(c: Complex) -> JuliaUniforms {
        JuliaUniforms {
            julia_constant: c,
            center: Complex::ZERO,
            half_extents: Complex::new(1.0, 1.0),
            max_iterations: 128,
            theme: Theme::Default,
            color_compression: 1.0,
            cursor_position: c,
            cursor_size: 0.1,
        }
    }

    #[test]
    fn origin_is_in_the_mandelbrot_set() {
        assert_eq!(escape_time(Complex::ZERO, Complex::ZERO, 500), None);
        assert_eq!(escape_time(Complex::ZERO, Complex::new(-1.0, 0.0), 500), None);
    }

    #[test]
    fn far_points_escape_immediately() {
        let mu = escape_time(Complex::ZERO, Complex::new(3.0, 0.0), 500).unwrap();
        assert!(mu < 2.0);
    }

    #[test]
    fn more_iterations_never_unescape() {
        let c = Complex::new(-0.75, 0.1);
        let low = escape_time(Complex::ZERO, c, 50);
        let high = escape_time(Complex::ZERO, c, 5000);
        if low.is_some() {
            assert_eq!(low, high);
        }
    }

    #[test]
    fn mandelbrot_interior_pixel_is_black() {
        let programs = ProgramSet::build();
        let u = MandelbrotUniforms {
            center: Complex::new(-0.5, 0.0),
            half_extents: Complex::new(1.5, 1.0),
            max_iterations: 256,
            theme: Theme::Light,
            color_compression: 1.0,
        };
        let program = programs.mandelbrot(&u);
        assert_eq!(program.shade(Complex::new(-0.2, 0.0), 0.01), [0, 0, 0, 255]);
        assert_ne!(program.shade(Complex::new(1.5, 1.5), 0.01), [0, 0, 0, 255]);
    }

    #[test]
    fn crosshair_covers_arms_only() {
        let programs = ProgramSet::build();
        let c = Complex::new(0.3, 0.5);
        let program = programs.julia(&julia_uniforms(c));
        let px = 0.005;
        assert!(program.on_crosshair(c, px));
        assert!(program.on_crosshair(c + Complex::new(0.09, 0.0), px));
        assert!(program.on_crosshair(c + Complex::new(0.0, -0.09), px));
        assert!(!program.on_crosshair(c + Complex::new(0.11, 0.0), px));
        assert!(!program.on_crosshair(c + Complex::new(0.05, 0.05), px));
    }

    #[test]
    fn julia_uses_constant_not_point_as_c() {
        let programs = ProgramSet::build();
        let program = programs.julia(&julia_uniforms(Complex::ZERO));
        // c = 0: the unit disc is the filled Julia set.
        assert_eq!(program.shade(Complex::new(0.5, 0.5), 1e-6), [0, 0, 0, 255]);
        assert_ne!(program.shade(Complex::new(1.2, 0.0), 1e-6), [0, 0, 0, 255]);
    }
}
