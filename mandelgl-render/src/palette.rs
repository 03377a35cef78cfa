use mandelgl_core::Theme;

const LUT_SIZE: usize = 256;

/// Colour for points that never escape.
pub const INTERIOR: [u8; 4] = [0, 0, 0, 255];

/// A theme's gradient, baked into a lookup table.
///
/// Escaped points are placed on the gradient by their smoothed iteration
/// count relative to the iteration cap, bent by the color-compression
/// exponent, and linearly interpolated between adjacent entries.
#[derive(Clone)]
pub struct Palette {
    pub theme: Theme,
    colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn new(theme: Theme, colors: Vec<[u8; 4]>) -> Self {
        assert!(!colors.is_empty());
        Self { theme, colors }
    }

    /// The baked palette for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        let stops: &[(f64, [u8; 3])] = match theme {
            Theme::Default => &[
                (0.0, [0, 7, 100]),
                (0.16, [32, 107, 203]),
                (0.42, [237, 255, 255]),
                (0.6425, [255, 170, 0]),
                (0.8575, [0, 2, 0]),
                (1.0, [0, 7, 100]),
            ],
            Theme::Dark => &[
                (0.0, [0, 0, 0]),
                (0.3, [40, 0, 60]),
                (0.6, [150, 20, 90]),
                (0.85, [250, 120, 40]),
                (1.0, [255, 240, 200]),
            ],
            Theme::Light => &[
                (0.0, [250, 250, 245]),
                (0.25, [200, 220, 240]),
                (0.5, [120, 160, 220]),
                (0.75, [240, 180, 120]),
                (1.0, [120, 40, 30]),
            ],
            Theme::Blue => &[
                (0.0, [0, 0, 30]),
                (0.3, [0, 50, 120]),
                (0.6, [0, 150, 200]),
                (0.8, [100, 220, 255]),
                (1.0, [240, 255, 255]),
            ],
        };
        Self::new(theme, gradient_lut(stops))
    }

    /// Colour for a smoothed escape count `mu` out of `max_iterations`.
    ///
    /// `None` means the point did not escape.
    pub fn color(&self, mu: Option<f64>, max_iterations: u32, compression: f64) -> [u8; 4] {
        let Some(mu) = mu else {
            return INTERIOR;
        };
        let t = (mu / max_iterations.max(1) as f64).clamp(0.0, 1.0);
        let t = t.powf(compression);
        self.sample(t * (self.colors.len() - 1) as f64)
    }

    /// Generate a preview strip (for the theme selector).
    pub fn preview_colors(&self, count: usize) -> Vec<[u8; 4]> {
        (0..count)
            .map(|i| {
                let t = i as f64 / count.saturating_sub(1).max(1) as f64;
                self.sample(t * (self.colors.len() - 1) as f64)
            })
            .collect()
    }

    fn sample(&self, idx: f64) -> [u8; 4] {
        let last = self.colors.len() - 1;
        let idx = idx.clamp(0.0, last as f64);
        let lo = idx.floor() as usize;
        let hi = (lo + 1).min(last);
        lerp_color(self.colors[lo], self.colors[hi], idx - lo as f64)
    }
}

/// All four theme palettes, indexed by theme id.
pub fn theme_palettes() -> [Palette; 4] {
    Theme::ALL.map(Palette::for_theme)
}

/// Smoothed (continuous) iteration count for an orbit that escaped at
/// step `iterations` with `|z|² = norm_sq`:  `ν = n + 1 − log₂(ln |z|)`.
pub fn smooth_iteration(iterations: u32, norm_sq: f64) -> f64 {
    let log_zn = norm_sq.ln() * 0.5;
    if log_zn <= 0.0 {
        return iterations as f64;
    }
    (iterations as f64 + 1.0 - log_zn.ln() / std::f64::consts::LN_2).max(0.0)
}

/// Alpha-blend `over` onto `base` (both opaque RGBA, `alpha` in 0..=255).
pub fn blend(base: [u8; 4], over: [u8; 3], alpha: u8) -> [u8; 4] {
    let a = alpha as u32;
    let inv = 255 - a;
    [
        ((base[0] as u32 * inv + over[0] as u32 * a) / 255) as u8,
        ((base[1] as u32 * inv + over[1] as u32 * a) / 255) as u8,
        ((base[2] as u32 * inv + over[2] as u32 * a) / 255) as u8,
        255,
    ]
}

fn lerp_color(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let inv = 1.0 - t;
    [
        (a[0] as f64 * inv + b[0] as f64 * t) as u8,
        (a[1] as f64 * inv + b[1] as f64 * t) as u8,
        (a[2] as f64 * inv + b[2] as f64 * t) as u8,
        255,
    ]
}

/// Build a gradient LUT by interpolating between color stops.
fn gradient_lut(stops: &[(f64, [u8; 3])]) -> Vec<[u8; 4]> {
    (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / (LUT_SIZE - 1) as f64;
            let lo = stops.iter().rposition(|&(pos, _)| pos <= t).unwrap_or(0);
            let hi = (lo + 1).min(stops.len() - 1);
            let (lo_t, lo_c) = stops[lo];
            let (hi_t, hi_c) = stops[hi];
            let frac = if (hi_t - lo_t).abs() < 1e-10 {
                0.0
            } else {
                ((t - lo_t) / (hi_t - lo_t)).clamp(0.0, 1.0)
            };
            let inv = 1.0 - frac;
            [
                (lo_c[0] as f64 * inv + hi_c[0] as f64 * frac) as u8,
                (lo_c[1] as f64 * inv + hi_c[1] as f64 * frac) as u8,
                (lo_c[2] as f64 * inv + hi_c[2] as f64 * frac) as u8,
                255,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_is_black() {
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(palette.color(None, 256, 1.0), INTERIOR);
    }

    #[test]
    fn gradient_endpoints_match_stops() {
        let palette = Palette::for_theme(Theme::Blue);
        assert_eq!(palette.color(Some(0.0), 100, 1.0), [0, 0, 30, 255]);
        assert_eq!(palette.color(Some(100.0), 100, 1.0), [240, 255, 255, 255]);
        // Past the cap clamps to the last entry.
        assert_eq!(palette.color(Some(500.0), 100, 1.0), [240, 255, 255, 255]);
    }

    #[test]
    fn compression_bends_palette_position() {
        let palette = Palette::for_theme(Theme::Dark);
        let linear = palette.color(Some(25.0), 100, 1.0);
        let compressed = palette.color(Some(25.0), 100, 0.5);
        // t = 0.25 vs t = 0.5: lower exponent moves further along the gradient.
        assert_ne!(linear, compressed);
        assert_eq!(compressed, palette.color(Some(50.0), 100, 1.0));
    }

    #[test]
    fn themes_differ() {
        let palettes = theme_palettes();
        for (i, p) in palettes.iter().enumerate() {
            assert_eq!(p.theme.id(), i as i32);
        }
        assert_ne!(palettes[0].preview_colors(8), palettes[2].preview_colors(8));
    }

    #[test]
    fn smooth_iteration_is_continuous_near_escape() {
        // |z| = 2 exactly (norm_sq 4): ln ln 2 < 0, so ν = n + 1 + something positive.
        let a = smooth_iteration(10, 4.0);
        let b = smooth_iteration(10, 16.0);
        assert!(a > b, "larger |z| at escape means earlier effective escape");
        assert!(smooth_iteration(0, 0.5) == 0.0);
    }

    #[test]
    fn blend_weights() {
        assert_eq!(blend([0, 0, 0, 255], [255, 255, 255], 255), [255, 255, 255, 255]);
        assert_eq!(blend([10, 20, 30, 255], [255, 255, 255], 0), [10, 20, 30, 255]);
    }
}
