use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Which held modifier turns a primary click into a recenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecenterModifier {
    #[default]
    Ctrl,
    Alt,
    /// Either modifier recenters.
    Either,
}

impl RecenterModifier {
    /// Whether the given modifier state arms a recenter click.
    pub fn is_armed(self, ctrl: bool, alt: bool) -> bool {
        match self {
            Self::Ctrl => ctrl,
            Self::Alt => alt,
            Self::Either => ctrl || alt,
        }
    }
}

/// Tunables for the interaction and easing model.
///
/// Every field has a default, so a settings file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Zoom base: the visible half-height is `scale_per_zoom^-zoom`.
    pub scale_per_zoom: f64,
    /// Fraction of the zoom residual applied per frame.
    pub zoom_speed: f64,
    /// Zoom residual below which easing stops writing.
    pub zoom_epsilon: f64,
    /// Fraction of the center residual applied per frame.
    pub lerp_factor: f64,
    /// Zoom change per `q`/`e` key press.
    pub key_zoom_step: f64,
    /// Multiplier applied to the raw wheel delta before clamping.
    pub wheel_gain: f64,
    /// Symmetric clamp on the amplified wheel delta; the result is divided
    /// by this, so one wheel event moves zoom by at most 1.0.
    pub wheel_clamp: f64,
    /// Half-length of the Julia crosshair arms, in plane units.
    pub julia_cursor_size: f64,
    /// Lowest zoom any handler or easing step may reach.
    pub min_zoom: f64,
    /// Highest zoom any handler or easing step may reach.
    pub max_zoom: f64,
    pub initial_center: Complex,
    pub initial_zoom: f64,
    /// Slider exponent; the iteration cap is `2^initial_iterations_exponent`.
    pub initial_iterations_exponent: i32,
    pub initial_theme: i32,
    pub initial_color_compression: f64,
    pub recenter_modifier: RecenterModifier,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            scale_per_zoom: 1.5,
            zoom_speed: 0.1,
            zoom_epsilon: 0.001,
            lerp_factor: 0.15,
            key_zoom_step: 0.2,
            wheel_gain: 5.0,
            wheel_clamp: 100.0,
            julia_cursor_size: 0.1,
            min_zoom: -20.0,
            max_zoom: 80.0,
            initial_center: Complex::new(-0.5, 0.0),
            initial_zoom: 0.0,
            initial_iterations_exponent: 8,
            initial_theme: 2,
            initial_color_compression: 1.0,
            recenter_modifier: RecenterModifier::default(),
        }
    }
}

impl ViewSettings {
    /// Check that the settings describe a usable interaction model.
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.scale_per_zoom.is_finite() && self.scale_per_zoom > 1.0) {
            return Err(invalid(format!(
                "scale_per_zoom must be finite and > 1.0, got {}",
                self.scale_per_zoom
            )));
        }
        for (name, value) in [
            ("zoom_speed", self.zoom_speed),
            ("lerp_factor", self.lerp_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{name} must be in (0, 1], got {value}")));
            }
        }
        for (name, value) in [
            ("zoom_epsilon", self.zoom_epsilon),
            ("key_zoom_step", self.key_zoom_step),
            ("wheel_gain", self.wheel_gain),
            ("wheel_clamp", self.wheel_clamp),
            ("julia_cursor_size", self.julia_cursor_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!(
                    "{name} must be finite and > 0.0, got {value}"
                )));
            }
        }
        let range_ok =
            self.min_zoom.is_finite() && self.max_zoom.is_finite() && self.min_zoom < self.max_zoom;
        if !range_ok {
            return Err(invalid(format!(
                "zoom range must be finite with min < max, got {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        // Both ends must keep the visible half-extents finite and non-zero.
        let widest = self.scale_per_zoom.powf(-self.min_zoom);
        let narrowest = self.scale_per_zoom.powf(-self.max_zoom);
        if !(widest.is_finite() && narrowest.is_normal()) {
            return Err(invalid(format!(
                "zoom range {}..{} overflows the view extents",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.initial_center.is_finite() || !self.initial_zoom.is_finite() {
            return Err(invalid("initial view must be finite".to_string()));
        }
        if self.initial_zoom < self.min_zoom || self.initial_zoom > self.max_zoom {
            return Err(invalid(format!(
                "initial_zoom {} is outside {}..{}",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }

    /// Pull `zoom` into `min_zoom..=max_zoom`. A NaN zoom lands on `min_zoom`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

fn invalid(reason: String) -> CoreError {
    CoreError::InvalidSettings { reason }
}
