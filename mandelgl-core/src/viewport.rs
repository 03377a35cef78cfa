use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::mapper::PlaneView;
use crate::settings::ViewSettings;

/// Largest accepted iteration-slider exponent (`2^30` still fits a `u32`).
pub const MAX_SLIDER_EXPONENT: i32 = 30;

/// Color palette selector, passed straight through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default = 0,
    Dark = 1,
    Light = 2,
    Blue = 3,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Dark, Theme::Light, Theme::Blue];

    pub fn from_id(id: i32) -> crate::Result<Self> {
        match id {
            0 => Ok(Self::Default),
            1 => Ok(Self::Dark),
            2 => Ok(Self::Light),
            3 => Ok(Self::Blue),
            other => Err(CoreError::InvalidTheme(other)),
        }
    }

    /// The integer id handed to the renderer.
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::Blue => "Blue",
        }
    }
}

/// Touch bookkeeping kept between a touch-start and the matching touch-end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchScratch {
    /// Last single-finger position, or the two-finger midpoint.
    pub prev_position: Option<Complex>,
    /// Last distance between two fingers.
    pub prev_distance: Option<f64>,
}

impl TouchScratch {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The interaction state shared by every handler and the animation step.
///
/// Handlers write the `target_*` fields; the per-frame easing step moves
/// `center` and `zoom` toward them. Everything else is read by the renderer
/// as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub center: Complex,
    pub target_center: Complex,
    pub zoom: f64,
    pub target_zoom: f64,
    pub max_iterations: u32,
    pub julia_constant: Complex,
    pub theme: Theme,
    pub color_compression: f64,
    pub ctrl_pressed: bool,
    pub alt_pressed: bool,
    pub touch: TouchScratch,
    /// Last Mandelbrot-space pointer position, for the coordinate readout.
    pub pointer: Option<Complex>,
    initial_view: PlaneView,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(&ViewSettings::default())
    }
}

impl ViewportState {
    /// Fresh state at the configured starting view.
    ///
    /// Out-of-range initial values in `settings` fall back to the stock
    /// defaults (256 iterations, theme 2, compression 1.0).
    pub fn new(settings: &ViewSettings) -> Self {
        let max_iterations =
            iterations_from_slider(settings.initial_iterations_exponent).unwrap_or(256);
        let theme = Theme::from_id(settings.initial_theme).unwrap_or(Theme::Light);
        let color_compression = if settings.initial_color_compression.is_finite()
            && settings.initial_color_compression > 0.0
        {
            settings.initial_color_compression
        } else {
            1.0
        };
        Self {
            center: settings.initial_center,
            target_center: settings.initial_center,
            zoom: settings.initial_zoom,
            target_zoom: settings.initial_zoom,
            max_iterations,
            julia_constant: Complex::ZERO,
            theme,
            color_compression,
            ctrl_pressed: false,
            alt_pressed: false,
            touch: TouchScratch::default(),
            pointer: None,
            initial_view: PlaneView::new(settings.initial_center, settings.initial_zoom),
        }
    }

    /// The view as currently drawn.
    pub fn current_view(&self) -> PlaneView {
        PlaneView::new(self.center, self.zoom)
    }

    /// The view easing will settle on.
    pub fn target_view(&self) -> PlaneView {
        PlaneView::new(self.target_center, self.target_zoom)
    }

    /// `maxIterations = 2^value`.
    pub fn set_max_iterations_from_slider(&mut self, value: i32) -> crate::Result<u32> {
        self.max_iterations = iterations_from_slider(value)?;
        debug!(value, max_iterations = self.max_iterations, "iteration cap changed");
        Ok(self.max_iterations)
    }

    pub fn set_theme(&mut self, id: i32) -> crate::Result<Theme> {
        self.theme = Theme::from_id(id)?;
        debug!(theme = self.theme.label(), "theme changed");
        Ok(self.theme)
    }

    pub fn set_color_compression(&mut self, value: f64) -> crate::Result<f64> {
        if !(value.is_finite() && value > 0.0) {
            return Err(CoreError::InvalidColorCompression(value));
        }
        self.color_compression = value;
        Ok(value)
    }

    /// Ease back to the starting view.
    pub fn reset_view(&mut self) {
        self.target_center = self.initial_view.center;
        self.target_zoom = self.initial_view.zoom;
    }

    /// Zoom level as shown to the user.
    pub fn zoom_label(&self) -> i64 {
        self.zoom.round() as i64
    }

    /// True when easing has nothing visible left to do.
    pub fn is_settled(&self, settings: &ViewSettings) -> bool {
        let half = crate::mapper::visible_half_extents(self.zoom, 1.0, settings.scale_per_zoom);
        // Center residual is measured in view heights so deep zooms settle too.
        let residual = self.center.distance(self.target_center) / half.im;
        (self.target_zoom - self.zoom).abs() <= settings.zoom_epsilon
            && residual <= settings.zoom_epsilon
    }
}

/// `2^value`, rejecting exponents that would not fit a `u32` iteration cap.
pub fn iterations_from_slider(value: i32) -> crate::Result<u32> {
    if !(0..=MAX_SLIDER_EXPONENT).contains(&value) {
        return Err(CoreError::InvalidSliderValue(value));
    }
    Ok(1u32 << value)
}
