use crate::settings::ViewSettings;
use crate::viewport::ViewportState;

/// What one easing step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EaseStep {
    pub zoom_moved: bool,
    /// False once both zoom and center are within tolerance of their targets.
    pub animating: bool,
}

/// Advance `center` and `zoom` one frame toward their targets.
///
/// Zoom decays by `zoom_speed` of its residual and stops writing once the
/// residual is within `zoom_epsilon`. The center decays by `lerp_factor`
/// every frame with no cutoff; the factor is at most 1, so it never
/// overshoots.
///
/// Both zooms are kept inside the configured zoom range, and a non-finite
/// center snaps to whichever of `center` and `target_center` is still finite.
pub fn step(state: &mut ViewportState, settings: &ViewSettings) -> EaseStep {
    state.target_zoom = settings.clamp_zoom(state.target_zoom);
    state.zoom = settings.clamp_zoom(state.zoom);
    if !state.target_center.is_finite() && state.center.is_finite() {
        state.target_center = state.center;
    }
    if !state.center.is_finite() && state.target_center.is_finite() {
        state.center = state.target_center;
    }

    let zoom_diff = state.target_zoom - state.zoom;
    let zoom_moved = zoom_diff.abs() > settings.zoom_epsilon;
    if zoom_moved {
        state.zoom += zoom_diff * settings.zoom_speed;
    }

    state.center = state.center.lerp(state.target_center, settings.lerp_factor);

    EaseStep {
        zoom_moved,
        animating: !state.is_settled(settings),
    }
}
