//! Input gesture handlers.
//!
//! Each handler turns one raw event into a [`ViewportState`] mutation,
//! mapping through the current or target [`PlaneView`]. Handlers never
//! block; a non-drawable canvas makes every mapping handler a no-op.

use tracing::debug;

use crate::canvas::Canvas;
use crate::complex::Complex;
use crate::input::{InputEvent, InputOutcome, Key, PointerButton, TouchPoint};
use crate::julia;
use crate::mapper::{pinch_zoom_delta, PlaneView};
use crate::settings::ViewSettings;
use crate::viewport::ViewportState;

/// The authoritative handler set, parameterised by the view settings.
#[derive(Debug, Clone, Default)]
pub struct Gestures {
    settings: ViewSettings,
}

impl Gestures {
    pub fn new(settings: ViewSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Dispatch one event to its handler.
    pub fn handle(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        event: &InputEvent,
    ) -> InputOutcome {
        match event {
            InputEvent::PointerMoved {
                x,
                y,
                movement_x,
                movement_y,
                primary_down,
            } => {
                let mut outcome = InputOutcome::ignored();
                if *primary_down {
                    outcome = self.drag_pan(state, canvas, *movement_x, *movement_y);
                }
                outcome.merge(self.track_pointer(state, canvas, *x, *y))
            }
            InputEvent::PointerPressed { x, y, button } => {
                self.recenter_click(state, canvas, *x, *y, *button)
            }
            InputEvent::Wheel { x, y, delta_y } => self.wheel_zoom(state, canvas, *x, *y, *delta_y),
            InputEvent::KeyDown(key) => self.key_down(state, *key),
            InputEvent::KeyUp(key) => self.key_up(state, *key),
            InputEvent::TouchStart(touches) => self.touch_start(state, canvas, touches),
            InputEvent::TouchMove(touches) => self.touch_move(state, canvas, touches),
            InputEvent::TouchEnd(touches) => self.touch_end(state, canvas, touches),
            InputEvent::FocusLost => {
                state.ctrl_pressed = false;
                state.alt_pressed = false;
                state.touch.clear();
                InputOutcome::ignored()
            }
        }
    }

    /// Zoom toward the pointer.
    ///
    /// The plane point under the pointer is read from the target view
    /// before and after the zoom target moves, and the target center
    /// absorbs the difference, so once easing settles that point is still
    /// under the pointer.
    pub fn wheel_zoom(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        x: f64,
        y: f64,
        delta_y: f64,
    ) -> InputOutcome {
        let s = self.settings.scale_per_zoom;
        let Some(before) = state.target_view().to_complex_plane(x, y, canvas, s) else {
            return InputOutcome::ignored();
        };
        let clamp = self.settings.wheel_clamp;
        let delta = (-delta_y * self.settings.wheel_gain).clamp(-clamp, clamp) / clamp;
        state.target_zoom = self.settings.clamp_zoom(state.target_zoom + delta);

        if let Some(after) = state.target_view().to_complex_plane(x, y, canvas, s) {
            let correction = before - after;
            if correction.is_finite() {
                state.target_center += correction;
            }
        }
        InputOutcome::view()
    }

    /// Pan by a screen-space pointer movement while the primary button is
    /// held. Writes the target so the motion is eased.
    pub fn drag_pan(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        movement_x: f64,
        movement_y: f64,
    ) -> InputOutcome {
        let view = state.current_view();
        match view.drag_offset(movement_x, movement_y, canvas, self.settings.scale_per_zoom) {
            Some(offset) => {
                state.target_center += offset;
                InputOutcome::view()
            }
            None => InputOutcome::ignored(),
        }
    }

    /// Follow the pointer over the Mandelbrot view with the Julia constant.
    pub fn track_pointer(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        x: f64,
        y: f64,
    ) -> InputOutcome {
        let view = state.current_view();
        match view.to_complex_plane(x, y, canvas, self.settings.scale_per_zoom) {
            Some(point) => InputOutcome {
                julia_changed: julia::follow_pointer(state, point),
                ..InputOutcome::ignored()
            },
            None => InputOutcome::ignored(),
        }
    }

    /// With the recenter modifier held, a primary press sends the view to
    /// the clicked point.
    pub fn recenter_click(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        x: f64,
        y: f64,
        button: PointerButton,
    ) -> InputOutcome {
        let armed = self
            .settings
            .recenter_modifier
            .is_armed(state.ctrl_pressed, state.alt_pressed);
        if !armed || button != PointerButton::Primary {
            return InputOutcome::ignored();
        }
        let view = state.current_view();
        match view.to_complex_plane(x, y, canvas, self.settings.scale_per_zoom) {
            Some(point) => {
                debug!(re = point.re, im = point.im, "recenter");
                state.target_center = point;
                InputOutcome::view()
            }
            None => InputOutcome::ignored(),
        }
    }

    pub fn key_down(&self, state: &mut ViewportState, key: Key) -> InputOutcome {
        match key {
            Key::Control => {
                debug!("Ctrl pressed");
                state.ctrl_pressed = true;
                InputOutcome::ignored()
            }
            Key::Alt => {
                debug!("Alt pressed");
                state.alt_pressed = true;
                InputOutcome::ignored()
            }
            Key::Char(c) => match c.to_ascii_lowercase() {
                'q' => {
                    let zoom = state.target_zoom - self.settings.key_zoom_step;
                    state.target_zoom = self.settings.clamp_zoom(zoom);
                    InputOutcome::view()
                }
                'e' => {
                    let zoom = state.target_zoom + self.settings.key_zoom_step;
                    state.target_zoom = self.settings.clamp_zoom(zoom);
                    InputOutcome::view()
                }
                'r' => {
                    state.reset_view();
                    InputOutcome::view()
                }
                _ => InputOutcome::ignored(),
            },
            Key::Other => InputOutcome::ignored(),
        }
    }

    pub fn key_up(&self, state: &mut ViewportState, key: Key) -> InputOutcome {
        match key {
            Key::Control => {
                debug!("Ctrl released");
                state.ctrl_pressed = false;
            }
            Key::Alt => {
                debug!("Alt released");
                state.alt_pressed = false;
            }
            Key::Char(_) | Key::Other => {}
        }
        InputOutcome::ignored()
    }

    /// Record the baseline for the gesture that is starting.
    pub fn touch_start(
        &self,
        state: &mut ViewportState,
        _canvas: &Canvas,
        touches: &[TouchPoint],
    ) -> InputOutcome {
        rebaseline(state, touches);
        InputOutcome {
            consumed: true,
            ..InputOutcome::ignored()
        }
    }

    /// One finger pans; two fingers pinch-zoom around their midpoint and
    /// pan with it.
    pub fn touch_move(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        touches: &[TouchPoint],
    ) -> InputOutcome {
        match touches {
            [touch] => self.touch_pan(state, canvas, touch.position()),
            [first, second] => self.pinch(state, canvas, *first, *second),
            _ => InputOutcome {
                consumed: true,
                ..InputOutcome::ignored()
            },
        }
    }

    /// Drop the finished gesture's baseline. No stale position or distance
    /// survives into the next gesture.
    pub fn touch_end(
        &self,
        state: &mut ViewportState,
        _canvas: &Canvas,
        touches: &[TouchPoint],
    ) -> InputOutcome {
        rebaseline(state, touches);
        InputOutcome {
            consumed: true,
            ..InputOutcome::ignored()
        }
    }

    fn touch_pan(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        position: Complex,
    ) -> InputOutcome {
        let Some(prev) = state.touch.prev_position.replace(position) else {
            return InputOutcome {
                consumed: true,
                ..InputOutcome::ignored()
            };
        };
        let movement = (position - prev) * canvas.pixel_ratio;
        let mut outcome = self.drag_pan(state, canvas, movement.re, movement.im);
        outcome.consumed = true;
        outcome
    }

    fn pinch(
        &self,
        state: &mut ViewportState,
        canvas: &Canvas,
        first: TouchPoint,
        second: TouchPoint,
    ) -> InputOutcome {
        let s = self.settings.scale_per_zoom;
        let midpoint = (first.position() + second.position()) * 0.5;
        let distance = first.position().distance(second.position());
        let prev_position = state.touch.prev_position.replace(midpoint);
        let prev_distance = state.touch.prev_distance.replace(distance);

        let mut outcome = InputOutcome {
            consumed: true,
            ..InputOutcome::ignored()
        };
        if !canvas.is_drawable() {
            return outcome;
        }

        // Two-finger drag: the midpoint carries the content with it.
        if let Some(prev) = prev_position {
            let movement = (midpoint - prev) * canvas.pixel_ratio;
            if let Some(offset) = state
                .current_view()
                .drag_offset(movement.re, movement.im, canvas, s)
            {
                state.center += offset;
                state.target_center += offset;
                outcome.view_changed = true;
            }
        }

        let Some(prev_distance) = prev_distance else {
            return outcome;
        };
        if !(prev_distance > 0.0 && distance > 0.0) {
            return outcome;
        }
        let delta = pinch_zoom_delta(prev_distance, distance, s);

        // Zoom is applied unsmoothed, anchored on the midpoint. The target
        // follows so easing does not pull the pinch back.
        let anchor_px = midpoint * canvas.pixel_ratio;
        let anchor = state
            .current_view()
            .to_complex_plane(anchor_px.re, anchor_px.im, canvas, s);
        let zoom = self.settings.clamp_zoom(state.zoom + delta);
        let applied = zoom - state.zoom;
        state.zoom = zoom;
        state.target_zoom = self.settings.clamp_zoom(state.target_zoom + applied);
        if let Some(anchor) = anchor {
            let shift = anchor_shift(state.current_view(), anchor, applied, s);
            if shift.is_finite() {
                state.center += shift;
                state.target_center += shift;
            }
        }
        outcome.view_changed = true;
        outcome
    }
}

/// Reset the touch scratch to match the contacts still down.
fn rebaseline(state: &mut ViewportState, touches: &[TouchPoint]) {
    match touches {
        [] => state.touch.clear(),
        [touch] => {
            state.touch.prev_position = Some(touch.position());
            state.touch.prev_distance = None;
        }
        [first, second, ..] => {
            state.touch.prev_position = Some((first.position() + second.position()) * 0.5);
            state.touch.prev_distance = Some(first.position().distance(second.position()));
        }
    }
}

/// Center shift that keeps `anchor` on the same pixel after a zoom change of
/// `delta`: the anchor-to-center vector shrinks by `s^delta`.
fn anchor_shift(view: PlaneView, anchor: Complex, delta: f64, scale_per_zoom: f64) -> Complex {
    let new_center = anchor - (anchor - view.center) * scale_per_zoom.powf(-delta);
    new_center - view.center
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn canvas() -> Canvas {
        Canvas::new(800.0, 600.0, 1.0)
    }

    fn gestures() -> Gestures {
        Gestures::default()
    }

    #[test]
    fn wheel_delta_is_clamped() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.wheel_zoom(&mut state, &canvas(), 400.0, 300.0, -3.0);
        assert!((state.target_zoom - 0.15).abs() < EPSILON);

        let mut state = ViewportState::default();
        g.wheel_zoom(&mut state, &canvas(), 400.0, 300.0, -500.0);
        assert!((state.target_zoom - 1.0).abs() < EPSILON);

        let mut state = ViewportState::default();
        g.wheel_zoom(&mut state, &canvas(), 400.0, 300.0, 500.0);
        assert!((state.target_zoom + 1.0).abs() < EPSILON);
        assert_eq!(state.zoom, 0.0, "wheel only moves the target");
    }

    #[test]
    fn wheel_keeps_point_under_cursor_in_target_view() {
        let g = gestures();
        let canvas = canvas();
        let s = g.settings().scale_per_zoom;
        let mut state = ViewportState::default();
        let (x, y) = (620.0, 110.0);
        let before = state.target_view().to_complex_plane(x, y, &canvas, s).unwrap();

        g.wheel_zoom(&mut state, &canvas, x, y, -100.0);

        assert!(state.target_center != Complex::new(-0.5, 0.0), "correction applied");
        let after = state.target_view().to_complex_plane(x, y, &canvas, s).unwrap();
        assert!(before.distance(after) < EPSILON);
    }

    #[test]
    fn wheel_at_canvas_center_does_not_shift() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.wheel_zoom(&mut state, &canvas(), 400.0, 300.0, -100.0);
        assert!(state.target_center.distance(Complex::new(-0.5, 0.0)) < EPSILON);
    }

    #[test]
    fn wheel_on_empty_canvas_is_ignored() {
        let g = gestures();
        let mut state = ViewportState::default();
        let outcome = g.wheel_zoom(&mut state, &Canvas::new(0.0, 0.0, 1.0), 1.0, 1.0, -100.0);
        assert_eq!(outcome, InputOutcome::ignored());
        assert_eq!(state.target_zoom, 0.0);
    }

    #[test]
    fn drag_moves_target_not_center() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.drag_pan(&mut state, &canvas(), 10.0, 0.0);
        assert!(state.target_center.re < -0.5);
        assert_eq!(state.center, Complex::new(-0.5, 0.0));
    }

    #[test]
    fn downward_drag_raises_target_imaginary() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.drag_pan(&mut state, &canvas(), 0.0, 12.0);
        assert!(state.target_center.im > 0.0);
    }

    #[test]
    fn pointer_move_without_button_only_tracks() {
        let g = gestures();
        let mut state = ViewportState::default();
        let outcome = g.handle(
            &mut state,
            &canvas(),
            &InputEvent::PointerMoved {
                x: 400.0,
                y: 300.0,
                movement_x: 30.0,
                movement_y: 30.0,
                primary_down: false,
            },
        );
        assert!(outcome.julia_changed);
        assert!(!outcome.view_changed);
        assert_eq!(state.target_center, Complex::new(-0.5, 0.0));
        assert!(state.julia_constant.distance(Complex::new(-0.5, 0.0)) < EPSILON);
        assert_eq!(state.pointer, Some(state.julia_constant));
    }

    #[test]
    fn keyboard_zoom_is_case_insensitive() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.key_down(&mut state, Key::Char('e'));
        g.key_down(&mut state, Key::Char('E'));
        assert!((state.target_zoom - 0.4).abs() < EPSILON);
        g.key_down(&mut state, Key::Char('Q'));
        assert!((state.target_zoom - 0.2).abs() < EPSILON);
        let outcome = g.key_down(&mut state, Key::Char('x'));
        assert!(!outcome.view_changed);
    }

    #[test]
    fn keyboard_zoom_stops_at_zoom_range() {
        let g = gestures();
        let mut state = ViewportState::default();
        for _ in 0..1000 {
            g.key_down(&mut state, Key::Char('q'));
        }
        assert_eq!(state.target_zoom, g.settings().min_zoom);
        for _ in 0..2000 {
            g.key_down(&mut state, Key::Char('e'));
        }
        assert_eq!(state.target_zoom, g.settings().max_zoom);
    }

    #[test]
    fn wheel_out_stops_at_zoom_range_with_finite_target() {
        let g = gestures();
        let c = canvas();
        let mut state = ViewportState::default();
        for _ in 0..2000 {
            g.wheel_zoom(&mut state, &c, 700.0, 100.0, 500.0);
        }
        assert_eq!(state.target_zoom, g.settings().min_zoom);
        assert!(state.target_center.is_finite());
    }

    #[test]
    fn modifier_flags_follow_key_events() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.key_down(&mut state, Key::Control);
        g.key_down(&mut state, Key::Alt);
        assert!(state.ctrl_pressed && state.alt_pressed);
        g.key_up(&mut state, Key::Control);
        assert!(!state.ctrl_pressed && state.alt_pressed);
        g.handle(&mut state, &canvas(), &InputEvent::FocusLost);
        assert!(!state.alt_pressed);
    }

    #[test]
    fn ctrl_click_recenters_on_clicked_point() {
        let g = gestures();
        let canvas = canvas();
        let mut state = ViewportState::default();

        let plain = g.recenter_click(&mut state, &canvas, 0.0, 0.0, PointerButton::Primary);
        assert!(!plain.consumed);

        state.ctrl_pressed = true;
        let secondary = g.recenter_click(&mut state, &canvas, 0.0, 0.0, PointerButton::Secondary);
        assert!(!secondary.consumed);

        let outcome = g.recenter_click(&mut state, &canvas, 0.0, 0.0, PointerButton::Primary);
        assert!(outcome.consumed);
        let expected = state
            .current_view()
            .to_complex_plane(0.0, 0.0, &canvas, 1.5)
            .unwrap();
        assert_eq!(state.target_center, expected);
    }

    #[test]
    fn alt_binding_recenters() {
        let g = Gestures::new(ViewSettings {
            recenter_modifier: crate::settings::RecenterModifier::Alt,
            ..ViewSettings::default()
        });
        let mut state = ViewportState::default();
        state.ctrl_pressed = true;
        assert!(!g
            .recenter_click(&mut state, &canvas(), 10.0, 10.0, PointerButton::Primary)
            .consumed);
        state.alt_pressed = true;
        assert!(g
            .recenter_click(&mut state, &canvas(), 10.0, 10.0, PointerButton::Primary)
            .consumed);
    }

    #[test]
    fn single_finger_pan_scales_by_pixel_ratio() {
        let g = gestures();
        let hidpi = Canvas::new(800.0, 600.0, 2.0);
        let mut state = ViewportState::default();
        g.touch_start(&mut state, &hidpi, &[TouchPoint::new(1, 100.0, 100.0)]);
        g.touch_move(&mut state, &hidpi, &[TouchPoint::new(1, 110.0, 100.0)]);

        let mut mouse = ViewportState::default();
        g.drag_pan(&mut mouse, &hidpi, 20.0, 0.0);
        assert!(state.target_center.distance(mouse.target_center) < EPSILON);
    }

    #[test]
    fn pinch_adds_formula_delta_to_zoom() {
        let g = gestures();
        let canvas = canvas();
        let mut state = ViewportState::default();
        let a = TouchPoint::new(1, 350.0, 300.0);
        let b = TouchPoint::new(2, 450.0, 300.0);
        g.touch_start(&mut state, &canvas, &[a, b]);
        assert_eq!(state.touch.prev_distance, Some(100.0));

        let a2 = TouchPoint::new(1, 325.0, 300.0);
        let b2 = TouchPoint::new(2, 475.0, 300.0);
        g.touch_move(&mut state, &canvas, &[a2, b2]);

        assert!((state.zoom - 1.0).abs() < 1e-12);
        assert!((state.target_zoom - 1.0).abs() < 1e-12);
        assert_eq!(state.touch.prev_distance, Some(150.0));
    }

    #[test]
    fn pinch_keeps_midpoint_anchored() {
        let g = gestures();
        let canvas = canvas();
        let s = g.settings().scale_per_zoom;
        let mut state = ViewportState::default();
        let a = TouchPoint::new(1, 100.0, 100.0);
        let b = TouchPoint::new(2, 200.0, 200.0);
        let anchor = state
            .current_view()
            .to_complex_plane(150.0, 150.0, &canvas, s)
            .unwrap();
        g.touch_start(&mut state, &canvas, &[a, b]);
        g.touch_move(
            &mut state,
            &canvas,
            &[TouchPoint::new(1, 80.0, 80.0), TouchPoint::new(2, 220.0, 220.0)],
        );
        let under = state
            .current_view()
            .to_complex_plane(150.0, 150.0, &canvas, s)
            .unwrap();
        assert!(anchor.distance(under) < EPSILON);
    }

    #[test]
    fn touch_end_clears_gesture_state() {
        let g = gestures();
        let canvas = canvas();
        let mut state = ViewportState::default();
        g.touch_start(
            &mut state,
            &canvas,
            &[TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, 30.0, 40.0)],
        );
        assert_eq!(state.touch.prev_distance, Some(50.0));

        g.touch_end(&mut state, &canvas, &[TouchPoint::new(2, 30.0, 40.0)]);
        assert_eq!(state.touch.prev_distance, None);
        assert_eq!(state.touch.prev_position, Some(Complex::new(30.0, 40.0)));

        g.touch_end(&mut state, &canvas, &[]);
        assert_eq!(state.touch.prev_distance, None);
        assert_eq!(state.touch.prev_position, None);
    }

    #[test]
    fn first_move_without_baseline_does_not_jump() {
        let g = gestures();
        let mut state = ViewportState::default();
        g.touch_move(&mut state, &canvas(), &[TouchPoint::new(1, 500.0, 500.0)]);
        assert_eq!(state.target_center, Complex::new(-0.5, 0.0));
        assert_eq!(state.touch.prev_position, Some(Complex::new(500.0, 500.0)));
    }
}
