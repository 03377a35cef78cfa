use std::collections::BTreeMap;

use eframe::egui;
use tracing::debug;

use mandelgl_core::{InputEvent, Key, PointerButton, TouchPoint};

/// DOM-style wheel delta per line of scrolling (one notch on most mice).
const WHEEL_LINE_DELTA: f32 = 100.0;

/// Turns the egui events of one frame into the viewer's input events for
/// the Mandelbrot canvas.
///
/// Pointer coordinates come out in physical pixels relative to the canvas
/// rectangle; touch coordinates stay in logical points, as the touch
/// handlers scale them by the pixel ratio themselves.
#[derive(Debug, Default)]
pub(crate) struct EventTranslator {
    last_pointer: Option<egui::Pos2>,
    primary_down: bool,
    ctrl: bool,
    alt: bool,
    touches: BTreeMap<u64, egui::Pos2>,
}

impl EventTranslator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn touch_active(&self) -> bool {
        !self.touches.is_empty()
    }

    /// Translate `events`. `modifiers` is the modifier state at the end of
    /// the frame; egui reports no key events for modifiers on their own, so
    /// Control and Alt presses are recovered from its changes. Button and key
    /// events carry their own modifier state, which is synced first so the
    /// handlers see them in order.
    pub(crate) fn translate(
        &mut self,
        events: &[egui::Event],
        modifiers: egui::Modifiers,
        rect: egui::Rect,
        pixels_per_point: f32,
        keyboard_free: bool,
    ) -> Vec<InputEvent> {
        let mut out = Vec::new();
        // egui mirrors the first finger as pointer events; drop those while
        // any finger is down.
        let touching = self.touch_active()
            || events.iter().any(|e| matches!(e, egui::Event::Touch { .. }));

        for event in events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    let previous = self.last_pointer.replace(*pos);
                    if touching || !(rect.contains(*pos) || self.primary_down) {
                        continue;
                    }
                    let movement = previous.map_or(egui::Vec2::ZERO, |p| *pos - p);
                    let (x, y) = to_canvas_pixels(*pos, rect, pixels_per_point);
                    out.push(InputEvent::PointerMoved {
                        x,
                        y,
                        movement_x: (movement.x * pixels_per_point) as f64,
                        movement_y: (movement.y * pixels_per_point) as f64,
                        primary_down: self.primary_down,
                    });
                }
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    // A modifier pressed in the same frame must arm this click.
                    self.sync_modifiers(*modifiers, &mut out);
                    if touching {
                        continue;
                    }
                    let button = match button {
                        egui::PointerButton::Primary => PointerButton::Primary,
                        egui::PointerButton::Secondary => PointerButton::Secondary,
                        _ => PointerButton::Middle,
                    };
                    if !*pressed {
                        if button == PointerButton::Primary {
                            self.primary_down = false;
                        }
                        continue;
                    }
                    if !rect.contains(*pos) {
                        continue;
                    }
                    if button == PointerButton::Primary {
                        self.primary_down = true;
                    }
                    let (x, y) = to_canvas_pixels(*pos, rect, pixels_per_point);
                    out.push(InputEvent::PointerPressed { x, y, button });
                }
                egui::Event::PointerGone => {
                    self.last_pointer = None;
                    self.primary_down = false;
                }
                egui::Event::MouseWheel { unit, delta, .. } => {
                    let Some(pos) = self.last_pointer.filter(|p| rect.contains(*p)) else {
                        continue;
                    };
                    let delta_y = wheel_delta_y(*unit, delta.y, rect.height(), pixels_per_point);
                    if delta_y == 0.0 {
                        continue;
                    }
                    let (x, y) = to_canvas_pixels(pos, rect, pixels_per_point);
                    out.push(InputEvent::Wheel { x, y, delta_y });
                }
                egui::Event::Key {
                    key,
                    pressed,
                    modifiers,
                    ..
                } => {
                    self.sync_modifiers(*modifiers, &mut out);
                    if !keyboard_free {
                        continue;
                    }
                    let key = translate_key(*key);
                    out.push(if *pressed {
                        InputEvent::KeyDown(key)
                    } else {
                        InputEvent::KeyUp(key)
                    });
                }
                egui::Event::Touch { id, phase, pos, .. } => {
                    if let Some(event) = self.touch(id.0, *phase, *pos, rect) {
                        out.push(event);
                    }
                }
                egui::Event::WindowFocused(false) => {
                    self.reset();
                    out.push(InputEvent::FocusLost);
                }
                _ => {}
            }
        }

        self.sync_modifiers(modifiers, &mut out);
        out
    }

    fn touch(
        &mut self,
        id: u64,
        phase: egui::TouchPhase,
        pos: egui::Pos2,
        rect: egui::Rect,
    ) -> Option<InputEvent> {
        match phase {
            egui::TouchPhase::Start => {
                if !rect.contains(pos) {
                    return None;
                }
                self.touches.insert(id, pos);
                Some(InputEvent::TouchStart(self.touch_points(rect)))
            }
            egui::TouchPhase::Move => {
                let slot = self.touches.get_mut(&id)?;
                *slot = pos;
                Some(InputEvent::TouchMove(self.touch_points(rect)))
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                self.touches.remove(&id)?;
                Some(InputEvent::TouchEnd(self.touch_points(rect)))
            }
        }
    }

    fn touch_points(&self, rect: egui::Rect) -> Vec<TouchPoint> {
        self.touches
            .iter()
            .map(|(id, pos)| {
                TouchPoint::new(*id, (pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
            })
            .collect()
    }

    fn sync_modifiers(&mut self, modifiers: egui::Modifiers, out: &mut Vec<InputEvent>) {
        if modifiers.ctrl != self.ctrl {
            self.ctrl = modifiers.ctrl;
            debug!(pressed = self.ctrl, "Control changed");
            out.push(if self.ctrl {
                InputEvent::KeyDown(Key::Control)
            } else {
                InputEvent::KeyUp(Key::Control)
            });
        }
        if modifiers.alt != self.alt {
            self.alt = modifiers.alt;
            debug!(pressed = self.alt, "Alt changed");
            out.push(if self.alt {
                InputEvent::KeyDown(Key::Alt)
            } else {
                InputEvent::KeyUp(Key::Alt)
            });
        }
    }

    fn reset(&mut self) {
        self.primary_down = false;
        self.ctrl = false;
        self.alt = false;
        self.touches.clear();
    }
}

fn to_canvas_pixels(pos: egui::Pos2, rect: egui::Rect, pixels_per_point: f32) -> (f64, f64) {
    (
        ((pos.x - rect.min.x) * pixels_per_point) as f64,
        ((pos.y - rect.min.y) * pixels_per_point) as f64,
    )
}

/// Convert an egui wheel delta to the DOM convention: positive scrolls down,
/// which zooms out.
fn wheel_delta_y(
    unit: egui::MouseWheelUnit,
    dy: f32,
    page_height: f32,
    pixels_per_point: f32,
) -> f64 {
    let dom = match unit {
        egui::MouseWheelUnit::Point => -dy * pixels_per_point,
        egui::MouseWheelUnit::Line => -dy * WHEEL_LINE_DELTA,
        egui::MouseWheelUnit::Page => -dy * page_height * pixels_per_point,
    };
    dom as f64
}

fn translate_key(key: egui::Key) -> Key {
    match key {
        egui::Key::Q => Key::Char('q'),
        egui::Key::E => Key::Char('e'),
        egui::Key::R => Key::Char('r'),
        _ => Key::Other,
    }
}
