//! Toolkit-independent input events.
//!
//! The application layer translates its windowing events into these before
//! handing them to [`Gestures`](crate::gesture::Gestures). Pointer and wheel
//! positions are in physical canvas pixels relative to the canvas top-left;
//! touch positions are in logical points and get scaled by the canvas pixel
//! ratio inside the handlers.

use crate::complex::Complex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable key, as typed (case is ignored by the handlers).
    Char(char),
    Control,
    Alt,
    Other,
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Complex {
        Complex::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to `(x, y)`, having travelled `(movement_x,
    /// movement_y)` since the previous move.
    PointerMoved {
        x: f64,
        y: f64,
        movement_x: f64,
        movement_y: f64,
        primary_down: bool,
    },
    PointerPressed {
        x: f64,
        y: f64,
        button: PointerButton,
    },
    /// Vertical wheel travel, positive when scrolling down (away from the
    /// user), the browser `deltaY` convention.
    Wheel { x: f64, y: f64, delta_y: f64 },
    KeyDown(Key),
    KeyUp(Key),
    /// Each touch event carries the contacts still active after it.
    TouchStart(Vec<TouchPoint>),
    TouchMove(Vec<TouchPoint>),
    TouchEnd(Vec<TouchPoint>),
    /// The window lost focus; held keys and touches will never report a
    /// release.
    FocusLost,
}

/// What handling one event did, for the caller to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    /// The event was used and its default action must be suppressed.
    pub consumed: bool,
    /// The Julia constant moved; redraw the Julia view now.
    pub julia_changed: bool,
    /// Some view target changed.
    pub view_changed: bool,
}

impl InputOutcome {
    pub(crate) fn ignored() -> Self {
        Self::default()
    }

    pub(crate) fn view() -> Self {
        Self {
            consumed: true,
            view_changed: true,
            julia_changed: false,
        }
    }

    /// Combine the outcomes of several events.
    pub fn merge(self, other: Self) -> Self {
        Self {
            consumed: self.consumed || other.consumed,
            julia_changed: self.julia_changed || other.julia_changed,
            view_changed: self.view_changed || other.view_changed,
        }
    }
}
