pub mod animation;
pub mod canvas;
pub mod complex;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod input;
pub mod julia;
pub mod mapper;
pub mod settings;
pub mod viewport;

// Re-export primary types for convenience.
pub use animation::{step, EaseStep};
pub use canvas::Canvas;
pub use complex::Complex;
pub use error::CoreError;
pub use frame::{frame_uniforms, mandelbrot_uniforms, FrameUniforms, MandelbrotUniforms};
pub use gesture::Gestures;
pub use input::{InputEvent, InputOutcome, Key, PointerButton, TouchPoint};
pub use julia::{julia_uniforms, JuliaUniforms};
pub use mapper::{
    pinch_zoom_delta, pixel_to_plane, visible_half_extents, zoom_scale, PlaneView,
};
pub use settings::{RecenterModifier, ViewSettings};
pub use viewport::{iterations_from_slider, Theme, TouchScratch, ViewportState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
