pub mod buffer;
pub mod error;
pub mod export;
pub mod palette;
pub mod program;
pub mod renderer;

pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use export::{export_png, ScreenshotMetadata};
pub use palette::{theme_palettes, Palette};
pub use program::{escape_time, FragmentProgram, JuliaProgram, MandelbrotProgram, ProgramSet};
pub use renderer::{render_frame, render_frame_cancellable, RenderCancel, RenderResult};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
