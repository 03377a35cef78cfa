use thiserror::Error;

/// Errors originating from the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid frame dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("fragment programs are not built yet")]
    ProgramNotReady,

    #[error("render cancelled")]
    Cancelled,

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] mandelgl_core::CoreError),
}
