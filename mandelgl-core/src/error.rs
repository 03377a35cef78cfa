use thiserror::Error;

/// Errors originating from the viewer core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid iteration slider value: {0} (must be in 0..=30)")]
    InvalidSliderValue(i32),

    #[error("invalid theme id: {0} (must be 0..=3)")]
    InvalidTheme(i32),

    #[error("invalid color compression: {0} (must be finite and > 0.0)")]
    InvalidColorCompression(f64),

    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: String },
}
