use thiserror::Error;

/// Everything that can stop the background from scrolling. None of these are
/// fatal: callers log them and fall back to a fixed, centered background.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("required element `{0}` not found")]
    MissingElement(&'static str),
    #[error("unreadable transform `{0}`")]
    UnreadableTransform(String),
    #[error("background has no usable size ({width}x{height})")]
    ZeroDimension { width: f64, height: f64 },
    #[error("invalid background scale {0}")]
    InvalidScale(f64),
    #[error("invalid scroll config: {0}")]
    InvalidConfig(String),
}
