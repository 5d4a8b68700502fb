//! Error types used throughout the engine.
//!
//! Gesture-level problems (out-of-range resize, drag past the canvas edge)
//! are clamped rather than surfaced; only load, decode, and export failures
//! reach callers as errors.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A color string could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// An image source is neither cached nor a decodable data URI.
    #[error("unsupported image source: {0:?}")]
    UnsupportedSource(String),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A data URI payload was not valid base64.
    #[error("data uri decode error: {0}")]
    DataUri(#[from] base64::DecodeError),

    /// Font bytes could not be parsed.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// A persistence backend reported a failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
