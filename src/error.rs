//! Error types for symbol detection

use thiserror::Error;

/// Result type for detection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a detection call.
///
/// Each variant names the stage that failed. Engine-level detail goes to the
/// `tracing` side channel, not into these values.
#[derive(Debug, Error)]
pub enum Error {
    /// Arguments do not describe a usable RGBA buffer
    #[error("invalid input: {0}")]
    InputShape(String),

    /// The decoding engine could not be created or initialized
    #[error("engine initialization failed: {0}")]
    EngineInit(String),

    /// The engine could not wrap the luminance buffer into an image
    #[error("image creation failed: {0}")]
    ImageCreate(String),

    /// The engine aborted the decode pass
    #[error("scan failed: {0}")]
    Scan(String),
}

impl Error {
    pub(crate) fn input_shape(msg: impl Into<String>) -> Self {
        Self::InputShape(msg.into())
    }

    pub(crate) fn image_create(msg: impl Into<String>) -> Self {
        Self::ImageCreate(msg.into())
    }
}
