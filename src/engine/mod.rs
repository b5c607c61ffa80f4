//! The decoding engine seam.
//!
//! Callers only talk to an engine through [`Engine`]: bind a luminance plane
//! as an [`Image`], run one decode pass, and read back [`Symbol`]s in the
//! order the engine found them. [`Processor`] is the built-in QR engine.

pub mod image;
pub mod processor;

use std::fmt;

pub use image::{FourCc, Image};
pub use processor::{Processor, ProcessorConfig};

use crate::error::Result;
use crate::models::Symbol;

/// A symbol-detection engine session
pub trait Engine: Send {
    /// Bind `data` as a `width` x `height` image in `format`
    fn create_image<'a>(
        &self,
        format: FourCc,
        width: u32,
        height: u32,
        data: &'a [u8],
    ) -> Result<Image<'a>> {
        Image::new(format, width, height, data)
    }

    /// Run one decode pass; symbols come back in discovery order and may
    /// include partial detections
    fn process(&mut self, image: &Image<'_>) -> Result<Vec<Symbol>>;

    fn version(&self) -> EngineVersion;
}

/// Engine release number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    /// This crate's own version
    pub fn current() -> Self {
        Self {
            major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
            minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
            patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
