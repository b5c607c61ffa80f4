use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// Four-character pixel format code, packed little-endian
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(u32);

impl FourCc {
    /// 8-bit luminance, one byte per pixel
    pub const Y800: FourCc = FourCc::new(*b"Y800");
    /// Alias of `Y800`
    pub const GREY: FourCc = FourCc::new(*b"GREY");

    pub const fn new(code: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(code))
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_luminance(self) -> bool {
        self == Self::Y800 || self == Self::GREY
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_le_bytes();
        write!(f, "FourCc({})", String::from_utf8_lossy(&bytes))
    }
}

/// A luminance plane bound for one decode pass.
///
/// Borrows the caller's buffer; nothing is copied and the borrow ends when
/// the image is dropped.
#[derive(Debug)]
pub struct Image<'a> {
    format: FourCc,
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> Image<'a> {
    pub fn new(format: FourCc, width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        if !format.is_luminance() {
            return Err(Error::image_create(format!("unsupported format {format:?}")));
        }
        if width == 0 || height == 0 {
            return Err(Error::image_create(format!("empty image {width}x{height}")));
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::image_create(format!(
                "{width}x{height} plane needs {expected} bytes, got {}",
                data.len()
            )));
        }
        trace!(width, height, "image bound");
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    pub fn format(&self) -> FourCc {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl Drop for Image<'_> {
    fn drop(&mut self) {
        trace!(width = self.width, height = self.height, "image released");
    }
}
