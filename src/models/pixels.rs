//! Caller-owned RGBA input.

use crate::error::{Error, Result};

/// Bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// A read-only view over interleaved RGBA pixels.
///
/// `height` rows of `width` pixels, four bytes each, no row padding. The view
/// starts `offset` bytes into `data` and spans at least `width * height * 4`
/// bytes; anything past that is ignored. The fourth channel is never read.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// View the whole of `data` as a `width` x `height` image
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::with_window(data, 0, data.len(), width, height)
    }

    /// View `length` bytes of `data` starting at `offset`
    pub fn with_window(
        data: &'a [u8],
        offset: usize,
        length: usize,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::input_shape(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                Error::input_shape(format!(
                    "window {offset}+{length} exceeds buffer of {} bytes",
                    data.len()
                ))
            })?;
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| Error::input_shape(format!("{width}x{height} overflows")))?;
        if length < needed {
            return Err(Error::input_shape(format!(
                "{width}x{height} RGBA needs {needed} bytes, window has {length}"
            )));
        }
        Ok(Self {
            data: &data[offset..end][..needed],
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exactly `width * height * 4` bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}
