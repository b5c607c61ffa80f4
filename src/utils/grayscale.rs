//! RGBA to luminance conversion.
//!
//! Y = floor(0.21*R + 0.72*G + 0.07*B), computed exactly in integers as
//! `(21*R + 72*G + 7*B) / 100`. The alpha byte is skipped.

use rayon::prelude::*;

use crate::config;
use crate::error::{Error, Result};
use crate::models::pixels::{CHANNELS, PixelBuffer};

const COEF_R: u32 = 21;
const COEF_G: u32 = 72;
const COEF_B: u32 = 7;
const COEF_SCALE: u32 = 100;

#[inline(always)]
fn luminance(px: &[u8]) -> u8 {
    let sum = COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32;
    // max is 25500 / 100
    (sum / COEF_SCALE) as u8
}

/// One luminance byte per pixel, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl GrayscaleBuffer {
    /// Wrap an existing plane; `data` must hold exactly `width * height` bytes
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if data.len() != width as usize * height as usize {
            return Err(Error::input_shape(format!(
                "luminance plane of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            data,
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

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Convert a validated RGBA view, picking the row-parallel path for large
/// images
pub fn convert(pixels: &PixelBuffer<'_>) -> GrayscaleBuffer {
    let width = pixels.width() as usize;
    let height = pixels.height() as usize;
    let data = if pixels.pixel_count() >= config::parallel_min_pixels() {
        rgba_to_grayscale_parallel(pixels.as_bytes(), width, height)
    } else {
        rgba_to_grayscale(pixels.as_bytes(), width, height)
    };
    GrayscaleBuffer {
        data,
        width: pixels.width(),
        height: pixels.height(),
    }
}

/// Sequential conversion of the first `width * height` pixels of `rgba`
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    rgba.chunks_exact(CHANNELS)
        .take(pixel_count)
        .map(luminance)
        .collect()
}

/// Row-parallel conversion; output is identical to [`rgba_to_grayscale`]
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    gray.par_chunks_mut(width)
        .zip(rgba.par_chunks(width * CHANNELS))
        .for_each(|(row, src)| {
            for (out, px) in row.iter_mut().zip(src.chunks_exact(CHANNELS)) {
                *out = luminance(px);
            }
        });
    gray
}

/// Convert into a caller-provided buffer, returning the number of pixels
/// written
pub fn rgba_to_grayscale_with_buffer(
    rgba: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<usize> {
    let pixel_count = width * height;
    if output.len() < pixel_count || rgba.len() < pixel_count * CHANNELS {
        return Err(Error::input_shape(format!(
            "{width}x{height} conversion needs {} input and {pixel_count} output bytes",
            pixel_count * CHANNELS
        )));
    }
    for (out, px) in output[..pixel_count]
        .iter_mut()
        .zip(rgba.chunks_exact(CHANNELS))
    {
        *out = luminance(px);
    }
    Ok(pixel_count)
}
