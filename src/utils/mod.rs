//! Image processing helpers
//!
//! - Grayscale conversion (RGBA to luminance)
//! - Binarization (Otsu's method, local mean, fixed threshold)
//! - Geometry (perspective transforms, grid sampling)

pub mod binarization;
pub mod geometry;
pub mod grayscale;
