//! qrdetect - locate and decode QR codes in raw RGBA pixel buffers
//!
//! Hand over an already-decoded RGBA image, get back every symbol the engine
//! could read: payload bytes, symbology, rotation, corner locations and a
//! quality score.
//!
//! ```no_run
//! let rgba = vec![255u8; 200 * 200 * 4];
//! for symbol in qrdetect::detect(&rgba, 200, 200)? {
//!     println!("{} {:?}", symbol.text(), symbol.locations);
//! }
//! # Ok::<(), qrdetect::Error>(())
//! ```
//!
//! The crate-level functions share one lazily created engine behind a
//! mutex. Use [`Scanner`] for an engine of your own, or to plug in another
//! [`engine::Engine`].

pub mod config;
/// QR symbol decoding (format and version info, error correction, data modes)
pub mod decoder;
/// QR symbol location (finder patterns, grouping, alignment)
pub mod detector;
pub mod engine;
pub mod error;
/// Core data structures (pixel views, symbols, bit matrices)
pub mod models;
mod pipeline;
pub mod scanner;
pub mod session;
/// Image processing (grayscale, binarization, geometry)
pub mod utils;

pub use engine::{Engine, EngineVersion, Processor, ProcessorConfig};
pub use error::{Error, Result};
pub use models::{Location, Orientation, PixelBuffer, SymbolRecord, SymbolType};
pub use scanner::Scanner;
pub use session::Session;

use utils::grayscale;

static SESSION: Session<Processor> = Session::new(Processor::create);

/// Detect symbols in a tightly packed RGBA buffer.
///
/// `image_data` holds `height` rows of `width` pixels, four bytes each; bytes
/// past `width * height * 4` are ignored.
pub fn detect(image_data: &[u8], width: u32, height: u32) -> Result<Vec<SymbolRecord>> {
    let pixels = PixelBuffer::new(image_data, width, height)?;
    detect_pixels(&pixels)
}

/// Detect symbols in a validated RGBA view
pub fn detect_pixels(pixels: &PixelBuffer<'_>) -> Result<Vec<SymbolRecord>> {
    let gray = grayscale::convert(pixels);
    let mut engine = SESSION.get_or_create()?;
    scanner::scan_grayscale(&mut *engine, gray)
}

/// Detect symbols in an `image` crate RGBA buffer
pub fn detect_image(image: &image::RgbaImage) -> Result<Vec<SymbolRecord>> {
    let pixels = PixelBuffer::new(image.as_raw(), image.width(), image.height())?;
    detect_pixels(&pixels)
}

/// Version of the built-in engine as `major.minor.patch`
pub fn version() -> String {
    EngineVersion::current().to_string()
}
