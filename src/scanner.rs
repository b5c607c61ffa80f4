//! Luminance plane in, caller-facing symbol records out.

use tracing::debug;

use crate::engine::{Engine, FourCc, Processor};
use crate::error::Result;
use crate::models::{PixelBuffer, Symbol, SymbolRecord};
use crate::utils::grayscale::{self, GrayscaleBuffer};

/// Run one decode pass over `gray` and keep every non-partial symbol.
///
/// The buffer is consumed; it and the image bound over it are dropped on
/// every exit path.
pub fn scan_grayscale<E: Engine + ?Sized>(
    engine: &mut E,
    gray: GrayscaleBuffer,
) -> Result<Vec<SymbolRecord>> {
    let image = engine.create_image(FourCc::Y800, gray.width(), gray.height(), gray.as_slice())?;
    let symbols = engine.process(&image)?;
    drop(image);

    let found = symbols.len();
    let records = collect_records(symbols);
    debug!(found, kept = records.len(), "symbols collected");
    Ok(records)
}

/// Drop partial detections, keeping engine order
pub fn collect_records(symbols: Vec<Symbol>) -> Vec<SymbolRecord> {
    symbols
        .into_iter()
        .filter(|s| !s.is_partial())
        .map(SymbolRecord::from)
        .collect()
}

/// A detector owning its own engine.
///
/// Unlike the crate-level functions, nothing is shared: each scanner can be
/// moved to its own thread, and any [`Engine`] can be plugged in.
pub struct Scanner<E = Processor> {
    engine: E,
}

impl Scanner<Processor> {
    /// A scanner over the built-in engine configured from the environment
    pub fn open() -> Result<Self> {
        Ok(Self::new(Processor::create()?))
    }
}

impl<E: Engine> Scanner<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Detect symbols in a tightly packed RGBA buffer
    pub fn detect(&mut self, data: &[u8], width: u32, height: u32) -> Result<Vec<SymbolRecord>> {
        let pixels = PixelBuffer::new(data, width, height)?;
        self.detect_pixels(&pixels)
    }

    pub fn detect_pixels(&mut self, pixels: &PixelBuffer<'_>) -> Result<Vec<SymbolRecord>> {
        let gray = grayscale::convert(pixels);
        scan_grayscale(&mut self.engine, gray)
    }

    /// Engine version as `major.minor.patch`
    pub fn version(&self) -> String {
        self.engine.version().to_string()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}
