use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, error};

use crate::config;
use crate::engine::{Engine, EngineVersion, Image};
use crate::error::{Error, Result};
use crate::models::Symbol;
use crate::pipeline;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Tuning for the built-in engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Finder candidates kept for grouping, strongest first
    pub max_finder_candidates: usize,
    /// Also try neighbouring symbol sizes when the estimate fails to decode
    pub dimension_retries: bool,
    /// Retry with a local-mean binarizer when the global threshold finds
    /// nothing
    pub adaptive_fallback: bool,
}

impl ProcessorConfig {
    pub fn from_env() -> Self {
        Self {
            max_finder_candidates: config::max_finder_candidates(),
            dimension_retries: config::dimension_retries(),
            adaptive_fallback: true,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_finder_candidates < 3 {
            return Err(Error::EngineInit(format!(
                "need at least 3 finder candidates, configured {}",
                self.max_finder_candidates
            )));
        }
        Ok(())
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_finder_candidates: config::DEFAULT_MAX_FINDER_CANDIDATES,
            dimension_retries: true,
            adaptive_fallback: true,
        }
    }
}

/// Built-in QR engine session
#[derive(Debug)]
pub struct Processor {
    id: u64,
    config: ProcessorConfig,
    initialized: bool,
    passes: u64,
}

impl Processor {
    /// An uninitialized processor; call [`Processor::init`] before use
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            config,
            initialized: false,
            passes: 0,
        }
    }

    /// Create and initialize with configuration from the environment
    pub fn create() -> Result<Self> {
        let mut processor = Self::new(ProcessorConfig::from_env());
        processor.init()?;
        Ok(processor)
    }

    pub fn init(&mut self) -> Result<()> {
        if let Err(err) = self.config.validate() {
            error!(processor = self.id, %err, "processor init failed");
            return Err(err);
        }
        self.initialized = true;
        debug!(processor = self.id, config = ?self.config, "processor initialized");
        Ok(())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Decode passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl Engine for Processor {
    fn process(&mut self, image: &Image<'_>) -> Result<Vec<Symbol>> {
        if !self.initialized {
            return Err(Error::Scan(format!("processor {} used before init", self.id)));
        }
        self.passes += 1;
        let symbols = pipeline::scan(
            image.data(),
            image.width() as usize,
            image.height() as usize,
            &self.config,
        );
        debug!(
            processor = self.id,
            pass = self.passes,
            symbols = symbols.len(),
            "decode pass finished"
        );
        Ok(symbols)
    }

    fn version(&self) -> EngineVersion {
        EngineVersion::current()
    }
}
