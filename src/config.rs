//! Environment-driven tuning knobs.
//!
//! Each value is read once per process and cached.

use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Pixel count at which grayscale conversion switches to row-parallel work
pub const DEFAULT_PARALLEL_MIN_PIXELS: usize = 1 << 20;
/// Finder candidates kept for grouping (strongest first)
pub const DEFAULT_MAX_FINDER_CANDIDATES: usize = 16;

static PARALLEL_MIN_PIXELS: OnceLock<usize> = OnceLock::new();

pub(crate) fn parallel_min_pixels() -> usize {
    *PARALLEL_MIN_PIXELS.get_or_init(|| {
        parse_env_usize("QRDETECT_PARALLEL_MIN_PIXELS", DEFAULT_PARALLEL_MIN_PIXELS)
    })
}

static MAX_FINDER_CANDIDATES: OnceLock<usize> = OnceLock::new();

pub(crate) fn max_finder_candidates() -> usize {
    *MAX_FINDER_CANDIDATES.get_or_init(|| {
        parse_env_usize("QRDETECT_MAX_FINDER_CANDIDATES", DEFAULT_MAX_FINDER_CANDIDATES)
            .clamp(3, 64)
    })
}

static DIMENSION_RETRIES: OnceLock<bool> = OnceLock::new();

pub(crate) fn dimension_retries() -> bool {
    *DIMENSION_RETRIES.get_or_init(|| parse_env_bool_u8("QRDETECT_DIMENSION_RETRIES", true))
}
