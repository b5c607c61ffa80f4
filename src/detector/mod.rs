//! QR symbol location
//!
//! - Finder pattern detection (the three square markers)
//! - Grouping finders into ordered triples
//! - Alignment pattern search (versions 2 and up)

/// Alignment pattern search near a predicted position
pub mod alignment;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Finder triples and symbol size estimation
pub mod grouping;
