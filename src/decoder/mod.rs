//! QR symbol decoding, from a sampled module grid to payload bytes:
//! format and version information, unmasking, codeword extraction, block
//! de-interleaving with Reed-Solomon correction, and segment parsing.

pub mod bitstream;
/// Format information (BCH 15,5)
pub mod format;
pub mod function_mask;
/// Segment mode decoders
pub mod modes;
pub mod qr_decoder;
/// Reed-Solomon over GF(256)
pub mod reed_solomon;
pub mod tables;
pub mod unmask;
/// Version information (BCH 18,6), versions 7-40
pub mod version;

pub use qr_decoder::QrDecoder;
