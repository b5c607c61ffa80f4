//! Version information (BCH 18,6) carried by symbols of version 7 and up.

use crate::models::{BitMatrix, Version};

const VERSION_GENERATOR: u32 = 0x1F25;
const MAX_VERSION_ERRORS: u32 = 3;

/// 18-bit codeword for a version (7-40)
pub fn encode(version: Version) -> u32 {
    let data = version.number() as u32;
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    (data << 12) | (rem & 0xFFF)
}

/// Nearest valid version to a raw 18-bit read
pub fn decode(bits: u32) -> Option<Version> {
    (7u8..=40)
        .filter_map(Version::new)
        .map(|v| (v, (encode(v) ^ bits).count_ones()))
        .min_by_key(|&(_, distance)| distance)
        .filter(|&(_, distance)| distance <= MAX_VERSION_ERRORS)
        .map(|(v, _)| v)
}

/// Module coordinates of bit `i` in the block above the bottom-left finder
/// (`transposed = true`) or left of the top-right finder
pub(crate) fn bit_position(i: usize, size: usize, transposed: bool) -> (usize, usize) {
    let a = size - 11 + i % 3;
    let b = i / 3;
    if transposed { (b, a) } else { (a, b) }
}

/// Version of a sampled grid.
///
/// Small grids carry no version block and are identified by size alone. For
/// larger ones the encoded version wins, even when it disagrees with the
/// grid size; callers resample at the reported size. Unreadable version
/// blocks fall back to the size.
pub fn extract(grid: &BitMatrix) -> Option<Version> {
    let size = grid.width();
    let by_size = Version::from_size(size)?;
    if by_size.number() < 7 {
        return Some(by_size);
    }
    let read = |transposed: bool| {
        (0..18).fold(0u32, |acc, i| {
            let (x, y) = bit_position(i, size, transposed);
            acc | (grid.get(x, y) as u32) << i
        })
    };
    decode(read(false))
        .or_else(|| decode(read(true)))
        .or(Some(by_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codewords() {
        assert_eq!(encode(Version::new(7).unwrap()), 0x07C94);
        assert_eq!(encode(Version::new(40).unwrap()), 0x28C69);
    }

    #[test]
    fn test_decode_with_errors() {
        let v = Version::new(21).unwrap();
        assert_eq!(decode(encode(v) ^ 0b10_0000_0001_0000_0001), Some(v));
        assert_eq!(decode(0), None);
    }

    #[test]
    fn test_extract_small_grid_uses_size() {
        let grid = BitMatrix::square(41);
        assert_eq!(extract(&grid), Version::new(6));
    }

    #[test]
    fn test_extract_reads_second_copy() {
        let v = Version::new(9).unwrap();
        let size = v.size();
        let bits = encode(v);
        let mut grid = BitMatrix::square(size);
        for i in 0..18 {
            let (x, y) = bit_position(i, size, true);
            grid.set(x, y, (bits >> i) & 1 == 1);
        }
        assert_eq!(extract(&grid), Some(v));
    }
}
