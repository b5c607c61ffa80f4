//! Format information (BCH 15,5): error correction level and mask.
//!
//! Both copies are read and matched against the 32 valid codewords; the
//! closest one within three bit errors wins.

use crate::models::{BitMatrix, ECLevel, MaskPattern};

const FORMAT_MASK: u16 = 0x5412;
const FORMAT_GENERATOR: u16 = 0x537;
const MAX_FORMAT_ERRORS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Masked 15-bit codeword carrying this format
    pub fn encode(self) -> u16 {
        let data = ((self.ec_level.to_bits() as u16) << 3) | self.mask_pattern.bits() as u16;
        let mut rem = data;
        for _ in 0..10 {
            rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
        }
        ((data << 10) | (rem & 0x3FF)) ^ FORMAT_MASK
    }

    fn from_data(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_bits(data >> 3),
            mask_pattern: MaskPattern::from_bits(data & 0x07),
        }
    }

    /// Nearest valid format to a raw 15-bit read, with its bit distance
    pub fn decode(bits: u16) -> Option<(Self, u32)> {
        (0u8..32)
            .map(|data| {
                let info = Self::from_data(data);
                (info, (info.encode() ^ bits).count_ones())
            })
            .min_by_key(|&(_, distance)| distance)
            .filter(|&(_, distance)| distance <= MAX_FORMAT_ERRORS)
    }

    /// Read both copies from a module grid and keep the better match
    pub fn extract(grid: &BitMatrix) -> Option<Self> {
        let size = grid.width();
        if size < 21 {
            return None;
        }
        let (first, second) = read_copies(grid);
        [Self::decode(first), Self::decode(second)]
            .into_iter()
            .flatten()
            .min_by_key(|&(_, distance)| distance)
            .map(|(info, _)| info)
    }
}

/// Module coordinates of bit `i` in the copy around the top-left finder
pub(crate) fn primary_position(i: usize) -> (usize, usize) {
    match i {
        0..=5 => (8, i),
        6 => (8, 7),
        7 => (8, 8),
        8 => (7, 8),
        _ => (14 - i, 8),
    }
}

/// Module coordinates of bit `i` in the split copy (top-right and bottom-left)
pub(crate) fn secondary_position(i: usize, size: usize) -> (usize, usize) {
    if i < 8 {
        (size - 1 - i, 8)
    } else {
        (8, size - 15 + i)
    }
}

fn read_copies(grid: &BitMatrix) -> (u16, u16) {
    let size = grid.width();
    let mut first = 0u16;
    let mut second = 0u16;
    for i in 0..15 {
        let (x, y) = primary_position(i);
        first |= (grid.get(x, y) as u16) << i;
        let (x, y) = secondary_position(i, size);
        second |= (grid.get(x, y) as u16) << i;
    }
    (first, second)
}
