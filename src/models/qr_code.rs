use super::{BitMatrix, Point};

/// Symbol version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(u8);

impl Version {
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version whose grid is `size` modules wide
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((size - 17) / 4).ok().and_then(Self::new)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Width (= height) in modules
    pub fn size(self) -> usize {
        4 * self.0 as usize + 17
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ECLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl ECLevel {
    /// Level from the two format bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }
}

/// Data mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x07)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the module at column `x`, row `y` is inverted by this mask
    #[inline]
    pub fn is_masked(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            _ => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}

/// A fully decoded QR symbol
#[derive(Debug, Clone)]
pub struct QRCode {
    /// Payload bytes after segment decoding
    pub data: Vec<u8>,
    pub version: Version,
    pub error_correction: ECLevel,
    pub mask_pattern: MaskPattern,
    /// Corners in image space: top-left, bottom-left, bottom-right, top-right
    pub corners: [Point; 4],
    /// Sampled module grid (true = dark)
    pub modules: BitMatrix,
    /// Decoded from the transposed grid
    pub mirrored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_size() {
        assert_eq!(Version::new(1).unwrap().size(), 21);
        assert_eq!(Version::new(40).unwrap().size(), 177);
        assert_eq!(Version::from_size(25), Version::new(2));
        assert_eq!(Version::from_size(24), None);
        assert_eq!(Version::new(41), None);
    }

    #[test]
    fn test_ec_level_bits() {
        for level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
            assert_eq!(ECLevel::from_bits(level.to_bits()), level);
        }
        assert_eq!(ECLevel::from_bits(0b01), ECLevel::L);
    }

    #[test]
    fn test_mask_pattern() {
        let mask = MaskPattern::from_bits(0);
        assert!(mask.is_masked(0, 0));
        assert!(!mask.is_masked(0, 1));
        assert!(mask.is_masked(1, 1));
        // pattern 1 depends on the row only
        assert!(MaskPattern::from_bits(1).is_masked(3, 2));
        assert!(!MaskPattern::from_bits(1).is_masked(2, 3));
    }
}
