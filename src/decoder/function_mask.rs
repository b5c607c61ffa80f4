use crate::decoder::tables::alignment_pattern_positions;
use crate::models::{BitMatrix, Version};

/// Modules reserved for function patterns in a given version.
///
/// Set bits are finder, separator, timing, alignment, format, version and
/// dark modules; everything else carries codewords.
pub struct FunctionMask {
    mask: BitMatrix,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::square(size);

        // finders plus separators plus format strips
        fill(&mut mask, 0, 0, 9, 9);
        fill(&mut mask, size - 8, 0, 8, 9);
        fill(&mut mask, 0, size - 8, 9, 8);

        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            fill(&mut mask, cx - 2, cy - 2, 5, 5);
        }

        if version.number() >= 7 {
            fill(&mut mask, size - 11, 0, 3, 6);
            fill(&mut mask, 0, size - 11, 6, 3);
        }

        Self { mask }
    }

    #[inline]
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }
}

fn fill(mask: &mut BitMatrix, x0: usize, y0: usize, w: usize, h: usize) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            mask.set(x, y, true);
        }
    }
}

/// Alignment pattern centres, excluding the three that would overlap finders
pub fn alignment_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &cy) in positions.iter().enumerate() {
        for (j, &cx) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !corner {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tables::raw_data_modules;

    #[test]
    fn test_data_module_count_matches_capacity() {
        for n in [1u8, 2, 6, 7, 14, 32, 40] {
            let version = Version::new(n).unwrap();
            let mask = FunctionMask::new(version);
            let size = mask.size();
            let data_modules = (0..size)
                .flat_map(|y| (0..size).map(move |x| (x, y)))
                .filter(|&(x, y)| !mask.is_function(x, y))
                .count();
            assert_eq!(data_modules, raw_data_modules(version), "version {n}");
        }
    }

    #[test]
    fn test_alignment_centers() {
        assert!(alignment_centers(Version::new(1).unwrap()).is_empty());
        assert_eq!(alignment_centers(Version::new(2).unwrap()), vec![(18, 18)]);
        assert_eq!(alignment_centers(Version::new(7).unwrap()).len(), 6);
    }
}
