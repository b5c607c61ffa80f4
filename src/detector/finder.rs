/// Finder pattern detection: 1:1:3:1:1 run scanning with cross-checks
use crate::models::{BitMatrix, Point};

/// Allowed deviation of each run from its ideal width, in modules
const RUN_TOLERANCE: f32 = 0.5;
const MAX_PATTERNS_PER_ROW: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    pub center: Point,
    pub module_size: f32,
    /// Number of scan hits merged into this pattern
    pub count: usize,
}

impl FinderPattern {
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            count: 1,
        }
    }

    fn about_equals(&self, other: &FinderPattern) -> bool {
        let dx = (self.center.x - other.center.x).abs();
        let dy = (self.center.y - other.center.y).abs();
        let reach = self.module_size.max(other.module_size);
        if dx > reach || dy > reach {
            return false;
        }
        let size_diff = (self.module_size - other.module_size).abs();
        size_diff <= 1.0 || size_diff <= self.module_size.min(other.module_size) * 0.5
    }

    fn absorb(&mut self, other: &FinderPattern) {
        let total = (self.count + other.count) as f32;
        let (a, b) = (self.count as f32 / total, other.count as f32 / total);
        self.center = Point::new(
            self.center.x * a + other.center.x * b,
            self.center.y * a + other.center.y * b,
        );
        self.module_size = self.module_size * a + other.module_size * b;
        self.count += other.count;
    }
}

pub struct FinderDetector;

impl FinderDetector {
    /// All confirmed finder patterns, most frequently hit first
    pub fn detect(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let mut candidates = Vec::new();
        for y in 0..matrix.height() {
            Self::scan_row(matrix, y, &mut candidates);
        }
        let mut merged = Self::merge_candidates(candidates);
        merged.sort_by(|a, b| b.count.cmp(&a.count));
        merged
    }

    fn scan_row(matrix: &BitMatrix, y: usize, out: &mut Vec<FinderPattern>) {
        let width = matrix.width();
        let mut runs = [0usize; 5];
        let mut filled = 0usize;
        let mut found = 0usize;
        let mut x = 0usize;

        // skip leading light pixels
        while x < width && !matrix.get(x, y) {
            x += 1;
        }

        while x <= width && found < MAX_PATTERNS_PER_ROW {
            let start = x;
            let dark = matrix.get(x, y);
            while x < width && matrix.get(x, y) == dark {
                x += 1;
            }
            let run = x - start;
            if run == 0 {
                break;
            }
            // runs alternate dark/light starting with dark; shift in the new one
            if filled < 5 {
                runs[filled] = run;
                filled += 1;
            } else {
                runs.rotate_left(1);
                runs[4] = run;
            }
            if filled == 5 && dark && Self::ratio_matches(&runs) {
                if let Some(pattern) = Self::confirm(matrix, &runs, x, y) {
                    out.push(pattern);
                    found += 1;
                }
            }
            if x == width {
                break;
            }
        }
    }

    /// Whether five runs fit 1:1:3:1:1 within tolerance
    pub(crate) fn ratio_matches(runs: &[usize; 5]) -> bool {
        let total: usize = runs.iter().sum();
        if total < 7 {
            return false;
        }
        let unit = total as f32 / 7.0;
        let max_dev = unit * RUN_TOLERANCE;
        (runs[0] as f32 - unit).abs() <= max_dev
            && (runs[1] as f32 - unit).abs() <= max_dev
            && (runs[2] as f32 - 3.0 * unit).abs() <= 3.0 * max_dev
            && (runs[3] as f32 - unit).abs() <= max_dev
            && (runs[4] as f32 - unit).abs() <= max_dev
    }

    /// Cross-check a row hit vertically, horizontally, then diagonally
    fn confirm(matrix: &BitMatrix, runs: &[usize; 5], end_x: usize, y: usize) -> Option<FinderPattern> {
        let h_total: usize = runs.iter().sum();
        let center_x = end_x as f32 - runs[4] as f32 - runs[3] as f32 - runs[2] as f32 / 2.0;

        let cx = center_x.floor() as isize;
        let (center_y, v_total) = Self::cross_check(matrix, cx, y as isize, (0, 1), runs[2] * 2)?;
        if 5 * v_total.abs_diff(h_total) >= 2 * h_total {
            return None;
        }

        let cy = center_y.floor() as isize;
        let (center_x, h_total) = Self::cross_check(matrix, cx, cy, (1, 0), runs[2] * 2)?;

        let cx = center_x.floor() as isize;
        let (_, d_total) = Self::cross_check(matrix, cx, cy, (1, 1), runs[2] * 3)?;
        // one diagonal step crosses one pixel column, so widths match the axes
        let expected = (h_total + v_total) as f32 / 2.0;
        if (d_total as f32 - expected).abs() > expected * 0.5 {
            return None;
        }

        let module_size = (h_total + v_total) as f32 / 14.0;
        Some(FinderPattern::new(center_x, center_y, module_size))
    }

    /// Count the five runs through `(cx, cy)` along `dir`.
    ///
    /// Returns the centre of the middle run projected on the walk axis
    /// (pixel-continuous, so a one-pixel run at 4 has centre 4.5) and the
    /// total width.
    fn cross_check(
        matrix: &BitMatrix,
        cx: isize,
        cy: isize,
        dir: (isize, isize),
        max_run: usize,
    ) -> Option<(f32, usize)> {
        let inside = |i: isize| {
            let (x, y) = (cx + i * dir.0, cy + i * dir.1);
            x >= 0 && y >= 0 && (x as usize) < matrix.width() && (y as usize) < matrix.height()
        };
        let dark = |i: isize| matrix.get_i(cx + i * dir.0, cy + i * dir.1);
        if !dark(0) {
            return None;
        }

        // walk one way: middle, light, outer dark; then the other way
        let walk = |step: isize| -> Option<[usize; 3]> {
            let mut counts = [0usize; 3];
            let mut i = if step > 0 { 1 } else { 0 };
            for (stage, expect_dark) in [(0, true), (1, false), (2, true)] {
                while inside(i) && dark(i) == expect_dark {
                    counts[stage] += 1;
                    if counts[stage] > max_run {
                        return None;
                    }
                    i += step;
                }
                if counts[stage] == 0 && stage > 0 {
                    return None;
                }
            }
            Some(counts)
        };
        let back = walk(-1)?;
        let fwd = walk(1)?;

        let runs = [back[2], back[1], back[0] + fwd[0], fwd[1], fwd[2]];
        if !Self::ratio_matches(&runs) {
            return None;
        }
        let origin = if dir.1 != 0 { cy } else { cx };
        let center = origin as f32 + 1.0 + (fwd[0] as f32 - back[0] as f32) / 2.0;
        Some((center, runs.iter().sum()))
    }

    fn merge_candidates(candidates: Vec<FinderPattern>) -> Vec<FinderPattern> {
        let mut merged: Vec<FinderPattern> = Vec::new();
        for candidate in candidates {
            match merged.iter_mut().find(|m| m.about_equals(&candidate)) {
                Some(existing) => existing.absorb(&candidate),
                None => merged.push(candidate),
            }
        }
        merged
    }
}
