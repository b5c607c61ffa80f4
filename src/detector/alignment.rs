/// Alignment pattern search for versions 2 and up
use crate::models::{BitMatrix, Point};

/// Worst template mismatch (out of 25 samples) still accepted
const MAX_MISMATCH: usize = 3;

/// Locate the alignment pattern closest to `predicted`.
///
/// Every pixel within four modules is scored against the 5x5 module
/// template (dark ring, light ring, dark centre); the best-scoring positions
/// are averaged so the estimate lands on the centre of the middle module.
pub fn find_alignment_center(binary: &BitMatrix, predicted: Point, module_size: f32) -> Option<Point> {
    if !predicted.x.is_finite() || !predicted.y.is_finite() || module_size < 1.0 {
        return None;
    }

    let radius = (module_size * 4.0).max(4.0);
    let min_x = (predicted.x - radius).floor().max(0.0) as usize;
    let min_y = (predicted.y - radius).floor().max(0.0) as usize;
    let max_x = ((predicted.x + radius).ceil() as usize).min(binary.width().saturating_sub(1));
    let max_y = ((predicted.y + radius).ceil() as usize).min(binary.height().saturating_sub(1));

    let mut best = usize::MAX;
    let mut sum = (0.0f32, 0.0f32, 0usize);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(mismatch) = template_mismatch(binary, &center, module_size) else {
                continue;
            };
            if mismatch < best {
                best = mismatch;
                sum = (center.x, center.y, 1);
            } else if mismatch == best {
                sum.0 += center.x;
                sum.1 += center.y;
                sum.2 += 1;
            }
        }
    }

    (best <= MAX_MISMATCH && sum.2 > 0)
        .then(|| Point::new(sum.0 / sum.2 as f32, sum.1 / sum.2 as f32))
}

fn template_mismatch(binary: &BitMatrix, center: &Point, module_size: f32) -> Option<usize> {
    let mut mismatches = 0usize;
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let expected_dark = dx.abs() == 2 || dy.abs() == 2 || (dx == 0 && dy == 0);
            let sx = (center.x + dx as f32 * module_size).floor();
            let sy = (center.y + dy as f32 * module_size).floor();
            if sx < 0.0 || sy < 0.0 {
                return None;
            }
            let (ix, iy) = (sx as usize, sy as usize);
            if ix >= binary.width() || iy >= binary.height() {
                return None;
            }
            if binary.get(ix, iy) != expected_dark {
                mismatches += 1;
            }
        }
    }
    Some(mismatches)
}
