//! Module-space to image-space mapping and grid sampling.

use crate::models::{BitMatrix, Point};

/// Projective transform (3x3, a33 = 1)
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveTransform {
    m: [f64; 8],
}

impl PerspectiveTransform {
    /// Transform taking each `src[i]` to `dst[i]`
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);
            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        solve_linear_system(a, b).map(|m| Self { m })
    }

    /// Map a symbol of `dimension` modules onto three finder centres.
    ///
    /// The fourth anchor is either a located bottom-right alignment pattern
    /// (module centre `dimension - 6.5`) or, without one, the parallelogram
    /// completion at the missing finder, which makes the map affine.
    pub fn for_symbol(
        top_left: Point,
        top_right: Point,
        bottom_left: Point,
        alignment: Option<Point>,
        dimension: usize,
    ) -> Option<Self> {
        let far = dimension as f32 - 3.5;
        let (src4, dst4) = match alignment {
            Some(found) => {
                let a = dimension as f32 - 6.5;
                (Point::new(a, a), found)
            }
            None => (
                Point::new(far, far),
                Point::new(
                    top_right.x + bottom_left.x - top_left.x,
                    top_right.y + bottom_left.y - top_left.y,
                ),
            ),
        };
        let src = [
            Point::new(3.5, 3.5),
            Point::new(far, 3.5),
            Point::new(3.5, far),
            src4,
        ];
        let dst = [top_left, top_right, bottom_left, dst4];
        Self::from_points(&src, &dst)
    }

    pub fn transform(&self, p: &Point) -> Point {
        let [a11, a12, a13, a21, a22, a23, a31, a32] = self.m;
        let (x, y) = (p.x as f64, p.y as f64);
        let denominator = a31 * x + a32 * y + 1.0;
        if denominator.abs() < 1e-12 {
            return Point::new(f32::NAN, f32::NAN);
        }
        Point::new(
            ((a11 * x + a12 * y + a13) / denominator) as f32,
            ((a21 * x + a22 * y + a23) / denominator) as f32,
        )
    }
}

/// Sample module centres of a `dimension`-wide grid.
///
/// Fails when a centre lands more than one pixel outside the image; samples
/// just past the border are clamped.
pub fn sample_grid(
    binary: &BitMatrix,
    transform: &PerspectiveTransform,
    dimension: usize,
) -> Option<BitMatrix> {
    let (w, h) = (binary.width() as f32, binary.height() as f32);
    let mut grid = BitMatrix::square(dimension);
    for my in 0..dimension {
        for mx in 0..dimension {
            let p = transform.transform(&Point::new(mx as f32 + 0.5, my as f32 + 0.5));
            if !(p.x >= -1.0 && p.y >= -1.0 && p.x <= w + 1.0 && p.y <= h + 1.0) {
                return None;
            }
            let x = (p.x.floor().max(0.0) as usize).min(binary.width() - 1);
            let y = (p.y.floor().max(0.0) as usize).min(binary.height() - 1);
            if binary.get(x, y) {
                grid.set(mx, my, true);
            }
        }
    }
    Some(grid)
}

/// Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    let n = 8;

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > a[max_row][i].abs() {
                max_row = k;
            }
        }
        if a[max_row][i].abs() < 1e-12 {
            return None;
        }
        a.swap(i, max_row);
        b.swap(i, max_row);

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_perspective_transform() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        assert!(close(t.transform(&Point::new(50.0, 50.0)), Point::new(25.0, 25.0)));
    }

    #[test]
    fn test_symbol_transform_is_affine_without_alignment() {
        // 21 modules at 4 px each, offset 10 px
        let at = |m: f32| 10.0 + m * 4.0;
        let t = PerspectiveTransform::for_symbol(
            Point::new(at(3.5), at(3.5)),
            Point::new(at(17.5), at(3.5)),
            Point::new(at(3.5), at(17.5)),
            None,
            21,
        )
        .unwrap();
        assert!(close(t.transform(&Point::new(0.0, 0.0)), Point::new(10.0, 10.0)));
        assert!(close(t.transform(&Point::new(21.0, 21.0)), Point::new(94.0, 94.0)));
    }

    #[test]
    fn test_sample_grid() {
        let mut binary = BitMatrix::new(20, 20);
        // 2x2 modules of 10 px, dark top-left and bottom-right
        for y in 0..20 {
            for x in 0..20 {
                binary.set(x, y, (x < 10) == (y < 10));
            }
        }
        let src = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(0.0, 20.0),
            Point::new(20.0, 20.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        let grid = sample_grid(&binary, &t, 2).unwrap();
        assert!(grid.get(0, 0) && grid.get(1, 1));
        assert!(!grid.get(1, 0) && !grid.get(0, 1));
    }

    #[test]
    fn test_sample_outside_image_fails() {
        let binary = BitMatrix::new(10, 10);
        let src = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(0.0, 30.0),
            Point::new(30.0, 30.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        assert!(sample_grid(&binary, &t, 2).is_none());
    }
}
