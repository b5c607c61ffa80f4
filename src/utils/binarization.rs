use crate::models::BitMatrix;

/// Binarize with Otsu's global threshold; true = dark
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    let threshold = calculate_otsu_threshold(gray);
    threshold_binarize(gray, width, height, threshold)
}

/// Otsu's threshold: pixels strictly below it are dark.
///
/// A single-valued histogram has no between-class variance; such images
/// split at the midpoint.
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_dark = 0.0f64;
    let mut sum_dark = 0.0f64;
    let mut max_variance = 0.0f64;
    // ties form a plateau between the classes; split it in the middle
    let mut plateau = (128usize, 128usize);

    // threshold t puts intensities [0, t) in the dark class
    for t in 1..=255usize {
        let count = histogram[t - 1] as f64;
        weight_dark += count;
        sum_dark += (t - 1) as f64 * count;
        let weight_light = total - weight_dark;
        if weight_dark == 0.0 || weight_light == 0.0 {
            continue;
        }
        let mean_dark = sum_dark / weight_dark;
        let mean_light = (sum_all - sum_dark) / weight_light;
        let variance = weight_dark * weight_light * (mean_dark - mean_light).powi(2);
        if variance > max_variance {
            max_variance = variance;
            plateau = (t, t);
        } else if variance == max_variance && variance > 0.0 {
            plateau.1 = t;
        }
    }

    ((plateau.0 + plateau.1) / 2) as u8
}

/// Local-mean binarization for unevenly lit images.
///
/// A pixel is dark when it sits more than `bias_percent` below the mean of the
/// `window` x `window` box around it (clamped at the borders).
pub fn adaptive_binarize(
    gray: &[u8],
    width: usize,
    height: usize,
    window: usize,
    bias_percent: u64,
) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    if width == 0 || height == 0 || gray.len() < width * height {
        return binary;
    }

    let stride = width + 1;
    let mut integral = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let radius = window / 2;
    for y in 0..height {
        let (y0, y1) = (y.saturating_sub(radius), (y + radius + 1).min(height));
        for x in 0..width {
            let (x0, x1) = (x.saturating_sub(radius), (x + radius + 1).min(width));
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let area = ((x1 - x0) * (y1 - y0)) as u64;
            let pixel = gray[y * width + x] as u64;
            if pixel * area * 100 < sum * (100 - bias_percent.min(100)) {
                binary.set(x, y, true);
            }
        }
    }
    binary
}

/// Global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    for (y, row) in gray.chunks_exact(width.max(1)).take(height).enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value < threshold {
                binary.set(x, y, true);
            }
        }
    }
    binary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = vec![100, 150, 200, 50];
        let binary = threshold_binarize(&gray, 2, 2, 128);

        assert!(binary.get(0, 0));
        assert!(!binary.get(1, 0));
        assert!(!binary.get(0, 1));
        assert!(binary.get(1, 1));
    }

    #[test]
    fn test_otsu_binarize() {
        let mut gray = vec![50u8; 50];
        gray.extend(vec![200u8; 50]);

        assert_eq!(calculate_otsu_threshold(&gray), 125);

        let binary = otsu_binarize(&gray, 10, 10);
        assert!(binary.get(0, 0));
        assert!(!binary.get(0, 7));
    }

    #[test]
    fn test_adaptive_handles_gradient() {
        // dark square on a background that brightens left to right
        let (w, h) = (40usize, 20usize);
        let mut gray = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                let background = 120 + (x * 3) as u8;
                let inside = (16..24).contains(&x) && (6..14).contains(&y);
                gray[y * w + x] = if inside { background - 60 } else { background };
            }
        }
        let binary = adaptive_binarize(&gray, w, h, 15, 10);
        assert!(binary.get(20, 10));
        assert!(!binary.get(2, 10));
        assert!(!binary.get(38, 10));
    }

    #[test]
    fn test_uniform_images() {
        assert!(otsu_binarize(&[255u8; 16], 4, 4).count_ones() == 0);
        assert_eq!(otsu_binarize(&[0u8; 16], 4, 4).count_ones(), 16);
    }
}
