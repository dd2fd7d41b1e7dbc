//! 1D signal helpers shared by the string locator and the character segmenter.
//!
//! Profiles are `f64` sequences obtained by averaging an edge image along one
//! axis. Filtering uses correlation (kernel not flipped) with the anchor at
//! the kernel centre and reflect-101 borders (`x[-1] = x[1]`).
use crate::image::{ImageF32, ImageView};

/// Map an out-of-range index into `[0, len)` by reflection without repeating
/// the edge sample. `len == 1` always maps to 0.
#[inline]
pub fn reflect_101(mut i: isize, len: usize) -> usize {
    debug_assert!(len > 0, "reflect_101 on empty signal");
    let n = len as isize;
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Mean of each row (one value per row).
pub fn row_projection(img: &ImageF32) -> Vec<f64> {
    if img.w == 0 {
        return vec![0.0; img.h];
    }
    img.rows()
        .map(|row| row.iter().map(|&v| v as f64).sum::<f64>() / img.w as f64)
        .collect()
}

/// Mean of each column (one value per column).
pub fn column_projection(img: &ImageF32) -> Vec<f64> {
    let mut out = vec![0.0f64; img.w];
    if img.h == 0 {
        return out;
    }
    for row in img.rows() {
        for (acc, &v) in out.iter_mut().zip(row) {
            *acc += v as f64;
        }
    }
    let inv = 1.0 / img.h as f64;
    out.iter_mut().for_each(|v| *v *= inv);
    out
}

/// Odd smoothing width derived from an image width: `w / 80`, at least 3.
pub fn odd_filter_width(image_width: usize) -> usize {
    let k = image_width / 80;
    if k < 3 {
        3
    } else {
        k + (1 - k % 2)
    }
}

/// Normalised Gaussian taps of length `ksize`. A non-positive `sigma` is
/// derived from the size.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f64> {
    assert!(ksize % 2 == 1, "Gaussian kernel size must be odd, got {ksize}");
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let c = (ksize as f64 - 1.0) * 0.5;
    let scale = -0.5 / (sigma * sigma);
    let mut taps: Vec<f64> = (0..ksize)
        .map(|i| {
            let d = i as f64 - c;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.iter_mut().for_each(|t| *t /= sum);
    taps
}

/// Correlate `signal` with `kernel`, anchor at the kernel centre.
pub fn correlate(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let anchor = (kernel.len() / 2) as isize;
    (0..n as isize)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(j, &k)| k * signal[reflect_101(i + j as isize - anchor, n)])
                .sum()
        })
        .collect()
}

/// Gaussian smoothing with kernel width `ksize` (odd) and `sigma`.
pub fn gaussian_smooth(signal: &[f64], ksize: usize, sigma: f64) -> Vec<f64> {
    correlate(signal, &gaussian_kernel(ksize, sigma))
}

/// Linearly rescale into `[lo, hi]`. A constant signal maps to `lo`.
pub fn normalize_min_max(signal: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    let (min, max) = signal
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), &v| {
            (a.min(v), b.max(v))
        });
    let range = max - min;
    let scale = if range > f64::EPSILON {
        (hi - lo) / range
    } else {
        0.0
    };
    signal.iter().map(|&v| lo + (v - min) * scale).collect()
}

const CENTRAL_DIFF: [f64; 3] = [-0.5, 0.0, 0.5];

/// First and second central-difference derivatives.
pub fn derivatives(signal: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let d1 = correlate(signal, &CENTRAL_DIFF);
    let d2 = correlate(&d1, &CENTRAL_DIFF);
    (d1, d2)
}

/// Moving average over an odd window centred on each sample.
pub fn box_mean(signal: &[f64], window: usize) -> Vec<f64> {
    assert!(window % 2 == 1, "box window must be odd, got {window}");
    let taps = vec![1.0 / window as f64; window];
    correlate(signal, &taps)
}

/// Derivative between block means on either side of each sample.
///
/// The block is forced odd; the result at `i` is
/// `0.1 · (mean[i + c] − mean[i − c])` with `c = (block + 1) / 2`, which
/// responds to whole-string edges rather than gaps between characters.
pub fn block_derivative(signal: &[f64], block: usize) -> Vec<f64> {
    let block = block + (1 - block % 2);
    let smoothed = box_mean(signal, block);
    let mut kernel = vec![0.0; block + 2];
    kernel[0] = -0.1;
    kernel[block + 1] = 0.1;
    correlate(&smoothed, &kernel)
}

/// Running sum: `out[i] = signal[0] + … + signal[i]`.
pub fn cumulative_sum(signal: &[f64]) -> Vec<f64> {
    signal
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Indices that sort `values` ascending; equal values keep their order.
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    idx
}

/// `ln(1 + e^x)`, stable for large `|x|`.
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 30.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reflect_101_mirrors_without_repeating_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(12, 3), 0);
        assert_eq!(reflect_101(-7, 1), 0);
    }

    #[test]
    fn filter_width_is_odd_and_at_least_three() {
        assert_eq!(odd_filter_width(100), 3);
        assert_eq!(odd_filter_width(320), 5);
        assert_eq!(odd_filter_width(400), 5);
        assert_eq!(odd_filter_width(480), 7);
    }

    #[test]
    fn gaussian_kernel_is_normalised_and_symmetric() {
        let k = gaussian_kernel(5, 1.0);
        assert!(approx_eq(k.iter().sum::<f64>(), 1.0));
        assert!(approx_eq(k[0], k[4]));
        assert!(k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn derivative_of_ramp_is_constant_inside() {
        let ramp: Vec<f64> = (0..8).map(|v| v as f64).collect();
        let (d1, d2) = derivatives(&ramp);
        for i in 1..7 {
            assert!(approx_eq(d1[i], 1.0));
        }
        for i in 2..6 {
            assert!(approx_eq(d2[i], 0.0));
        }
        // reflect-101 makes the border derivative vanish
        assert!(approx_eq(d1[0], 0.0));
    }

    #[test]
    fn normalisation_and_cumsum() {
        let n = normalize_min_max(&[2.0, 4.0, 3.0], 0.0, 100.0);
        assert_eq!(n, vec![0.0, 100.0, 50.0]);
        assert_eq!(normalize_min_max(&[5.0, 5.0], 0.0, 100.0), vec![0.0, 0.0]);
        assert_eq!(cumulative_sum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn argsort_is_stable() {
        assert_eq!(argsort(&[3.0, 1.0, 3.0, 0.5]), vec![3, 1, 0, 2]);
    }

    #[test]
    fn block_derivative_detects_plateau_edges() {
        let mut s = vec![0.0; 40];
        for v in s.iter_mut().skip(10).take(20) {
            *v = 10.0;
        }
        let d = block_derivative(&s, 4);
        let rise = (0..40).max_by(|&a, &b| d[a].total_cmp(&d[b])).unwrap();
        let fall = (0..40).min_by(|&a, &b| d[a].total_cmp(&d[b])).unwrap();
        assert!(rise < 12 && rise > 5, "rise at {rise}");
        assert!(fall > 26 && fall < 34, "fall at {fall}");
    }

    #[test]
    fn projections_average_along_the_other_axis() {
        let img = ImageF32::from_vec(2, 2, vec![1.0, 3.0, 5.0, 7.0]);
        assert_eq!(row_projection(&img), vec![2.0, 6.0]);
        assert_eq!(column_projection(&img), vec![3.0, 5.0]);
    }
}
