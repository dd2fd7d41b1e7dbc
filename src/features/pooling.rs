//! Overlapping max pooling and the size arithmetic that goes with it.
use crate::image::{ImageF32, ImageView};

/// `floor(pool · (1 − overlap))`.
#[inline]
pub fn pool_stride(pool: usize, overlap: f32) -> usize {
    (pool as f64 * (1.0 - overlap as f64)) as usize
}

/// `floor((len − pool) / stride) + 1`, or 0 when no full window fits.
#[inline]
pub fn pooled_len(len: usize, pool: usize, stride: usize) -> usize {
    if len < pool || stride == 0 {
        0
    } else {
        (len - pool) / stride + 1
    }
}

/// Input length covered by `pooled` cells: `pooled · stride + (pool − stride)`.
#[inline]
pub fn edge_len(pooled: usize, pool: usize, stride: usize) -> usize {
    pooled * stride + pool.saturating_sub(stride)
}

/// Max over `pool × pool` windows placed every `stride` pixels.
///
/// Windows starting beyond `len − stride` are not emitted; the matching
/// output cells stay zero.
pub fn max_pool(img: &ImageF32, pool: usize, overlap: f32) -> ImageF32 {
    let stride = pool_stride(pool, overlap);
    assert!(stride > 0, "pooling stride must be positive");
    let ow = pooled_len(img.w, pool, stride);
    let oh = pooled_len(img.h, pool, stride);
    let mut out = ImageF32::new(ow, oh);
    if ow == 0 || oh == 0 {
        return out;
    }
    let max_x = img.w - stride;
    let max_y = img.h - stride;
    for oy in 0..oh {
        let y0 = oy * stride;
        if y0 > max_y {
            break;
        }
        let y1 = (y0 + pool).min(img.h);
        for ox in 0..ow {
            let x0 = ox * stride;
            if x0 > max_x {
                break;
            }
            let x1 = (x0 + pool).min(img.w);
            let mut best = f32::NEG_INFINITY;
            for y in y0..y1 {
                for &v in &img.row(y)[x0..x1] {
                    best = best.max(v);
                }
            }
            out.set(ox, oy, best);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_size_formula() {
        assert_eq!(pool_stride(4, 0.5), 2);
        assert_eq!(pooled_len(100, 4, 2), 49);
        assert_eq!(pooled_len(3, 4, 2), 0);
        assert_eq!(pooled_len(4, 4, 4), 1);
        assert_eq!(edge_len(49, 4, 2), 100);
    }

    #[test]
    fn pooling_takes_window_maximum() {
        let data: Vec<f32> = (0..36).map(|v| v as f32).collect();
        let img = ImageF32::from_vec(6, 6, data);
        let out = max_pool(&img, 4, 0.5);
        assert_eq!((out.w, out.h), (2, 2));
        assert_eq!(out.get(0, 0), 21.0);
        assert_eq!(out.get(1, 0), 23.0);
        assert_eq!(out.get(0, 1), 33.0);
        assert_eq!(out.get(1, 1), 35.0);
    }

    #[test]
    fn non_overlapping_pooling() {
        let img = ImageF32::from_vec(4, 2, vec![1.0, 5.0, 2.0, 0.0, 3.0, 4.0, 9.0, 1.0]);
        let out = max_pool(&img, 2, 0.0);
        assert_eq!(out.data, vec![5.0, 9.0]);
    }
}
