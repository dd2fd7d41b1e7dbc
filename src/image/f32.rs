//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Suited for numeric processing in the pipeline. Provides row access, a
//! contiguous slice, rectangular crops and bilinear resampling.
use super::traits::{ImageView, ImageViewMut};
use super::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap existing row-major data.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), w * h, "data length must equal w * h");
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Copy the pixels inside `rect`. The rectangle must lie inside the image.
    pub fn crop(&self, rect: Rect) -> ImageF32 {
        assert!(
            rect.x >= 0
                && rect.y >= 0
                && rect.width >= 0
                && rect.height >= 0
                && rect.right() as usize <= self.w
                && rect.bottom() as usize <= self.h,
            "crop {:?} outside {}x{} image",
            rect,
            self.w,
            self.h
        );
        let (x0, y0) = (rect.x as usize, rect.y as usize);
        let (cw, ch) = (rect.width as usize, rect.height as usize);
        let mut out = ImageF32::new(cw, ch);
        for y in 0..ch {
            out.row_mut(y)
                .copy_from_slice(&self.row(y0 + y)[x0..x0 + cw]);
        }
        out
    }

    /// Largest pixel value, or `None` for an empty image.
    pub fn max_value(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    /// Bilinear resize using pixel-centre alignment with clamped borders.
    pub fn resize_bilinear(&self, nw: usize, nh: usize) -> ImageF32 {
        let mut out = ImageF32::new(nw, nh);
        if self.w == 0 || self.h == 0 || nw == 0 || nh == 0 {
            return out;
        }
        let xs = resample_taps(self.w, nw);
        let ys = resample_taps(self.h, nh);
        for (y, &(y0, y1, fy)) in ys.iter().enumerate() {
            let r0 = self.row(y0);
            let r1 = self.row(y1);
            let dst = out.row_mut(y);
            for (d, &(x0, x1, fx)) in dst.iter_mut().zip(xs.iter()) {
                let top = r0[x0] * (1.0 - fx) + r0[x1] * fx;
                let bottom = r1[x0] * (1.0 - fx) + r1[x1] * fx;
                *d = top * (1.0 - fy) + bottom * fy;
            }
        }
        out
    }
}

/// Linear resampling of a 1D signal to `len` samples with the same
/// pixel-centre convention as [`ImageF32::resize_bilinear`].
pub fn resize_linear_1d(src: &[f64], len: usize) -> Vec<f64> {
    if src.is_empty() {
        return vec![0.0; len];
    }
    resample_taps(src.len(), len)
        .into_iter()
        .map(|(i0, i1, f)| src[i0] * (1.0 - f as f64) + src[i1] * f as f64)
        .collect()
}

/// Source index pair and blend factor for every destination sample.
fn resample_taps(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (s.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let f = if i0 == last { 0.0 } else { s - i0 as f32 };
            (i0, i1, f)
        })
        .collect()
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_constant_image_constant() {
        let img = ImageF32::from_vec(4, 2, vec![7.0; 8]);
        let out = img.resize_bilinear(9, 5);
        assert_eq!((out.w, out.h), (9, 5));
        assert!(out.data.iter().all(|&v| (v - 7.0).abs() < 1e-5));
    }

    #[test]
    fn crop_copies_the_requested_window() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let img = ImageF32::from_vec(4, 3, data);
        let c = img.crop(Rect::new(1, 1, 2, 2));
        assert_eq!(c.data, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn linear_1d_identity_when_sizes_match() {
        let src = [1.0, 2.0, 4.0];
        assert_eq!(resize_linear_1d(&src, 3), src.to_vec());
    }
}
