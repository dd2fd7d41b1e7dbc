use super::ImageF32;

/// Borrowed 8-bit image, either single channel or interleaved RGB.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed single-channel view.
    pub fn gray(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            channels: 1,
            data,
        }
    }

    /// Tightly packed interleaved RGB view.
    pub fn rgb(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * 3,
            channels: 3,
            data,
        }
    }

    /// Convert to a single-channel float image in grey-level units.
    ///
    /// RGB input is reduced with the ITU-R BT.601 luma weights.
    pub fn to_gray_f32(&self) -> ImageF32 {
        assert!(
            self.channels == 1 || self.channels == 3,
            "unsupported channel count {}",
            self.channels
        );
        assert!(
            self.h == 0 || self.data.len() >= (self.h - 1) * self.stride + self.w * self.channels,
            "pixel buffer too small for {}x{}x{}",
            self.w,
            self.h,
            self.channels
        );
        let mut out = ImageF32::new(self.w, self.h);
        for y in 0..self.h {
            let src = &self.data[y * self.stride..y * self.stride + self.w * self.channels];
            let dst = &mut out.data[y * self.w..(y + 1) * self.w];
            if self.channels == 1 {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d = s as f32;
                }
            } else {
                for (d, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
                    *d = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                }
            }
        }
        out
    }
}
