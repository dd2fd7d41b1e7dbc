//! Hard assignment of gradient magnitude to orientation channels.
use crate::edges::sobel_gradients;
use crate::image::{ImageF32, ImageView, ImageViewMut, Rect};
use std::f64::consts::PI;

/// Orientation bin of a gradient: the angle is folded into `[0, π)` and
/// rounded to the nearest of `n` equally spaced bin centres (mod `n`).
#[inline]
pub fn direction_bin(gx: f32, gy: f32, n: usize) -> usize {
    let mut angle = (gy as f64).atan2(gx as f64);
    if angle < 0.0 {
        angle += 2.0 * PI;
    }
    if angle >= PI {
        angle -= PI;
    }
    let bin_width = PI / n as f64;
    ((angle / bin_width + 0.5) as usize) % n
}

/// Split the Sobel magnitude of `img` into `n` orientation channels.
pub fn extract_direction_channels(img: &ImageF32, n: usize) -> Vec<ImageF32> {
    assert!(n > 0, "direction count must be positive");
    let grad = sobel_gradients(img);
    let mut channels = vec![ImageF32::new(img.w, img.h); n];
    for y in 0..img.h {
        let gx = grad.gx.row(y);
        let gy = grad.gy.row(y);
        let mag = grad.mag.row(y);
        for x in 0..img.w {
            let bin = direction_bin(gx[x], gy[x], n);
            channels[bin].row_mut(y)[x] = mag[x];
        }
    }
    channels
}

/// Drop the one-pixel frame. Images narrower than 3 pixels become empty.
pub fn trim_border(img: &ImageF32) -> ImageF32 {
    if img.w < 3 || img.h < 3 {
        return ImageF32::new(0, 0);
    }
    img.crop(Rect::new(1, 1, img.w as i32 - 2, img.h as i32 - 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_follow_folded_angle() {
        assert_eq!(direction_bin(1.0, 0.0, 4), 0);
        assert_eq!(direction_bin(-1.0, 0.0, 4), 0);
        assert_eq!(direction_bin(1.0, 1.0, 4), 1);
        assert_eq!(direction_bin(0.0, 1.0, 4), 2);
        assert_eq!(direction_bin(0.0, -1.0, 4), 2);
        assert_eq!(direction_bin(-1.0, 1.0, 4), 3);
        // just below π rounds up to bin n and wraps to 0
        assert_eq!(direction_bin(-1.0, 0.01, 4), 0);
    }

    #[test]
    fn each_pixel_lands_in_exactly_one_channel() {
        let mut img = ImageF32::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                img.set(x, y, ((x * x + 3 * y) % 11) as f32);
            }
        }
        let grad = sobel_gradients(&img);
        let channels = extract_direction_channels(&img, 4);
        for i in 0..64 {
            let nonzero = channels.iter().filter(|c| c.data[i] != 0.0).count();
            let total: f32 = channels.iter().map(|c| c.data[i]).sum();
            assert!(nonzero <= 1);
            assert_eq!(total, grad.mag.data[i]);
        }
    }

    #[test]
    fn trim_removes_one_pixel_frame() {
        let t = trim_border(&ImageF32::new(10, 6));
        assert_eq!((t.w, t.h), (8, 4));
        let t = trim_border(&ImageF32::new(2, 6));
        assert_eq!((t.w, t.h), (0, 0));
    }
}
