//! Coordinate mapping between image pixels and pooled feature cells, and
//! bilinear up-sampling of per-cell maps back to image resolution.
use super::FeatureExtractor;
use crate::image::{ImageF32, ImageView};

impl FeatureExtractor {
    /// Position of edge-map pixel `x` in pooled-cell units.
    ///
    /// Pixels covered only by the leading part of a window are pulled towards
    /// the previous cell so that a cell's centre maps to an integer position.
    pub fn edge_to_pooled_pos(&self, x: i32) -> f32 {
        let step = self.stride() as i32;
        let res_step = self.pool_size as i32 - step;
        let mut pos = (x / step) as f32;
        let res = x % step;
        if res_step > res {
            pos -= 1.0 - (res as f32 + 0.5) / res_step as f32;
        }
        pos
    }

    /// Position of image pixel `x` in pooled-cell units (accounts for the
    /// trimmed one-pixel border).
    pub fn image_to_feature_pos(&self, x: i32) -> f32 {
        self.edge_to_pooled_pos(x - 1)
    }

    /// Bilinearly up-sample a pooled map to the image size it was computed
    /// from. Pixels whose source position falls outside the map stay zero.
    pub fn upsample_to_image(&self, map: &ImageF32) -> ImageF32 {
        if map.w == 0 || map.h == 0 {
            return ImageF32::new(0, 0);
        }
        let dw = self.image_len(map.w);
        let dh = self.image_len(map.h);
        let mut dst = ImageF32::new(dw, dh);
        let max_x = (map.w - 1) as f32;
        let max_y = (map.h - 1) as f32;
        let src_xs: Vec<f32> = (0..dw as i32).map(|x| self.image_to_feature_pos(x)).collect();

        for y in 0..dh {
            let sy = self.image_to_feature_pos(y as i32);
            if !(0.0..=max_y).contains(&sy) {
                continue;
            }
            let iy = sy as usize;
            let fy = sy - iy as f32;
            for (x, &sx) in src_xs.iter().enumerate() {
                if !(0.0..=max_x).contains(&sx) {
                    continue;
                }
                let ix = sx as usize;
                let fx = sx - ix as f32;
                let mut v = map.get(ix, iy) * (1.0 - fx) * (1.0 - fy);
                if fx > 0.0 {
                    v += map.get(ix + 1, iy) * fx * (1.0 - fy);
                }
                if fy > 0.0 {
                    v += map.get(ix, iy + 1) * (1.0 - fx) * fy;
                }
                if fx > 0.0 && fy > 0.0 {
                    v += map.get(ix + 1, iy + 1) * fx * fy;
                }
                dst.set(x, y, v);
            }
        }
        dst
    }
}

/// Row `y` of an up-sampled map as `f64`.
pub fn row_f64(img: &ImageF32, y: usize) -> Vec<f64> {
    img.row(y).iter().map(|&v| v as f64).collect()
}
