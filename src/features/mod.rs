//! Orientation-decomposed, max-pooled edge features.
//!
//! Pipeline per image:
//! 1. Sobel derivatives; each pixel's magnitude goes to exactly one of `N`
//!    orientation channels (angle folded into `[0, π)`).
//! 2. A one-pixel frame is trimmed from every channel (Sobel border artifacts).
//! 3. Every channel is max-pooled with overlapping square windows.
//!
//! The pooled maps feed the external digit classifier (flattened with
//! [`FeatureExtractor::feature_vector`]) and, through the coordinate helpers in
//! [`mapping`], let per-cell classifier responses be projected back onto image
//! pixels.

pub mod channels;
pub mod mapping;
pub mod pooling;

use crate::image::ImageF32;
use serde::{Deserialize, Serialize};

pub use channels::{extract_direction_channels, trim_border};
pub use pooling::max_pool;

/// Feature extraction settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureExtractor {
    /// Number of orientation bins over `[0, π)`.
    pub directions: usize,
    /// Side of the square pooling window.
    pub pool_size: usize,
    /// Fraction of the window shared by neighbouring cells, in `[0, 1)`.
    pub overlap: f32,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            directions: 4,
            pool_size: 4,
            overlap: 0.5,
        }
    }
}

impl FeatureExtractor {
    pub fn new(directions: usize, pool_size: usize, overlap: f32) -> Self {
        let fe = Self {
            directions,
            pool_size,
            overlap,
        };
        fe.validate();
        fe
    }

    fn validate(&self) {
        assert!(self.directions > 0, "direction count must be positive");
        assert!(
            (0.0..1.0).contains(&self.overlap),
            "overlap must lie in [0, 1), got {}",
            self.overlap
        );
        assert!(
            self.stride() > 0,
            "pool size {} with overlap {} yields a zero stride",
            self.pool_size,
            self.overlap
        );
    }

    /// Distance between neighbouring pooling windows.
    #[inline]
    pub fn stride(&self) -> usize {
        pooling::pool_stride(self.pool_size, self.overlap)
    }

    /// Pooled maps, one per orientation channel. Empty input gives no maps.
    pub fn extract(&self, img: &ImageF32) -> Vec<ImageF32> {
        self.validate();
        if img.w == 0 || img.h == 0 {
            return Vec::new();
        }
        extract_direction_channels(img, self.directions)
            .iter()
            .map(|channel| max_pool(&trim_border(channel), self.pool_size, self.overlap))
            .collect()
    }

    /// Row-major concatenation of every pooled map, in channel order.
    pub fn feature_vector(&self, img: &ImageF32) -> Vec<f32> {
        flatten_maps(&self.extract(img))
    }

    /// Pooled length for an edge-map length (after border trim).
    pub fn pooled_len(&self, edge_len: usize) -> usize {
        pooling::pooled_len(edge_len, self.pool_size, self.stride())
    }

    /// Edge-map length covered by `pooled` cells.
    pub fn edge_len(&self, pooled: usize) -> usize {
        pooling::edge_len(pooled, self.pool_size, self.stride())
    }

    /// Pooled length produced for an input image length.
    pub fn feature_len(&self, image_len: usize) -> usize {
        self.pooled_len(image_len.saturating_sub(2))
    }

    /// Image length spanned by `feature` pooled cells.
    pub fn image_len(&self, feature: usize) -> usize {
        self.edge_len(feature) + 2
    }

    /// Number of values in the feature vector of a `w × h` image.
    pub fn feature_dim(&self, w: usize, h: usize) -> usize {
        self.directions * self.feature_len(w) * self.feature_len(h)
    }
}

/// Concatenate maps row-major, in the given order.
pub fn flatten_maps(maps: &[ImageF32]) -> Vec<f32> {
    let total = maps.iter().map(|m| m.data.len()).sum();
    let mut out = Vec::with_capacity(total);
    for m in maps {
        out.extend_from_slice(&m.data);
    }
    out
}
