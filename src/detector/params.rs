//! Parameter types configuring the detector stages.
//!
//! Defaults match a detector trained on 16×24 digit patches and run on images
//! scaled to 320 pixels wide.
use crate::features::FeatureExtractor;
use crate::segmenter::SegmenterParams;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Width the input is resized to before edge extraction.
    pub input_width: usize,
    /// Digit patch size `(width, height)` the classifier was trained on.
    pub train_char_size: (usize, usize),
    pub features: FeatureExtractor,
    pub segmenter: SegmenterParams,
    /// Search candidate bands on the rayon pool.
    pub parallel_bands: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_width: 320,
            train_char_size: (16, 24),
            features: FeatureExtractor::default(),
            segmenter: SegmenterParams::default(),
            parallel_bands: true,
        }
    }
}

impl DetectorParams {
    /// Processing size for an input of `w × h` pixels.
    pub fn processing_size(&self, w: usize, h: usize) -> (usize, usize) {
        if w == 0 {
            return (self.input_width, 0);
        }
        let ph = (h as f64 * self.input_width as f64 / w as f64).round() as usize;
        (self.input_width, ph)
    }
}
