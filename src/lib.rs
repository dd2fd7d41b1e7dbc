#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classifier;
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Building blocks of the pipeline, usable on their own.
pub mod edges;
pub mod features;
pub mod locator;
pub mod mser1d;
pub mod profile;
pub mod segmenter;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{CardNumberDetector, CharacterCrop, DetectorParams};
pub use crate::error::{DetectorError, Result};
pub use crate::types::CardNumberResult;

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{DetectionReport, PipelineTrace};

// Stage entry points.
pub use crate::classifier::{char_existing_cost, CharScorer, LinearFilterBank};
pub use crate::features::FeatureExtractor;
pub use crate::locator::{detect_string_bands, Band};
pub use crate::mser1d::{Mser1d, Span};
pub use crate::segmenter::{CharacterSegmenter, CreditPattern, SegmenterParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use card_number_detector::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 400usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8::gray(w, h, &gray);
///
/// let det = CardNumberDetector::new(DetectorParams::default());
/// let report = det.detect(img);
/// println!("found={} latency_ms={:.3}", report.result.found, report.result.latency_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageU8, Rect};
    pub use crate::{CardNumberDetector, CardNumberResult, CreditPattern, DetectorParams};
}
