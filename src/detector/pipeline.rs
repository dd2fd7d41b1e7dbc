//! End-to-end card-number detection.
//!
//! Typical usage:
//! ```no_run
//! use card_number_detector::{CardNumberDetector, DetectorParams};
//! use card_number_detector::image::ImageU8;
//!
//! # fn example(gray: ImageU8) {
//! let detector = CardNumberDetector::new(DetectorParams::default());
//! let report = detector.detect(gray);
//! if report.result.found {
//!     println!("{:?}: {} digits", report.result.pattern, report.result.digit_count());
//! }
//! # }
//! ```

// Stages
// - Grayscale: 8-bit gray or RGB input to float luminance.
// - Resize: bilinear resize to `input_width` columns, aspect preserved.
// - Edges: Sobel L1 magnitude `|gx| + |gy|`.
// - Locate: row-profile MSER bands ranked by the positional prior.
// - Segment: template branch-and-bound inside every band, cheapest wins.
// - Rescale: boxes back to input coordinates, clipped to the image.

use super::params::DetectorParams;
use super::scaling::rescale_rect;
use crate::classifier::{char_existing_cost, CharScorer};
use crate::diagnostics::{DetectionReport, InputDescriptor, PipelineTrace, TimingBreakdown};
use crate::edges::edge_image;
use crate::features::FeatureExtractor;
use crate::image::{ImageF32, ImageU8, Rect};
use crate::locator::detect_string_bands;
use crate::segmenter::CharacterSegmenter;
use crate::types::CardNumberResult;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// One digit crop prepared for the external classifier.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCrop {
    /// Box in input-image coordinates.
    pub rect: Rect,
    /// Grayscale crop resized to the training patch size.
    #[serde(skip)]
    pub patch: ImageF32,
    pub features: Vec<f32>,
}

/// Locates the card-number line and splits it into digit boxes.
pub struct CardNumberDetector {
    params: DetectorParams,
    extractor: FeatureExtractor,
    segmenter: CharacterSegmenter,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl CardNumberDetector {
    /// Create a detector with the supplied parameters.
    pub fn new(params: DetectorParams) -> Self {
        assert!(params.input_width > 0, "processing width must be positive");
        let (tw, th) = params.train_char_size;
        assert!(tw > 0 && th > 0, "training patch size must be positive");
        let fe = params.features;
        let extractor = FeatureExtractor::new(fe.directions, fe.pool_size, fe.overlap);
        let segmenter =
            CharacterSegmenter::new(params.segmenter).with_parallel(params.parallel_bands);
        Self {
            params,
            extractor,
            segmenter,
        }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Run the full pipeline on an 8-bit gray or RGB image.
    pub fn detect(&self, img: ImageU8) -> DetectionReport {
        assert!(img.w > 0 && img.h > 0, "cannot detect on an empty image");
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let stage = Instant::now();
        let gray = img.to_gray_f32();
        timings.push("grayscale", elapsed_ms(stage));

        let mut report = self.detect_gray(&gray, &mut timings);
        timings.total_ms = elapsed_ms(total_start);
        report.result.latency_ms = timings.total_ms;
        report.trace.timings = timings;
        report
    }

    fn detect_gray(&self, gray: &ImageF32, timings: &mut TimingBreakdown) -> DetectionReport {
        let (pw, ph) = self.params.processing_size(gray.w, gray.h);
        let input = InputDescriptor {
            width: gray.w,
            height: gray.h,
            processing_width: pw,
            processing_height: ph,
        };

        let stage = Instant::now();
        let proc_img = gray.resize_bilinear(pw, ph);
        timings.push("resize", elapsed_ms(stage));

        let stage = Instant::now();
        let edge = edge_image(&proc_img);
        timings.push("edges", elapsed_ms(stage));

        let stage = Instant::now();
        let (min_h, max_h) = self.params.segmenter.height_bounds(edge.w);
        let bands = detect_string_bands(&edge, min_h, max_h);
        timings.push("locate", elapsed_ms(stage));

        let stage = Instant::now();
        let outcome = self.segmenter.segment(&edge, &bands);
        timings.push("segment", elapsed_ms(stage));

        let mut trace = PipelineTrace {
            input,
            bands: outcome.bands,
            ..PipelineTrace::default()
        };
        let Some(best) = outcome.best else {
            debug!(
                "CardNumberDetector: nothing found in {}x{} ({} bands)",
                gray.w,
                gray.h,
                bands.len()
            );
            return DetectionReport {
                result: CardNumberResult::default(),
                trace,
            };
        };

        let ratio = input.scale();
        let boxes: Vec<Rect> = best
            .boxes
            .iter()
            .filter_map(|&b| rescale_rect(b, ratio, gray.w, gray.h))
            .collect();
        let found = !boxes.is_empty();
        debug!(
            "CardNumberDetector: {:?} with {} boxes (cost {:.3})",
            best.pattern,
            boxes.len(),
            best.cost
        );
        trace.chosen_band = Some(best.band_index);
        trace.breaks = best.breaks;
        let result = CardNumberResult {
            found,
            pattern: found.then_some(best.pattern),
            band: rescale_rect(best.band, ratio, gray.w, gray.h),
            cost: Some(best.cost),
            boxes,
            latency_ms: 0.0,
        };
        DetectionReport { result, trace }
    }

    /// Crop every box from `img`, resize it to the training patch size and
    /// compute its feature vector.
    pub fn crop_characters(&self, img: ImageU8, boxes: &[Rect]) -> Vec<CharacterCrop> {
        let gray = img.to_gray_f32();
        let (tw, th) = self.params.train_char_size;
        boxes
            .iter()
            .filter_map(|b| {
                let rect = b.clip_to(gray.w, gray.h);
                if rect.is_empty() {
                    return None;
                }
                let patch = gray.crop(rect).resize_bilinear(tw, th);
                let features = self.extractor.feature_vector(&patch);
                Some(CharacterCrop {
                    rect,
                    patch,
                    features,
                })
            })
            .collect()
    }

    /// Per-column digit presence costs along `band` of a grayscale image,
    /// stretched to `size` columns. See [`char_existing_cost`].
    pub fn char_existing_cost<S: CharScorer + ?Sized>(
        &self,
        scorer: &S,
        band: &ImageF32,
        size: usize,
    ) -> Option<(Vec<f64>, Vec<f64>)> {
        char_existing_cost(
            &self.extractor,
            scorer,
            band,
            self.params.train_char_size.1,
            size,
        )
    }
}
