//! Boundary to the per-character classifier.
//!
//! The detector only needs two things from a classifier: dense per-class
//! responses over pooled feature maps ([`CharScorer::score_maps`]) and their
//! conversion into "digit here" / "no digit here" costs
//! ([`CharScorer::cost`]). [`LinearFilterBank`] implements both for linear
//! one-vs-rest models by reshaping every weight vector into one 2D filter per
//! orientation channel.
use crate::error::{DetectorError, Result};
use crate::features::mapping::row_f64;
use crate::features::FeatureExtractor;
use crate::image::f32::resize_linear_1d;
use crate::image::ImageF32;
use crate::profile::reflect_101;

/// Dense scoring of pooled feature maps.
pub trait CharScorer {
    /// One response map per class, each the size of the pooled maps.
    fn score_maps(&self, pooled: &[ImageF32]) -> Vec<ImageF32>;

    /// Turn per-class responses into `(exist, non_exist)` cost maps.
    fn cost(&self, responses: &[ImageF32]) -> (ImageF32, ImageF32);
}

/// Linear one-vs-rest classifiers applied as correlation filters.
///
/// The last class is the background class.
#[derive(Clone, Debug)]
pub struct LinearFilterBank {
    filter_w: usize,
    filter_h: usize,
    channels: usize,
    /// Per class: `channels` filters of `filter_w * filter_h` weights, row-major.
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
}

impl LinearFilterBank {
    /// Build the bank from one coefficient row per class.
    ///
    /// Each row holds `channels * filter_w * filter_h` weights, channel-major
    /// and row-major within a channel, followed by the bias.
    pub fn from_coefficients(rows: &[Vec<f32>], filter_w: usize, filter_h: usize) -> Result<Self> {
        let invalid = |reason: String| DetectorError::Coefficients { reason };
        if filter_w == 0 || filter_h == 0 {
            return Err(invalid(format!("filter size {filter_w}x{filter_h} is empty")));
        }
        if rows.len() < 2 {
            return Err(invalid(format!(
                "need at least one digit class and a background class, got {} rows",
                rows.len()
            )));
        }
        let area = filter_w * filter_h;
        let row_len = rows[0].len();
        if row_len < area + 1 || (row_len - 1) % area != 0 {
            return Err(invalid(format!(
                "row length {row_len} is not a multiple of {area} plus a bias"
            )));
        }
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != row_len) {
            return Err(invalid(format!(
                "row {i} has {} values, expected {row_len}",
                r.len()
            )));
        }
        Ok(Self {
            filter_w,
            filter_h,
            channels: (row_len - 1) / area,
            weights: rows.iter().map(|r| r[..row_len - 1].to_vec()).collect(),
            biases: rows.iter().map(|r| r[row_len - 1]).collect(),
        })
    }

    /// Filter bank sized for the pooled maps of a `train_w × train_h` patch.
    pub fn for_training_size(
        rows: &[Vec<f32>],
        extractor: &FeatureExtractor,
        train_w: usize,
        train_h: usize,
    ) -> Result<Self> {
        let bank = Self::from_coefficients(
            rows,
            extractor.feature_len(train_w),
            extractor.feature_len(train_h),
        )?;
        if bank.channels != extractor.directions {
            return Err(DetectorError::Coefficients {
                reason: format!(
                    "{} filter channels for {} orientation channels",
                    bank.channels, extractor.directions
                ),
            });
        }
        Ok(bank)
    }

    pub fn classes(&self) -> usize {
        self.weights.len()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn filter_size(&self) -> (usize, usize) {
        (self.filter_w, self.filter_h)
    }

    fn filter(&self, class: usize, channel: usize) -> &[f32] {
        let area = self.filter_w * self.filter_h;
        &self.weights[class][channel * area..(channel + 1) * area]
    }
}

/// Correlate `src` with a `kw × kh` kernel anchored at its centre, reflect-101
/// borders, accumulating into `dst`.
fn correlate_add(src: &ImageF32, kernel: &[f32], kw: usize, kh: usize, dst: &mut ImageF32) {
    let (ax, ay) = ((kw / 2) as isize, (kh / 2) as isize);
    for y in 0..src.h {
        for x in 0..src.w {
            let mut acc = 0.0f32;
            for ky in 0..kh {
                let sy = reflect_101(y as isize + ky as isize - ay, src.h);
                for kx in 0..kw {
                    let sx = reflect_101(x as isize + kx as isize - ax, src.w);
                    acc += kernel[ky * kw + kx] * src.get(sx, sy);
                }
            }
            let i = dst.idx(x, y);
            dst.data[i] += acc;
        }
    }
}

impl CharScorer for LinearFilterBank {
    fn score_maps(&self, pooled: &[ImageF32]) -> Vec<ImageF32> {
        assert_eq!(
            pooled.len(),
            self.channels,
            "expected {} feature channels",
            self.channels
        );
        let Some(first) = pooled.first() else {
            return Vec::new();
        };
        (0..self.classes())
            .map(|class| {
                let mut response = ImageF32::from_vec(
                    first.w,
                    first.h,
                    vec![self.biases[class]; first.w * first.h],
                );
                if first.w == 0 || first.h == 0 {
                    return response;
                }
                for (channel, map) in pooled.iter().enumerate() {
                    correlate_add(
                        map,
                        self.filter(class, channel),
                        self.filter_w,
                        self.filter_h,
                        &mut response,
                    );
                }
                response
            })
            .collect()
    }

    fn cost(&self, responses: &[ImageF32]) -> (ImageF32, ImageF32) {
        softmax_background_cost(responses)
    }
}

/// Softmax over classes per cell; the last class is background.
///
/// `exist = -ln(1 - p_bg)` and `non_exist = -ln(p_bg)`, evaluated with
/// log-sum-exp so saturated responses stay finite.
pub fn softmax_background_cost(responses: &[ImageF32]) -> (ImageF32, ImageF32) {
    assert!(
        responses.len() >= 2,
        "softmax cost needs a digit class and a background class"
    );
    let (w, h) = (responses[0].w, responses[0].h);
    let bg = responses.len() - 1;
    let mut exist = ImageF32::new(w, h);
    let mut non_exist = ImageF32::new(w, h);
    for i in 0..w * h {
        let all = log_sum_exp(responses.iter().map(|r| r.data[i] as f64));
        let digits = log_sum_exp(responses[..bg].iter().map(|r| r.data[i] as f64));
        exist.data[i] = (all - digits) as f32;
        non_exist.data[i] = (all - responses[bg].data[i] as f64) as f32;
    }
    (exist, non_exist)
}

fn log_sum_exp(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// Per-column digit presence costs along a band.
///
/// The band is resized to `train_height` rows (keeping its aspect ratio),
/// scored densely, and the middle row of the up-sampled cost maps is
/// stretched to `size` columns. Columns the pooled grid cannot reach take the
/// largest cost of their map. Returns `None` when the resized band is too
/// small to produce a pooled cell.
pub fn char_existing_cost<S: CharScorer + ?Sized>(
    extractor: &FeatureExtractor,
    scorer: &S,
    band: &ImageF32,
    train_height: usize,
    size: usize,
) -> Option<(Vec<f64>, Vec<f64>)> {
    if band.w == 0 || band.h == 0 || train_height == 0 {
        return None;
    }
    let width = (band.w as f64 * train_height as f64 / band.h as f64).round() as usize;
    let resized = band.resize_bilinear(width, train_height);
    let pooled = extractor.extract(&resized);
    if pooled.first().map_or(true, |m| m.w == 0 || m.h == 0) {
        return None;
    }
    let responses = scorer.score_maps(&pooled);
    let (exist, non_exist) = scorer.cost(&responses);

    let to_profile = |map: &ImageF32| {
        let up = extractor.upsample_to_image(map);
        let mut row = row_f64(&up, up.h / 2);
        let fill = up.max_value().unwrap_or(0.0) as f64;
        row.resize(width, fill);
        resize_linear_1d(&row, size)
    };
    Some((to_profile(&exist), to_profile(&non_exist)))
}
