//! Horizontal band hypotheses for the card-number line.
//!
//! The row profile of the edge image rises over lines of text. Stable bumps of
//! the smoothed profile (1D MSER) become band candidates; a Gaussian prior on
//! the band centre favours the area slightly below the vertical middle of the
//! card, where embossed numbers sit.
use crate::image::{ImageF32, Rect};
use crate::mser1d::Mser1d;
use crate::profile::{gaussian_smooth, odd_filter_width, row_projection};
use log::debug;
use serde::Serialize;

const PROFILE_SIGMA: f64 = 1.0;
const MSER_STEP: f64 = 1.0;
const MSER_DELTA: f64 = 2.0;
/// Prior mean of the band centre, as a fraction of the image height.
const PRIOR_MEAN_RATIO: f64 = 0.6;
/// Prior standard deviation of the band centre, as a fraction of the height.
const PRIOR_SIGMA_RATIO: f64 = 0.5;
/// Bands scoring below this fraction of the best score are dropped.
const RETAIN_RATIO: f64 = 0.9;

/// Full-width horizontal strip hypothesised to contain the digit string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    pub rect: Rect,
    /// Positional prior likelihood of the band centre.
    pub score: f64,
}

/// Normal density of the band centre under the positional prior.
pub fn band_prior(start: usize, len: usize, profile_len: usize) -> f64 {
    let mu = PRIOR_MEAN_RATIO * profile_len as f64;
    let sigma = PRIOR_SIGMA_RATIO * profile_len as f64;
    let center = len as f64 / 2.0 + start as f64;
    let t = (center - mu) / sigma;
    (-t * t / 2.0).exp() / ((2.0 * std::f64::consts::PI).sqrt() * sigma)
}

/// Candidate bands ordered from the most to the least likely.
///
/// `min_height` and `max_height` bound the band height in pixels. Returns an
/// empty list when the profile has no stable bump of admissible height.
pub fn detect_string_bands(edge: &ImageF32, min_height: usize, max_height: usize) -> Vec<Band> {
    if edge.w == 0 || edge.h == 0 {
        return Vec::new();
    }
    let profile = row_projection(edge);
    let smoothed = gaussian_smooth(&profile, odd_filter_width(edge.w), PROFILE_SIGMA);

    let mser = Mser1d::new(MSER_STEP, MSER_DELTA, min_height, max_height);
    let spans = mser.detect(&smoothed, None);
    if spans.is_empty() {
        debug!("StringLocator: no stable rows in {}x{} edge image", edge.w, edge.h);
        return Vec::new();
    }

    let mut bands: Vec<Band> = spans
        .iter()
        .map(|s| Band {
            rect: Rect::new(0, s.start as i32, edge.w as i32, s.len as i32),
            score: band_prior(s.start, s.len, smoothed.len()),
        })
        .collect();
    bands.sort_by(|a, b| b.score.total_cmp(&a.score));

    let best = bands[0].score;
    bands.retain(|b| b.score / best >= RETAIN_RATIO);
    debug!(
        "StringLocator: {} stable rows, {} bands kept (best y={} h={})",
        spans.len(),
        bands.len(),
        bands[0].rect.y,
        bands[0].rect.height
    );
    bands
}
