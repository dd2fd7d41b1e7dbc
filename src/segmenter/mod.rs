//! Character segmentation inside a located band.
//!
//! The segmenter turns a band of the edge image into per-digit boxes by
//! fitting each digit-grouping template ([`CreditPattern`]) with a
//! branch-and-bound search over break positions:
//! - [`costs`] builds per-column appearance costs for every [`BreakKind`] and
//!   the positional regularization table.
//! - [`patterns`] holds the static template table.
//! - [`search`] runs the bounded search for one template.
//!
//! Templates within a band share one cutoff that tightens as better fits are
//! found. Bands are searched independently (optionally on the rayon pool) and
//! reduced by minimum cost; ties go to the earlier band, then to the earlier
//! template.
pub mod costs;
pub mod patterns;
pub mod search;

pub use costs::{regularization_costs, AppearanceCosts, BreakKind, SLIDE};
pub use patterns::{CreditPattern, PatternLayout, PATTERNS};
pub use search::{branch_and_bound, min_cost_position, BreakCosts, Candidate, TemplateCosts};

use crate::diagnostics::BandTrace;
use crate::image::{ImageF32, Rect};
use crate::locator::Band;
use log::debug;
use serde::{Deserialize, Serialize};

/// Segmenter knobs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Band height divided by this gives the nominal character pitch.
    pub char_aspect_ratio: f64,
    /// Relative standard deviation of character pitch and string length.
    pub char_width_div: f64,
    /// Smallest band height as a fraction of the image width.
    pub min_char_height_ratio: f64,
    /// Largest band height as a fraction of the image width.
    pub max_char_height_ratio: f64,
    /// Cost a segmentation must beat to be reported at all.
    pub initial_cost: f64,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            char_aspect_ratio: 1.5,
            char_width_div: 0.2,
            min_char_height_ratio: 0.05,
            max_char_height_ratio: 0.1,
            initial_cost: 10_000.0,
        }
    }
}

impl SegmenterParams {
    /// Band height bounds in pixels for an image `width` pixels wide.
    pub fn height_bounds(&self, width: usize) -> (usize, usize) {
        let w = width as f64;
        (
            (self.min_char_height_ratio * w).round() as usize,
            (self.max_char_height_ratio * w).round() as usize,
        )
    }

    /// Nominal character pitch for a band of the given height.
    pub fn char_size(&self, band_height: i32) -> f64 {
        band_height as f64 / self.char_aspect_ratio
    }
}

/// Best template fit inside one band.
#[derive(Clone, Debug, PartialEq)]
pub struct BandMatch {
    pub pattern: CreditPattern,
    /// Break columns relative to the band's left edge.
    pub breaks: Vec<usize>,
    pub cost: f64,
}

/// Winning segmentation across all candidate bands.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    /// Index into the band list passed to [`CharacterSegmenter::segment`].
    pub band_index: usize,
    pub band: Rect,
    pub pattern: CreditPattern,
    pub breaks: Vec<usize>,
    pub cost: f64,
    /// One box per digit, left to right, in edge-image coordinates.
    pub boxes: Vec<Rect>,
}

/// Segmentation result together with the per-band trace.
#[derive(Clone, Debug, Default)]
pub struct SegmentationOutcome {
    pub best: Option<Segmentation>,
    pub bands: Vec<BandTrace>,
}

/// Splits located bands into per-digit boxes.
#[derive(Clone, Debug)]
pub struct CharacterSegmenter {
    params: SegmenterParams,
    parallel: bool,
}

impl CharacterSegmenter {
    pub fn new(params: SegmenterParams) -> Self {
        Self {
            params,
            parallel: true,
        }
    }

    /// Search bands on the rayon pool when the `parallel` feature is enabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &SegmenterParams {
        &self.params
    }

    /// Fit every template to `band` and keep the cheapest fit below `cutoff`.
    pub fn segment_band(&self, edge: &ImageF32, band: Rect, cutoff: f64) -> Option<BandMatch> {
        let band = band.clip_to(edge.w, edge.h);
        if band.is_empty() {
            return None;
        }
        let appearance = AppearanceCosts::from_band(edge, band);
        self.fit_templates(&appearance, band.height, cutoff)
    }

    /// Fit every template to precomputed appearance costs of a band
    /// `band_height` pixels tall.
    pub fn fit_templates(
        &self,
        appearance: &AppearanceCosts,
        band_height: i32,
        cutoff: f64,
    ) -> Option<BandMatch> {
        let char_size = self.params.char_size(band_height);
        let window = (char_size / 2.0) as usize;
        let regularization = regularization_costs(window, self.params.char_width_div * char_size);

        let mut best = cutoff;
        let mut found = None;
        for layout in &PATTERNS {
            let expected_span = char_size * (layout.breaks.len() - 1) as f64;
            let template = TemplateCosts {
                appearance,
                regularization: &regularization,
                kinds: layout.breaks,
                expected_span,
                span_sigma: self.params.char_width_div * expected_span,
            };
            if let Some(candidate) = branch_and_bound(&template, best) {
                best = candidate.cost;
                found = Some(BandMatch {
                    pattern: layout.pattern,
                    breaks: candidate.breaks,
                    cost: candidate.cost,
                });
            }
        }
        found
    }

    /// Segment the most likely band of `bands`.
    ///
    /// Returns no segmentation when no band admits a fit cheaper than
    /// [`SegmenterParams::initial_cost`].
    pub fn segment(&self, edge: &ImageF32, bands: &[Band]) -> SegmentationOutcome {
        let matches = self.search_bands(edge, bands);

        let mut best: Option<(usize, &BandMatch)> = None;
        for (i, m) in matches.iter().enumerate() {
            if let Some(m) = m {
                if best.map_or(true, |(_, b)| m.cost < b.cost) {
                    best = Some((i, m));
                }
            }
        }

        let traces = bands
            .iter()
            .zip(&matches)
            .map(|(band, m)| BandTrace {
                rect: band.rect,
                score: band.score,
                pattern: m.as_ref().map(|m| m.pattern),
                cost: m.as_ref().map(|m| m.cost),
            })
            .collect();

        let best = best.map(|(band_index, m)| {
            let band = bands[band_index].rect;
            debug!(
                "CharacterSegmenter: band {} (y={} h={}) {:?} cost={:.3}",
                band_index, band.y, band.height, m.pattern, m.cost
            );
            Segmentation {
                band_index,
                band,
                pattern: m.pattern,
                breaks: m.breaks.clone(),
                cost: m.cost,
                boxes: breaks_to_boxes(&m.breaks, band, m.pattern),
            }
        });
        if best.is_none() {
            debug!(
                "CharacterSegmenter: no template below cost {} in {} bands",
                self.params.initial_cost,
                bands.len()
            );
        }
        SegmentationOutcome {
            best,
            bands: traces,
        }
    }

    fn search_bands(&self, edge: &ImageF32, bands: &[Band]) -> Vec<Option<BandMatch>> {
        let cutoff = self.params.initial_cost;
        let run = |band: &Band| self.segment_band(edge, band.rect, cutoff);
        #[cfg(feature = "parallel")]
        {
            if self.parallel && bands.len() > 1 {
                use rayon::prelude::*;
                return bands.par_iter().map(run).collect();
            }
        }
        bands.iter().map(run).collect()
    }
}

/// Digit boxes for break columns `breaks` of a fit inside `band`.
pub fn breaks_to_boxes(breaks: &[usize], band: Rect, pattern: CreditPattern) -> Vec<Rect> {
    if breaks.is_empty() {
        return Vec::new();
    }
    let layout = pattern.layout();
    assert_eq!(
        breaks.len(),
        layout.breaks.len(),
        "break count does not match {:?}",
        pattern
    );
    layout
        .groups
        .iter()
        .flat_map(|&(begin, end)| begin..end)
        .map(|i| {
            Rect::new(
                band.x + breaks[i] as i32,
                band.y,
                breaks[i + 1] as i32 - breaks[i] as i32,
                band.height,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tables that are free exactly on the breaks of `pattern` placed every
    /// `pitch` columns from `left`, and cost `5` everywhere else.
    fn planted_costs(
        width: usize,
        left: usize,
        pitch: usize,
        pattern: CreditPattern,
    ) -> AppearanceCosts {
        let mut tables: Vec<Vec<f64>> = vec![vec![5.0; width]; 5];
        for (i, kind) in pattern.layout().breaks.iter().enumerate() {
            let slot = BreakKind::ALL.iter().position(|k| k == kind).unwrap();
            tables[slot][left + i * pitch] = 0.0;
        }
        let [blank, left_t, right_t, string_left, string_right]: [Vec<f64>; 5] =
            tables.try_into().unwrap();
        AppearanceCosts::from_tables(blank, left_t, right_t, string_left, string_right)
    }

    fn search(appearance: &AppearanceCosts, band_height: i32, cutoff: f64) -> Option<BandMatch> {
        CharacterSegmenter::new(SegmenterParams::default())
            .fit_templates(appearance, band_height, cutoff)
    }

    #[test]
    fn recovers_planted_4444_breaks() {
        // Band height 15 gives a 10 px pitch and a 190 px expected string.
        let costs = planted_costs(300, 50, 10, CreditPattern::Type4444);
        let m = search(&costs, 15, 10_000.0).expect("fit");
        assert_eq!(m.pattern, CreditPattern::Type4444);
        let expected: Vec<usize> = (0..20).map(|i| 50 + 10 * i).collect();
        assert_eq!(m.breaks, expected);
        assert!(m.cost.abs() < 1e-9, "cost {}", m.cost);
    }

    #[test]
    fn recovers_planted_465_breaks() {
        let costs = planted_costs(300, 40, 10, CreditPattern::Type465);
        let m = search(&costs, 15, 10_000.0).expect("fit");
        assert_eq!(m.pattern, CreditPattern::Type465);
        assert_eq!(m.breaks[0], 40);
        assert_eq!(m.breaks[17], 210);
        assert!(m.cost.abs() < 1e-9);
    }

    #[test]
    fn recovers_planted_464_breaks() {
        let costs = planted_costs(300, 60, 10, CreditPattern::Type464);
        let m = search(&costs, 15, 10_000.0).expect("fit");
        assert_eq!(m.pattern, CreditPattern::Type464);
        let expected: Vec<usize> = (0..17).map(|i| 60 + 10 * i).collect();
        assert_eq!(m.breaks, expected);
        assert!(m.cost.abs() < 1e-9, "cost {}", m.cost);
        let band = Rect::new(0, 0, 300, 15);
        let boxes = breaks_to_boxes(&m.breaks, band, m.pattern);
        assert_eq!(boxes.len(), 14);
        assert_eq!(boxes[4].x, 110);
        assert_eq!(boxes[13].right(), 220);
    }

    #[test]
    fn narrow_strings_leave_cutoff_untouched() {
        // Every planted span is 19 columns, far below a third of 300.
        let costs = planted_costs(300, 50, 1, CreditPattern::Type4444);
        let cheap_ends = AppearanceCosts::from_tables(
            vec![0.0; 300],
            vec![0.0; 300],
            vec![0.0; 300],
            costs.get(BreakKind::StringLeft).to_vec(),
            costs.get(BreakKind::StringRight).to_vec(),
        );
        // Any admissible pair pays at least 5 for one end, so a cutoff of 5
        // cannot be beaten.
        assert!(search(&cheap_ends, 15, 5.0).is_none());
    }

    #[test]
    fn boxes_follow_group_layout() {
        let breaks: Vec<usize> = (0..20).map(|i| 10 * i).collect();
        let band = Rect::new(0, 30, 320, 15);
        let boxes = breaks_to_boxes(&breaks, band, CreditPattern::Type4444);
        assert_eq!(boxes.len(), 16);
        assert_eq!(boxes[0], Rect::new(0, 30, 10, 15));
        assert_eq!(boxes[3], Rect::new(30, 30, 10, 15));
        // The second group starts after the gap between breaks 4 and 5.
        assert_eq!(boxes[4], Rect::new(50, 30, 10, 15));
        assert_eq!(boxes[15].right(), 190);
        assert!(breaks_to_boxes(&[], band, CreditPattern::Type464).is_empty());
    }

    #[test]
    fn empty_band_has_no_match() {
        let seg = CharacterSegmenter::new(SegmenterParams::default());
        let edge = ImageF32::new(50, 20);
        assert!(seg.segment_band(&edge, Rect::new(0, 25, 50, 5), 10_000.0).is_none());
    }

    #[test]
    fn height_bounds_scale_with_width() {
        assert_eq!(SegmenterParams::default().height_bounds(320), (16, 32));
    }
}
