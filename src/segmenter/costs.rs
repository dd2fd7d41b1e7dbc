//! Per-column cost tables for placing a break of a given kind.
//!
//! All tables are computed from the column profile of the band's edge image.
//! Character sides follow the first derivative of the smoothed profile, blanks
//! its second derivative, and string ends a block derivative weighted by how
//! much edge mass lies outside the string.
use crate::image::{ImageF32, Rect};
use crate::profile::{
    block_derivative, column_projection, cumulative_sum, derivatives, gaussian_smooth,
    normalize_min_max, odd_filter_width, softplus,
};

/// Columns by which character-edge costs are shifted off the gradient peak.
pub const SLIDE: usize = 1;

const PROFILE_SIGMA: f64 = 1.0;
const PROFILE_RANGE: f64 = 100.0;
const INTEGRAL_EPS: f64 = 1e-5;
/// Cost of the columns exposed by [`SLIDE`].
const SLIDE_PAD_COST: f64 = 1.0;

/// Role of a break position inside a digit-grouping template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakKind {
    /// Boundary between two adjacent digits.
    Blank,
    /// Left edge of a digit following a group gap.
    CharLeft,
    /// Right edge of a digit preceding a group gap.
    CharRight,
    /// Left end of the whole string.
    StringLeft,
    /// Right end of the whole string.
    StringRight,
}

impl BreakKind {
    pub const ALL: [BreakKind; 5] = [
        BreakKind::Blank,
        BreakKind::CharLeft,
        BreakKind::CharRight,
        BreakKind::StringLeft,
        BreakKind::StringRight,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            BreakKind::Blank => 0,
            BreakKind::CharLeft => 1,
            BreakKind::CharRight => 2,
            BreakKind::StringLeft => 3,
            BreakKind::StringRight => 4,
        }
    }
}

/// One cost per column and break kind; every table has the band width.
#[derive(Clone, Debug, PartialEq)]
pub struct AppearanceCosts {
    tables: [Vec<f64>; 5],
}

impl AppearanceCosts {
    /// Build the tables from explicit per-kind vectors, mostly useful for
    /// driving the search with hand-made profiles.
    pub fn from_tables(
        blank: Vec<f64>,
        char_left: Vec<f64>,
        char_right: Vec<f64>,
        string_left: Vec<f64>,
        string_right: Vec<f64>,
    ) -> Self {
        let width = blank.len();
        for t in [&char_left, &char_right, &string_left, &string_right] {
            assert_eq!(t.len(), width, "appearance tables must share one width");
        }
        Self {
            tables: [blank, char_left, char_right, string_left, string_right],
        }
    }

    /// Compute the tables for the `band` rectangle of an edge image.
    pub fn from_band(edge: &ImageF32, band: Rect) -> Self {
        let roi = edge.crop(band);
        Self::from_edge_image(&roi)
    }

    /// Compute the tables for an edge image already cropped to the band.
    pub fn from_edge_image(edge: &ImageF32) -> Self {
        let profile = column_projection(edge);
        let normalized = normalize_min_max(&profile, 0.0, PROFILE_RANGE);
        let smoothed = gaussian_smooth(&normalized, odd_filter_width(edge.w), PROFILE_SIGMA);
        let integral = cumulative_sum(&normalized);
        let (d1, d2) = derivatives(&smoothed);
        let block = block_derivative(&normalized, edge.h);

        let blank = d2.iter().map(|&v| softplus(-v)).collect();
        let char_left = slide_left(&d1);
        let char_right = slide_right(&d1);

        let total = integral.last().copied().unwrap_or(0.0) + INTEGRAL_EPS;
        let string_left = slide_left(&block)
            .into_iter()
            .zip(&integral)
            .map(|(c, &acc)| c - ((total - acc) / total).ln())
            .collect();
        let string_right = slide_right(&block)
            .into_iter()
            .zip(&integral)
            .map(|(c, &acc)| c - ((acc + INTEGRAL_EPS) / total).ln())
            .collect();

        Self {
            tables: [blank, char_left, char_right, string_left, string_right],
        }
    }

    #[inline]
    pub fn get(&self, kind: BreakKind) -> &[f64] {
        &self.tables[kind.index()]
    }

    /// Band width in columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.tables[0].len()
    }
}

/// Rising edges: `softplus(-d[i + SLIDE])`, tail padded.
fn slide_left(deriv: &[f64]) -> Vec<f64> {
    let n = deriv.len();
    let mut out: Vec<f64> = deriv.iter().skip(SLIDE).map(|&v| softplus(-v)).collect();
    out.resize(n, SLIDE_PAD_COST);
    out
}

/// Falling edges: `softplus(d[i - SLIDE])`, head padded.
fn slide_right(deriv: &[f64]) -> Vec<f64> {
    let n = deriv.len();
    let mut out = vec![SLIDE_PAD_COST; SLIDE.min(n)];
    out.extend(deriv.iter().take(n.saturating_sub(SLIDE)).map(|&v| softplus(v)));
    out
}

/// Quadratic penalty for moving a break `i` columns away from its guess.
///
/// `window` is forced odd; the table has `window / 2 + 1` entries and
/// `cost[i] = (i / sigma)^2 / 2`.
pub fn regularization_costs(window: usize, sigma: f64) -> Vec<f64> {
    let window = window + (1 - window % 2);
    let half = window / 2 + window % 2;
    (0..half)
        .map(|i| {
            let d = i as f64 / sigma;
            d * d / 2.0
        })
        .collect()
}
