use crate::image::Rect;
use crate::segmenter::CreditPattern;
use serde::Serialize;

/// Outcome of one detector run, in input-image coordinates.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardNumberResult {
    pub found: bool,
    /// Present exactly when `boxes` is non-empty.
    pub pattern: Option<CreditPattern>,
    /// One box per digit, left to right.
    pub boxes: Vec<Rect>,
    /// Band the digits were found in.
    pub band: Option<Rect>,
    pub cost: Option<f64>,
    pub latency_ms: f64,
}

impl CardNumberResult {
    pub fn digit_count(&self) -> usize {
        self.boxes.len()
    }
}
