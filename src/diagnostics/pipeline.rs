use super::TimingBreakdown;
use crate::image::Rect;
use crate::segmenter::CreditPattern;
use crate::types::CardNumberResult;
use serde::Serialize;

/// Result produced by [`CardNumberDetector::detect`](crate::CardNumberDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub result: CardNumberResult,
    pub trace: PipelineTrace,
}

/// What the detector saw and did on the way to the result.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    /// Candidate bands in processing coordinates, most likely first.
    pub bands: Vec<BandTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_band: Option<usize>,
    /// Break columns of the winning fit, relative to the band.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breaks: Vec<usize>,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub processing_width: usize,
    pub processing_height: usize,
}

impl InputDescriptor {
    /// Factor mapping processing coordinates back to the input image.
    pub fn scale(&self) -> f64 {
        if self.processing_width == 0 {
            1.0
        } else {
            self.width as f64 / self.processing_width as f64
        }
    }
}

/// One located band and the best template fit found inside it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandTrace {
    pub rect: Rect,
    /// Positional prior score from the locator.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<CreditPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}
