//! Serializable diagnostics returned next to the detection result.
//!
//! [`DetectionReport`] pairs the [`CardNumberResult`](crate::CardNumberResult)
//! with a [`PipelineTrace`]: input and processing sizes, stage timings, every
//! candidate band with its best template cost, and the break columns of the
//! winning fit.

pub mod pipeline;
pub mod timing;

pub use pipeline::{BandTrace, DetectionReport, InputDescriptor, PipelineTrace};
pub use timing::{StageTiming, TimingBreakdown};
