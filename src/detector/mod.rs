//! Card-number detector: locate the digit line, then split it into digits.
//!
//! Overview
//! - Converts the input to grayscale and resizes it to a fixed processing
//!   width so that every threshold is expressed in processing pixels.
//! - Builds an L1 Sobel edge image and projects it onto rows; stable bumps of
//!   the row profile become candidate bands ([`crate::locator`]).
//! - Fits the 4-4-4-4, 4-6-5 and 4-6-4 grouping templates inside each band
//!   with a branch-and-bound search ([`crate::segmenter`]).
//! - Maps the winning digit boxes back to input coordinates.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and CLI.
//! - `pipeline` – the main [`CardNumberDetector`] implementation.
//! - [`scaling`] – rescaling of processing-resolution boxes.

pub mod params;
mod pipeline;
pub mod scaling;

pub use params::DetectorParams;
pub use pipeline::{CardNumberDetector, CharacterCrop};
pub use scaling::rescale_rect;
