//! Image derivatives used by the feature extractor and the card-number search.
//!
//! - [`sobel_gradients`] returns `gx`, `gy` and the Euclidean magnitude.
//! - [`edge_image`] returns the L1 edge strength `|gx| + |gy|`, the signal the
//!   string locator and the character segmenter project onto rows/columns.
//!
//! Borders are handled with reflect-101 indexing (`x[-1] = x[1]`), so a
//! one-pixel frame carries filter artifacts; the feature extractor trims it.

pub mod grad;

pub use grad::{edge_image, sobel_gradients, Grad};
