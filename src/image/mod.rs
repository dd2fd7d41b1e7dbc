//! Image buffers shared by the feature extractor, locator and segmenter.
//!
//! - [`ImageU8`] borrows 8-bit pixels (gray or interleaved RGB) from the caller.
//! - [`ImageF32`] owns single-channel float data in the native intensity scale
//!   (no normalisation to `[0, 1]`), which keeps thresholds in the 1D MSER stage
//!   meaningful in grey-level units.
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::ImageU8;

/// Integer rectangle in pixel coordinates, half-open on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Clip the rectangle to `[0, w) × [0, h)`. May return an empty rectangle.
    pub fn clip_to(&self, w: usize, h: usize) -> Rect {
        let (w, h) = (w as i32, h as i32);
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(w);
        let y1 = self.bottom().min(h);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}
