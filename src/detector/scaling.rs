//! Mapping of processing-resolution rectangles back to the input image.
use crate::image::Rect;

/// Scale `rect` by `ratio` (origin truncated, size rounded) and clip it to a
/// `w × h` image. Empty input rectangles and rectangles clipped away entirely
/// give `None`.
pub fn rescale_rect(rect: Rect, ratio: f64, w: usize, h: usize) -> Option<Rect> {
    if rect.is_empty() {
        return None;
    }
    let scaled = Rect::new(
        (ratio * rect.x as f64) as i32,
        (ratio * rect.y as f64) as i32,
        (ratio * rect.width as f64).round() as i32,
        (ratio * rect.height as f64).round() as i32,
    );
    let clipped = scaled.clip_to(w, h);
    (!clipped.is_empty()).then_some(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_origin_and_rounds_size() {
        let r = rescale_rect(Rect::new(3, 5, 7, 9), 1.5, 1000, 1000).expect("inside");
        assert_eq!(r, Rect::new(4, 7, 11, 14));
    }

    #[test]
    fn clips_to_image() {
        let r = rescale_rect(Rect::new(300, 10, 30, 10), 2.0, 640, 400).expect("overlaps");
        assert_eq!(r, Rect::new(600, 20, 40, 20));
        assert!(rescale_rect(Rect::new(330, 10, 30, 10), 2.0, 640, 400).is_none());
        assert!(rescale_rect(Rect::new(0, 0, 0, 10), 2.0, 640, 400).is_none());
    }
}
