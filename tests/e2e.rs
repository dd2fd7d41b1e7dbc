mod common;

use card_number_detector::image::ImageU8;
use card_number_detector::{CardNumberDetector, CreditPattern, DetectorParams};
use common::synthetic_image::{
    blank_card_u8, card_number_u8, glyph_center_x, gray_to_rgb, CARD_H, CARD_W, GLYPH_H,
    GLYPH_TOP,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn synthetic_card_yields_sixteen_digit_boxes() {
    init_logger();
    let buffer = card_number_u8(1);
    let image = ImageU8::gray(CARD_W, CARD_H, &buffer);

    let detector = CardNumberDetector::new(DetectorParams::default());
    let report = detector.detect(image);
    let result = &report.result;

    assert!(result.found, "expected a digit string, trace: {:?}", report.trace.bands);
    assert_eq!(result.pattern, Some(CreditPattern::Type4444));
    assert_eq!(result.digit_count(), 16);

    for (i, b) in result.boxes.iter().enumerate() {
        let center = b.x as f64 + b.width as f64 / 2.0;
        assert!(
            (center - glyph_center_x(i)).abs() <= 6.0,
            "box {i} centred at {center}, glyph at {}",
            glyph_center_x(i)
        );
        assert!((b.y - GLYPH_TOP as i32).abs() <= 4, "box {i} top {}", b.y);
        assert!(
            (b.bottom() - (GLYPH_TOP + GLYPH_H) as i32).abs() <= 4,
            "box {i} bottom {}",
            b.bottom()
        );
    }
    for pair in result.boxes.windows(2) {
        assert!(pair[0].x < pair[1].x, "boxes must run left to right");
    }

    assert_eq!(report.trace.input.processing_width, 320);
    assert!(report.trace.chosen_band.is_some());
    assert_eq!(report.trace.breaks.len(), 20);
    assert!(report.trace.timings.stage_ms("segment").is_some());
}

#[test]
fn blank_card_reports_nothing() {
    init_logger();
    let buffer = blank_card_u8(1);
    let report = CardNumberDetector::new(DetectorParams::default())
        .detect(ImageU8::gray(CARD_W, CARD_H, &buffer));
    assert!(!report.result.found);
    assert!(report.result.pattern.is_none());
    assert!(report.result.boxes.is_empty());
    assert!(report.trace.bands.is_empty());
}

#[test]
fn rgb_input_matches_gray_input() {
    init_logger();
    let gray = card_number_u8(1);
    let rgb = gray_to_rgb(&gray);
    let detector = CardNumberDetector::new(DetectorParams::default());
    let from_gray = detector.detect(ImageU8::gray(CARD_W, CARD_H, &gray));
    let from_rgb = detector.detect(ImageU8::rgb(CARD_W, CARD_H, &rgb));
    assert_eq!(from_gray.result.pattern, from_rgb.result.pattern);
    assert_eq!(from_gray.result.boxes.len(), from_rgb.result.boxes.len());
    // Luma weights may round the grey levels by a fraction of a unit.
    for (g, c) in from_gray.result.boxes.iter().zip(&from_rgb.result.boxes) {
        assert!((g.x - c.x).abs() <= 1 && (g.right() - c.right()).abs() <= 1);
        assert_eq!((g.y, g.height), (c.y, c.height));
    }
}

#[test]
fn boxes_are_reported_in_input_coordinates() {
    init_logger();
    let buffer = card_number_u8(2);
    let (w, h) = (CARD_W * 2, CARD_H * 2);
    let report =
        CardNumberDetector::new(DetectorParams::default()).detect(ImageU8::gray(w, h, &buffer));
    assert!(report.result.found);
    assert_eq!(report.result.digit_count(), 16);
    assert_eq!(report.trace.input.processing_height, CARD_H);
    let first = report.result.boxes[0];
    let last = report.result.boxes[15];
    let first_center = first.x as f64 + first.width as f64 / 2.0;
    let last_center = last.x as f64 + last.width as f64 / 2.0;
    assert!((first_center - 2.0 * glyph_center_x(0)).abs() <= 14.0);
    assert!((last_center - 2.0 * glyph_center_x(15)).abs() <= 14.0);
    for b in &report.result.boxes {
        assert!(b.right() <= w as i32 && b.bottom() <= h as i32);
    }
}

#[test]
fn parallel_and_sequential_band_search_agree() {
    init_logger();
    let buffer = card_number_u8(1);
    let run = |parallel_bands: bool| {
        let params = DetectorParams {
            parallel_bands,
            ..Default::default()
        };
        CardNumberDetector::new(params).detect(ImageU8::gray(CARD_W, CARD_H, &buffer))
    };
    let a = run(true);
    let b = run(false);
    assert_eq!(a.result.boxes, b.result.boxes);
    assert_eq!(a.result.cost, b.result.cost);
    assert_eq!(a.trace.bands, b.trace.bands);
}

#[test]
fn digit_crops_carry_feature_vectors() {
    init_logger();
    let buffer = card_number_u8(1);
    let detector = CardNumberDetector::new(DetectorParams::default());
    let report = detector.detect(ImageU8::gray(CARD_W, CARD_H, &buffer));
    let crops =
        detector.crop_characters(ImageU8::gray(CARD_W, CARD_H, &buffer), &report.result.boxes);
    assert_eq!(crops.len(), report.result.boxes.len());
    let dim = detector.extractor().feature_dim(16, 24);
    assert_eq!(dim, 240);
    for crop in &crops {
        assert_eq!((crop.patch.w, crop.patch.h), (16, 24));
        assert_eq!(crop.features.len(), dim);
        assert!(crop.features.iter().any(|&v| v > 0.0));
    }
}
