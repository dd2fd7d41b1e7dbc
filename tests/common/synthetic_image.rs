#![allow(dead_code)]

/// Size of the synthetic card at scale 1.
pub const CARD_W: usize = 320;
pub const CARD_H: usize = 200;

/// Left edge of the first digit slot and the slot pitch. A 4-4-4-4 number
/// occupies 19 slots: 16 digits plus one empty slot between groups.
pub const STRING_LEFT: usize = 36;
pub const PITCH: usize = 13;
/// Digit glyphs are solid blocks inset in their slot.
pub const GLYPH_INSET: usize = 3;
pub const GLYPH_W: usize = 8;
pub const GLYPH_TOP: usize = 112;
pub const GLYPH_H: usize = 18;

const BACKGROUND: u8 = 40;
const INK: u8 = 220;

/// Slot index of each of the 16 digits.
pub fn digit_slots() -> Vec<usize> {
    (0..4).flat_map(|g| (0..4).map(move |d| g * 5 + d)).collect()
}

/// Horizontal centre of digit `i` at scale 1.
pub fn glyph_center_x(i: usize) -> f64 {
    let slot = digit_slots()[i];
    (STRING_LEFT + slot * PITCH + GLYPH_INSET) as f64 + GLYPH_W as f64 / 2.0 - 0.5
}

/// Gray card with a 4-4-4-4 block-digit number, upscaled by `scale`.
pub fn card_number_u8(scale: usize) -> Vec<u8> {
    assert!(scale > 0, "scale must be positive");
    let (w, h) = (CARD_W * scale, CARD_H * scale);
    let mut img = vec![BACKGROUND; w * h];
    for slot in digit_slots() {
        let x0 = STRING_LEFT + slot * PITCH + GLYPH_INSET;
        for y in GLYPH_TOP * scale..(GLYPH_TOP + GLYPH_H) * scale {
            for x in x0 * scale..(x0 + GLYPH_W) * scale {
                img[y * w + x] = INK;
            }
        }
    }
    img
}

/// Uniform card without any digits.
pub fn blank_card_u8(scale: usize) -> Vec<u8> {
    vec![BACKGROUND; CARD_W * scale * CARD_H * scale]
}

/// Interleaved RGB copy of a gray buffer.
pub fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&v| [v, v, v]).collect()
}
