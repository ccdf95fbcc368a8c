//! A minimal stroke font for atom labels.
//!
//! Glyphs are polylines on a grid four units wide with the cap line at
//! `y = 0` and the baseline at `y = 6` (y grows downward, matching the
//! pixmap). Lowercase letters sit between `y = 2` and the baseline; `g`
//! descends to `y = 8`. Only the characters needed for element symbols,
//! hydrogen counts and charges are defined.

pub type Strokes = &'static [&'static [(f32, f32)]];

pub const CAP_HEIGHT: f32 = 6.0;
const LETTER_SPACING: f32 = 1.0;
/// Box drawn for characters without a glyph.
const FALLBACK: Strokes = &[&[(0.0, 0.0), (4.0, 0.0), (4.0, 6.0), (0.0, 6.0), (0.0, 0.0)]];

const UPPER_A: Strokes = &[&[(0.0, 6.0), (2.0, 0.0), (4.0, 6.0)], &[(0.7, 4.0), (3.3, 4.0)]];
const UPPER_B: Strokes = &[
    &[(0.0, 0.0), (0.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (0.0, 3.0)],
    &[(0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0)],
];
const UPPER_C: Strokes = &[
    &[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0)],
];
const UPPER_F: Strokes = &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 6.0)], &[(0.0, 3.0), (3.0, 3.0)]];
const UPPER_G: Strokes = &[
    &[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 3.0), (2.0, 3.0)],
];
const UPPER_H: Strokes = &[
    &[(0.0, 0.0), (0.0, 6.0)],
    &[(4.0, 0.0), (4.0, 6.0)],
    &[(0.0, 3.0), (4.0, 3.0)],
];
const UPPER_I: Strokes = &[
    &[(1.0, 0.0), (3.0, 0.0)],
    &[(2.0, 0.0), (2.0, 6.0)],
    &[(1.0, 6.0), (3.0, 6.0)],
];
const UPPER_K: Strokes = &[
    &[(0.0, 0.0), (0.0, 6.0)],
    &[(4.0, 0.0), (0.0, 4.0)],
    &[(1.5, 2.8), (4.0, 6.0)],
];
const UPPER_L: Strokes = &[&[(0.0, 0.0), (0.0, 6.0), (4.0, 6.0)]];
const UPPER_M: Strokes = &[&[(0.0, 6.0), (0.0, 0.0), (2.0, 3.0), (4.0, 0.0), (4.0, 6.0)]];
const UPPER_N: Strokes = &[&[(0.0, 6.0), (0.0, 0.0), (4.0, 6.0), (4.0, 0.0)]];
const UPPER_O: Strokes = &[
    &[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0), (0.0, 1.0), (1.0, 0.0)],
];
const UPPER_P: Strokes = &[
    &[(0.0, 6.0), (0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (0.0, 3.0)],
];
const UPPER_S: Strokes = &[
    &[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 2.0), (1.0, 3.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)],
];
const UPPER_T: Strokes = &[&[(0.0, 0.0), (4.0, 0.0)], &[(2.0, 0.0), (2.0, 6.0)]];
const UPPER_X: Strokes = &[&[(0.0, 0.0), (4.0, 6.0)], &[(4.0, 0.0), (0.0, 6.0)]];
const UPPER_Z: Strokes = &[&[(0.0, 0.0), (4.0, 0.0), (0.0, 6.0), (4.0, 6.0)]];
const LOWER_A: Strokes = &[
    &[(0.5, 2.0), (3.0, 2.0), (3.5, 2.5), (3.5, 6.0)],
    &[(3.5, 3.8), (0.8, 3.8), (0.0, 4.5), (0.0, 5.3), (0.7, 6.0), (3.5, 6.0)],
];
const LOWER_B: Strokes = &[
    &[(0.0, 0.0), (0.0, 6.0)],
    &[(0.0, 3.0), (1.0, 2.0), (3.0, 2.0), (3.5, 2.5), (3.5, 5.5), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)],
];
const LOWER_E: Strokes = &[
    &[(0.0, 4.0), (3.5, 4.0), (3.5, 2.8), (2.7, 2.0), (0.8, 2.0), (0.0, 2.8), (0.0, 5.2), (0.8, 6.0), (3.5, 6.0)],
];
const LOWER_G: Strokes = &[
    &[(3.5, 2.0), (3.5, 7.3), (2.7, 8.0), (0.5, 8.0)],
    &[(3.5, 3.0), (2.5, 2.0), (1.0, 2.0), (0.0, 3.0), (0.0, 5.0), (1.0, 6.0), (2.5, 6.0), (3.5, 5.0)],
];
const LOWER_I: Strokes = &[&[(1.75, 2.0), (1.75, 6.0)], &[(1.75, 0.6), (1.75, 0.9)]];
const LOWER_L: Strokes = &[&[(1.75, 0.0), (1.75, 6.0)]];
const LOWER_N: Strokes = &[
    &[(0.0, 2.0), (0.0, 6.0)],
    &[(0.0, 3.0), (1.0, 2.0), (2.7, 2.0), (3.5, 2.8), (3.5, 6.0)],
];
const LOWER_O: Strokes = &[
    &[(0.8, 2.0), (2.7, 2.0), (3.5, 2.8), (3.5, 5.2), (2.7, 6.0), (0.8, 6.0), (0.0, 5.2), (0.0, 2.8), (0.8, 2.0)],
];
const LOWER_R: Strokes = &[&[(0.0, 2.0), (0.0, 6.0)], &[(0.0, 3.2), (1.2, 2.0), (3.0, 2.0)]];
const LOWER_S: Strokes = &[
    &[(3.5, 2.5), (3.0, 2.0), (0.7, 2.0), (0.0, 2.6), (0.0, 3.4), (0.7, 4.0), (2.8, 4.0), (3.5, 4.6), (3.5, 5.4), (2.8, 6.0), (0.5, 6.0), (0.0, 5.5)],
];
const LOWER_T: Strokes = &[
    &[(1.5, 0.5), (1.5, 5.3), (2.2, 6.0), (3.2, 6.0)],
    &[(0.3, 2.0), (3.0, 2.0)],
];
const LOWER_U: Strokes = &[
    &[(0.0, 2.0), (0.0, 5.2), (0.8, 6.0), (2.7, 6.0), (3.5, 5.2)],
    &[(3.5, 2.0), (3.5, 6.0)],
];
const DIGIT_0: Strokes = &[
    &[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0), (0.0, 1.0), (1.0, 0.0)],
];
const DIGIT_1: Strokes = &[&[(1.0, 1.0), (2.0, 0.0), (2.0, 6.0)], &[(1.0, 6.0), (3.0, 6.0)]];
const DIGIT_2: Strokes = &[
    &[(0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (0.0, 6.0), (4.0, 6.0)],
];
const DIGIT_3: Strokes = &[
    &[(0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (1.5, 3.0)],
    &[(3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)],
];
const DIGIT_4: Strokes = &[&[(3.0, 6.0), (3.0, 0.0), (0.0, 4.0), (4.0, 4.0)]];
const DIGIT_5: Strokes = &[
    &[(4.0, 0.0), (0.0, 0.0), (0.0, 3.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (0.0, 6.0)],
];
const DIGIT_6: Strokes = &[
    &[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (0.0, 3.0)],
];
const DIGIT_7: Strokes = &[&[(0.0, 0.0), (4.0, 0.0), (1.5, 6.0)]];
const DIGIT_8: Strokes = &[
    &[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (1.0, 3.0), (0.0, 4.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0)],
    &[(1.0, 3.0), (0.0, 2.0), (0.0, 1.0), (1.0, 0.0)],
];
const DIGIT_9: Strokes = &[
    &[(4.0, 3.0), (1.0, 3.0), (0.0, 2.0), (0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (0.0, 6.0)],
];
const PLUS: Strokes = &[&[(2.0, 1.5), (2.0, 4.5)], &[(0.5, 3.0), (3.5, 3.0)]];
const MINUS: Strokes = &[&[(0.5, 3.0), (3.5, 3.0)]];

/// Returns the strokes of a character, or `None` when it has no glyph.
pub fn glyph(ch: char) -> Option<Strokes> {
    let strokes = match ch {
        'A' => UPPER_A,
        'B' => UPPER_B,
        'C' => UPPER_C,
        'F' => UPPER_F,
        'G' => UPPER_G,
        'H' => UPPER_H,
        'I' => UPPER_I,
        'K' => UPPER_K,
        'L' => UPPER_L,
        'M' => UPPER_M,
        'N' => UPPER_N,
        'O' => UPPER_O,
        'P' => UPPER_P,
        'S' => UPPER_S,
        'T' => UPPER_T,
        'X' => UPPER_X,
        'Z' => UPPER_Z,
        'a' => LOWER_A,
        'b' => LOWER_B,
        'e' => LOWER_E,
        'g' => LOWER_G,
        'i' => LOWER_I,
        'l' => LOWER_L,
        'n' => LOWER_N,
        'o' => LOWER_O,
        'r' => LOWER_R,
        's' => LOWER_S,
        't' => LOWER_T,
        'u' => LOWER_U,
        '0' => DIGIT_0,
        '1' => DIGIT_1,
        '2' => DIGIT_2,
        '3' => DIGIT_3,
        '4' => DIGIT_4,
        '5' => DIGIT_5,
        '6' => DIGIT_6,
        '7' => DIGIT_7,
        '8' => DIGIT_8,
        '9' => DIGIT_9,
        '+' => PLUS,
        '-' => MINUS,
        _ => return None,
    };
    Some(strokes)
}

/// Strokes to draw for a character, falling back to an empty box.
pub fn strokes_or_fallback(ch: char) -> Strokes {
    glyph(ch).unwrap_or(FALLBACK)
}

/// Horizontal advance of a character in grid units.
pub fn advance(ch: char) -> f32 {
    let strokes = strokes_or_fallback(ch);
    let right = strokes
        .iter()
        .flat_map(|s| s.iter())
        .map(|&(x, _)| x)
        .fold(0.0_f32, f32::max);
    right + LETTER_SPACING
}

/// Width of a string in grid units, without trailing spacing.
pub fn text_width(text: &str) -> f32 {
    let total: f32 = text.chars().map(advance).sum();
    if text.is_empty() {
        0.0
    } else {
        total - LETTER_SPACING
    }
}
