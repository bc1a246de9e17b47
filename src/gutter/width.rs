//! Margin width calculation

use crate::font::{FontHandle, FontSystem};

/// Breathing room added on top of the measured digits
pub const MARGIN_SCALE: f64 = 1.2;

/// Pixel width needed to show `digits` digits.
///
/// Measures a run of zeros with the same antialiasing policy used when
/// drawing, scales by [`MARGIN_SCALE`] and rounds up. Without a measurable
/// font the width is estimated as `font_size_pt * digits`.
pub fn calculate_margin_width<F: FontSystem + ?Sized>(
    fonts: &F,
    font: Option<&FontHandle>,
    font_size_pt: i32,
    digits: usize,
    antialias: bool,
) -> i32 {
    let measured = font.and_then(|font| fonts.measure_width(font, &"0".repeat(digits), antialias));

    match measured {
        Some(width) => ((width as f64 * MARGIN_SCALE).ceil() as i32).max(0),
        None => {
            let digits = i32::try_from(digits).unwrap_or(i32::MAX);
            font_size_pt.saturating_mul(digits).max(0)
        }
    }
}
