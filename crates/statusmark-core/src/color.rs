// ABOUTME: Hex color parsing, normalization and contrasting text color selection
// ABOUTME: Pure functions shared by the badge and status bar pickers

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK_TEXT: &str = "#000000";
pub const WHITE_TEXT: &str = "#ffffff";

/// Parse `#RRGGBB` or `RRGGBB` (case-insensitive, surrounding whitespace ignored).
///
/// Anything else, including the 3-digit shorthand, yields `None`.
pub fn parse_hex_color(input: &str) -> Option<Rgb> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();

    Some(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Trim and prepend `#` when missing. Does not validate.
pub fn normalize_hex_color(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    }
}

/// Weighted channel sum over [0, 1] channels.
///
/// This is the WCAG luminance weighting applied directly to the sRGB values,
/// without gamma linearization, so it is a readability heuristic rather than
/// the WCAG relative luminance.
pub fn approximate_luminance(color: Rgb) -> f32 {
    0.2126 * (color.r as f32 / 255.0)
        + 0.7152 * (color.g as f32 / 255.0)
        + 0.0722 * (color.b as f32 / 255.0)
}

/// Black text for light backgrounds, white text otherwise.
///
/// Unparsable input falls back to white.
pub fn contrasting_text_color(hex: &str) -> &'static str {
    match parse_hex_color(hex) {
        Some(color) if approximate_luminance(color) > 0.5 => BLACK_TEXT,
        _ => WHITE_TEXT,
    }
}
