//! Color parsing utilities
//!
//! Hex color parsing shared by config, palette and status line.

use std::fmt;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(px: &[u8]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    /// "#RRGGBB" (alpha omitted, as shown on the status line)
    pub fn rgb_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived luminance in 0..=255, scaled by alpha
    pub fn luminance(self) -> u8 {
        let l = (299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32) / 1000;
        (l * self.a as u32 / 255) as u8
    }
}

impl fmt::Display for Rgba {
    /// "rrggbbaa", the form written back to config files
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Parse hex color.
///
/// Accepts "RRGGBBAA", "RRGGBB" (opaque) and short "RGB" (F -> FF),
/// with or without a leading '#'. Returns None on invalid input.
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let hex = hex.trim().trim_start_matches('#');
    // from_str_radix alone would accept a leading sign
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        8 => Some(Rgba::new(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        6 => Some(Rgba::opaque(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        3 => Some(Rgba::opaque(
            byte(&hex[0..1])? * 17,
            byte(&hex[1..2])? * 17,
            byte(&hex[2..3])? * 17,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff0000"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(parse_hex_color("#00ff00"), Some(Rgba::opaque(0, 255, 0)));
        assert_eq!(parse_hex_color("f00"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(
            parse_hex_color("0c0c0c80"),
            Some(Rgba::new(12, 12, 12, 128))
        );
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("ff00"), None);
        assert_eq!(parse_hex_color("ééé"), None);
    }

    #[test]
    fn test_parse_hex_color_rejects_signs() {
        assert_eq!(parse_hex_color("+f+f+f"), None);
        assert_eq!(parse_hex_color("+fff"), None);
        assert_eq!(parse_hex_color("#-1-1-1"), None);
        assert_eq!(parse_hex_color("+fffffff"), None);
    }

    #[test]
    fn test_display_round_trips() {
        let c = Rgba::new(1, 2, 254, 255);
        assert_eq!(parse_hex_color(&c.to_string()), Some(c));
        assert_eq!(c.rgb_hex(), "#0102FE");
    }

    #[test]
    fn test_luminance() {
        assert_eq!(Rgba::opaque(255, 255, 255).luminance(), 255);
        assert_eq!(Rgba::opaque(0, 0, 0).luminance(), 0);
        assert_eq!(Rgba::new(255, 255, 255, 0).luminance(), 0);
    }
}
