use std::{fmt::Display, num::ParseIntError, str::FromStr};

use image::Rgba;
use palette::Srgba;
use serde::{Deserialize, Serialize};

/// Largest alpha value of the 7-bit alpha convention, where 0 is opaque
/// and this value is fully transparent.
pub const MAX_ALPHA: u8 = 127;

/// Opacity of a fully opaque color.
pub const OPAQUE: u8 = 100;

/// How strictly the opacity of two colors must agree
/// for them to be considered equal.
///
/// The discriminant is the maximum allowed opacity difference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ErrorLevel {
    Top = 0,
    High = 25,
    Medium = 50,
    Low = 75,
    /// Opacity is ignored entirely.
    Off = 100,
}

impl ErrorLevel {
    pub fn tolerance(self) -> u8 {
        self as u8
    }
}

impl Default for ErrorLevel {
    fn default() -> Self {
        ErrorLevel::Top
    }
}

/// An RGB color with an opacity percentage.
///
/// Opacity ranges from 0 (fully transparent) to 100 (fully opaque).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(default = "opaque")]
    pub opacity: u8,
}

fn opaque() -> u8 {
    OPAQUE
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(u8::MAX, u8::MAX, u8::MAX);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// Creates a color from its components. Opacity is clamped to 100.
    pub const fn new(red: u8, green: u8, blue: u8, opacity: u8) -> Self {
        Self {
            red,
            green,
            blue,
            opacity: if opacity > OPAQUE { OPAQUE } else { opacity },
        }
    }

    /// Creates a fully opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, OPAQUE)
    }

    /// Creates a color from the 7-bit alpha convention used by
    /// palette-based image libraries: 0 is opaque, 127 is transparent.
    pub fn from_alpha(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        let alpha = alpha.min(MAX_ALPHA);
        let opacity = ((1.0 - f64::from(alpha) / f64::from(MAX_ALPHA)) * 100.0) as u8;
        Self::new(red, green, blue, opacity)
    }

    /// Returns a copy with the given opacity.
    pub fn with_opacity(self, opacity: u8) -> Self {
        Self::new(self.red, self.green, self.blue, opacity)
    }

    /// Whether both colors have the same RGB components and their
    /// opacities differ by at most the tolerance of `level`.
    pub fn is_equal_to(&self, other: &Color, level: ErrorLevel) -> bool {
        if self.red != other.red || self.green != other.green || self.blue != other.blue {
            return false;
        }

        if level == ErrorLevel::Off {
            return true;
        }

        (i16::from(self.opacity) - i16::from(other.opacity)).abs() <= i16::from(level.tolerance())
    }

    /// Whether this color counts as transparent.
    ///
    /// At [`ErrorLevel::Top`] only a zero opacity is transparent;
    /// at any other level, every opacity below the tolerance is.
    pub fn is_transparent(&self, level: ErrorLevel) -> bool {
        match level {
            ErrorLevel::Top => self.opacity == 0,
            level => self.opacity < level.tolerance(),
        }
    }

    /// Gets the color as 8-bit RGBA, mapping opacity onto `0..=255`.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let alpha = (f32::from(self.opacity) * f32::from(u8::MAX) / f32::from(OPAQUE)).round();
        [self.red, self.green, self.blue, alpha as u8]
    }

    /// Creates a color from 8-bit RGBA.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        let opacity = (f32::from(rgba[3]) * f32::from(OPAQUE) / f32::from(u8::MAX)).round();
        Self::new(rgba[0], rgba[1], rgba[2], opacity as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<Rgba<u8>> for Color {
    fn from(pixel: Rgba<u8>) -> Self {
        Color::from_rgba8(pixel.0)
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba(color.to_rgba8())
    }
}

impl From<Srgba<u8>> for Color {
    fn from(color: Srgba<u8>) -> Self {
        Color::from_rgba8([color.red, color.green, color.blue, color.alpha])
    }
}

impl From<Color> for Srgba<u8> {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8();
        Srgba::new(r, g, b, a)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rgba = self.to_rgba8();
        write!(f, "#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2])?;
        if rgba[3] != u8::MAX {
            write!(f, "{:02x}", rgba[3])?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorParseError {
    #[error("expected 3 or 6 hex digits but found {0}")]
    InvalidLength(usize),
    #[error(transparent)]
    BadDigit(ParseIntError),
}

/// Parses `#rrggbb`, `#rgb` or the same without the leading `#`
/// into an opaque color.
impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(ColorParseError::InvalidLength(hex.chars().count()));
        }

        let channel =
            |digits: &str| u8::from_str_radix(digits, 16).map_err(ColorParseError::BadDigit);

        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // Each shorthand digit is doubled: `f` -> `ff`
                let doubled = |i: usize| channel(&hex[i..i + 1]).map(|d| d * 0x11);
                Ok(Color::rgb(doubled(0)?, doubled(1)?, doubled(2)?))
            }
            len => Err(ColorParseError::InvalidLength(len)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_tolerance() {
        let a = Color::new(10, 20, 30, 50);
        let b = Color::new(10, 20, 30, 80);
        assert!(a.is_equal_to(&b, ErrorLevel::Medium));
        assert!(!a.is_equal_to(&b, ErrorLevel::Top));
        assert!(a.is_equal_to(&b, ErrorLevel::Off));
        assert!(!a.is_equal_to(&Color::new(10, 20, 31, 50), ErrorLevel::Off));
    }

    #[test]
    fn low_level_matches_almost_any_opacity() {
        let font = Color::rgb(59, 89, 152);
        assert!(font.with_opacity(30).is_equal_to(&font, ErrorLevel::Low));
        assert!(font.with_opacity(25).is_equal_to(&font, ErrorLevel::Low));
        assert!(!font.with_opacity(24).is_equal_to(&font, ErrorLevel::Low));
    }

    #[test]
    fn transparency() {
        assert!(Color::TRANSPARENT.is_transparent(ErrorLevel::Top));
        assert!(!Color::new(0, 0, 0, 1).is_transparent(ErrorLevel::Top));
        assert!(Color::new(0, 0, 0, 49).is_transparent(ErrorLevel::Medium));
        assert!(!Color::new(0, 0, 0, 50).is_transparent(ErrorLevel::Medium));
        assert!(Color::new(0, 0, 0, 99).is_transparent(ErrorLevel::Off));
        assert!(!Color::BLACK.is_transparent(ErrorLevel::Off));
    }

    #[test]
    fn alpha_conversion() {
        assert_eq!(Color::from_alpha(1, 2, 3, 0).opacity, 100);
        assert_eq!(Color::from_alpha(1, 2, 3, 127).opacity, 0);
        // (1 - 64/127) * 100 = 49.6..., truncated
        assert_eq!(Color::from_alpha(1, 2, 3, 64).opacity, 49);
        assert_eq!(Color::from_alpha(1, 2, 3, 200).opacity, 0);
    }

    #[test]
    fn rgba8_conversion() {
        assert_eq!(Color::BLACK.to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(Color::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
        assert_eq!(Color::from_rgba8([9, 8, 7, 255]), Color::rgb(9, 8, 7));
        assert_eq!(Color::from_rgba8([9, 8, 7, 128]).opacity, 50);

        let srgba: Srgba<u8> = Color::rgb(1, 2, 3).into();
        assert_eq!(srgba.alpha, 255);
        assert_eq!(Color::from(srgba), Color::rgb(1, 2, 3));
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Color::new(0, 0, 0, 250).opacity, 100);
    }

    #[test]
    fn hex_strings() {
        assert_eq!("#3b5998".parse::<Color>().unwrap(), Color::rgb(59, 89, 152));
        assert_eq!("fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#0a0".parse::<Color>().unwrap(), Color::rgb(0, 0xaa, 0));
        assert!(matches!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::InvalidLength(5))
        ));
        assert!(matches!(
            "zzzzzz".parse::<Color>(),
            Err(ColorParseError::BadDigit(_))
        ));

        assert_eq!(Color::rgb(255, 254, 1).to_string(), "#fffe01");
        assert_eq!(Color::new(0, 0, 0, 50).to_string(), "#00000080");
    }
}
