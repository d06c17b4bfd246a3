//! RGBA colors.

use serde::Deserialize;

use crate::error::UiError;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Solid red.
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    /// Solid blue.
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from a hex value (0xRRGGBBAA).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] for anything else.
    pub fn parse_hex(text: &str) -> Result<Self, UiError> {
        let invalid = || UiError::InvalidConfig(format!("invalid color: {text:?}"));

        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Self::hex((value << 8) | 0xFF)),
            8 => Ok(Self::hex(value)),
            _ => Err(invalid()),
        }
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = UiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.0).abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse_hex("#ffffff"), Ok(Color::WHITE));
        assert_eq!(Color::parse_hex("#00000000"), Ok(Color::TRANSPARENT));
        assert!(Color::parse_hex("ffffff").is_err());
        assert!(Color::parse_hex("#fff").is_err());
        assert!(Color::parse_hex("#gggggg").is_err());
        // from_str_radix alone would take a sign
        assert!(Color::parse_hex("#+fffff").is_err());
        assert!(Color::parse_hex("#+fffffff").is_err());
    }
}
