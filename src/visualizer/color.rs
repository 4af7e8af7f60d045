// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Color type for stick-figure styling.
///
/// Serialized as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Dark gray used for bones (#374151).
    pub const BONE_GRAY: Color = Color(0x37, 0x41, 0x51);
    /// Blue accent used for joints (#3B82F6).
    pub const JOINT_BLUE: Color = Color(0x3B, 0x82, 0xF6);
    /// White color.
    pub const WHITE: Color = Color(255, 255, 255);
    /// Black color.
    pub const BLACK: Color = Color(0, 0, 0);

    /// Create a new color from RGB values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigError`] if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, PipelineError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PipelineError::ConfigError(format!("Invalid hex color '{hex}'")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| PipelineError::ConfigError(format!("Invalid hex color '{hex}'")))
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Channels scaled to `[0, 1]`, as vector formats expect.
    #[must_use]
    pub fn normalized(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }

    /// Opaque RGBA pixel value.
    #[must_use]
    pub const fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 255])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Color {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
