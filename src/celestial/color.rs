//! Display colors for celestial bodies
//!
//! Colors are plain sRGB triples. They can be written as `#RRGGBB` hex
//! strings or as one of a handful of names used by the body tables.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{OrreryError, Result};

/// An sRGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    /// Create a color from its red, green and blue channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex string (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(OrreryError::InvalidParameter(format!(
                "color {:?} is not of the form #RRGGBB",
                hex
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|e| {
                OrreryError::InvalidParameter(format!("color {:?}: {}", hex, e))
            })
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Look up one of the named colors
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "yellow" => Self::YELLOW,
            "blue" => Self::BLUE,
            "red" => Self::RED,
            "orange" => Self::ORANGE,
            "gray" | "grey" => Self::GRAY,
            _ => return None,
        };
        Some(color)
    }

    /// RGBA components in [0, 1], used for faded orbit paths
    pub fn to_rgba(&self, alpha: f64) -> [f64; 4] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }
}

impl FromStr for Color {
    type Err = OrreryError;

    fn from_str(s: &str) -> Result<Self> {
        match Self::named(s) {
            Some(color) => Ok(color),
            None => Self::from_hex(s),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
