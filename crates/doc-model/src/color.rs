//! Annotation colours.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// RGBA colour representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized colour: {0:?}")]
pub struct ColorParseError(pub String);

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS-style hex form; the alpha byte is only written when not opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    fn from_named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "yellow" => Color::YELLOW,
            "orange" => Color::ORANGE,
            "purple" => Color::PURPLE,
            _ => return None,
        };
        Some(color)
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 128, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const ORANGE: Color = Color { r: 255, g: 165, b: 0, a: 255 };
    pub const PURPLE: Color = Color { r: 128, g: 0, b: 128, a: 255 };
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Color::from_named(trimmed).ok_or_else(|| ColorParseError(s.to_owned()));
        };

        let err = || ColorParseError(s.to_owned());
        let digits = |i: usize, len: usize| {
            let text = hex.get(i..i + len).ok_or_else(err)?;
            u8::from_str_radix(text, 16).map_err(|_| err())
        };
        let byte = |i: usize| digits(i, 2);
        let nibble = |i: usize| Ok::<u8, ColorParseError>(digits(i, 1)? * 17);

        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    /// Unknown colour strings decode to black so one bad value never drops a record
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|err: ColorParseError| {
            log::warn!("{err}, falling back to black");
            Color::BLACK
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#ff0000".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#F00".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#00000080".parse::<Color>(), Ok(Color::new(0, 0, 0, 128)));
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!("Blue".parse::<Color>(), Ok(Color::BLUE));
        assert!("chartreuse-ish".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn hex_omits_opaque_alpha() {
        assert_eq!(Color::rgb(18, 52, 86).to_hex(), "#123456");
        assert_eq!(Color::new(18, 52, 86, 0).to_hex(), "#12345600");
    }

    #[test]
    fn deserializing_unknown_color_falls_back_to_black() {
        let color: Color = serde_json::from_str("\"not-a-colour\"").unwrap();
        assert_eq!(color, Color::BLACK);
        let color: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(color, Color::rgb(0, 255, 0));
    }
}
