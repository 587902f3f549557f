use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::scene::{MarkerShape, PathCommand};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

const NAMED_COLORS: [(&str, (u8, u8, u8)); 12] = [
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
];

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic CSS color name.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        if let Some((_, (r, g, b))) = NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(Self::from_rgb8(*r, *g, *b));
        }

        let invalid = || ChartError::InvalidData(format!("unsupported color string `{input}`"));
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |text: &str| u8::from_str_radix(text, 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let expand = |index: usize| channel(hex[index..=index].repeat(2).as_str());
                Ok(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => {
                let mut color = Self::from_rgb8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                );
                if hex.len() == 8 {
                    color.alpha = f64::from(channel(&hex[6..8])?) / 255.0;
                }
                Ok(color)
            }
            _ => Err(invalid()),
        }
    }

    /// Same hue at 70% brightness.
    #[must_use]
    pub fn darker(self) -> Self {
        const FACTOR: f64 = 0.7;
        Self::rgba(
            self.red * FACTOR,
            self.green * FACTOR,
            self.blue * FACTOR,
            self.alpha,
        )
    }

    #[must_use]
    pub fn to_hex_string(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        );
        if self.alpha < 1.0 {
            format!("{rgb}{:02x}", byte(self.alpha))
        } else {
            rgb
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ChartError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

/// Draw command for one path in absolute pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrimitive {
    pub commands: Vec<PathCommand>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl PathPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.commands.iter().any(|command| !command.is_finite()) {
            return Err(ChartError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "path stroke width must be finite and >= 0".to_owned(),
            ));
        }
        for color in self.fill.iter().chain(self.stroke.iter()) {
            color.validate()?;
        }
        Ok(())
    }
}

/// Draw command for one marker centered at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPrimitive {
    pub shape: MarkerShape,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl MarkerPrimitive {
    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "marker coordinates must be finite".to_owned(),
            ));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ChartError::InvalidData(
                "marker size must be finite and > 0".to_owned(),
            ));
        }
        for color in self.fill.iter().chain(self.stroke.iter()) {
            color.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_and_named_colors_parse() {
        assert_eq!(
            Color::parse("#ff0000").expect("hex"),
            Color::rgb(1.0, 0.0, 0.0)
        );
        assert_eq!(
            Color::parse("#0f0").expect("short hex"),
            Color::rgb(0.0, 1.0, 0.0)
        );
        assert_eq!(Color::parse("Yellow").expect("name").to_hex_string(), "#ffff00");
        assert!(Color::parse("not-a-color").is_err());
        assert!(Color::parse("#12345").is_err());
    }

    #[test]
    fn darker_scales_channels() {
        let darker = Color::parse("#c0c0c0").expect("hex").darker();
        assert_eq!(darker.to_hex_string(), "#868686");
    }

    #[test]
    fn colors_serialize_as_hex_strings() {
        let json = serde_json::to_string(&Color::rgb(0.0, 0.0, 1.0)).expect("serialize");
        assert_eq!(json, "\"#0000ff\"");
        let back: Color = serde_json::from_str("\"#00ff0080\"").expect("deserialize");
        assert!((back.alpha - 128.0 / 255.0).abs() < 1e-9);
    }
}
