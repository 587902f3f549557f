use serde::{Deserialize, Serialize};

use crate::render::Color;
use crate::scene::MarkerShape;

/// Marker drawn at every data point of a series.
///
/// `fill` / `stroke`, when set, take precedence over the series colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub enabled: bool,
    pub shape: MarkerShape,
    pub size: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            shape: MarkerShape::Circle,
            size: 8.0,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

/// Paint applied to the highlighted marker. A channel left as `None` keeps
/// the marker's normal color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::rgb(1.0, 1.0, 0.0)),
            stroke: None,
        }
    }
}
