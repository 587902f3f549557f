use serde::{Deserialize, Serialize};

/// Symbol drawn at each data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Diamond,
    Cross,
    Plus,
    Triangle,
}

impl MarkerShape {
    /// Whether the offset `(dx, dy)` from the marker center falls inside a
    /// marker of the given `size` (outer diameter).
    #[must_use]
    pub fn contains(self, size: f64, dx: f64, dy: f64) -> bool {
        if size.is_nan() || size <= 0.0 {
            return false;
        }
        let half = size / 2.0;
        match self {
            Self::Circle => dx * dx + dy * dy <= half * half,
            Self::Diamond => dx.abs() + dy.abs() <= half,
            Self::Square | Self::Cross | Self::Plus => dx.abs() <= half && dy.abs() <= half,
            // Upward triangle with its base on the bottom edge of the box.
            Self::Triangle => dy.abs() <= half && dx.abs() <= (dy + half) / 2.0,
        }
    }
}
