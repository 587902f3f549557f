use serde::{Deserialize, Serialize};

use crate::core::{Padding, Viewport};
use crate::error::{ChartError, ChartResult};

/// Scale family backing an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AxisKind {
    Continuous {
        #[serde(default)]
        clamp: bool,
    },
    Category,
}

impl AxisKind {
    #[must_use]
    pub const fn continuous() -> Self {
        Self::Continuous { clamp: false }
    }
}

/// Chart bootstrap configuration.
///
/// Serializable so a host panel can persist chart setup. An axis left as
/// `None` is unresolved: series attached to the chart stay idle until it is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default = "default_x_axis")]
    pub x_axis: Option<AxisKind>,
    #[serde(default = "default_y_axis")]
    pub y_axis: Option<AxisKind>,
}

impl ChartConfig {
    /// Category x axis, continuous y axis, default padding.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            padding: Padding::default(),
            x_axis: default_x_axis(),
            y_axis: default_y_axis(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, kind: Option<AxisKind>) -> Self {
        self.x_axis = kind;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, kind: Option<AxisKind>) -> Self {
        self.y_axis = kind;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        let padding = self.padding;
        if [padding.top, padding.right, padding.bottom, padding.left]
            .iter()
            .any(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(ChartError::InvalidData(
                "chart padding must be finite and >= 0".to_owned(),
            ));
        }
        validate_value_axis(self.y_axis)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }
}

/// The value axis is always continuous.
pub(super) fn validate_value_axis(kind: Option<AxisKind>) -> ChartResult<()> {
    if matches!(kind, Some(AxisKind::Category)) {
        return Err(ChartError::InvalidData(
            "the value (y) axis must be continuous".to_owned(),
        ));
    }
    Ok(())
}

fn default_x_axis() -> Option<AxisKind> {
    Some(AxisKind::Category)
}

fn default_y_axis() -> Option<AxisKind> {
    Some(AxisKind::continuous())
}
