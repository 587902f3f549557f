use serde_json::Value;

use crate::core::domain::FALLBACK_CONTINUOUS_DOMAIN;
use crate::core::{
    BandScale, ContinuousScale, PixelRange, Scale, ScaleKind, SeriesDomain, union_categories,
    union_continuous,
};
use crate::error::ChartResult;

use super::AxisKind;

/// Concrete scale owned by an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    Continuous(ContinuousScale),
    Band(BandScale),
}

impl Scale for AxisScale {
    fn kind(&self) -> ScaleKind {
        match self {
            Self::Continuous(scale) => scale.kind(),
            Self::Band(scale) => scale.kind(),
        }
    }

    fn range(&self) -> PixelRange {
        match self {
            Self::Continuous(scale) => scale.range(),
            Self::Band(scale) => scale.range(),
        }
    }

    fn convert(&self, value: &Value) -> Option<f64> {
        match self {
            Self::Continuous(scale) => scale.convert(value),
            Self::Band(scale) => scale.convert(value),
        }
    }

    fn band_start(&self, value: &Value) -> Option<f64> {
        match self {
            Self::Continuous(scale) => scale.band_start(value),
            Self::Band(scale) => scale.band_start(value),
        }
    }

    fn bandwidth(&self) -> Option<f64> {
        match self {
            Self::Continuous(scale) => scale.bandwidth(),
            Self::Band(scale) => scale.bandwidth(),
        }
    }
}

/// Chart-owned axis. Only the chart mutates its scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    kind: AxisKind,
    scale: AxisScale,
}

impl Axis {
    #[must_use]
    pub fn new(kind: AxisKind) -> Self {
        let scale = match kind {
            AxisKind::Continuous { clamp } => {
                AxisScale::Continuous(ContinuousScale::default().with_clamp(clamp))
            }
            AxisKind::Category => AxisScale::Band(BandScale::default()),
        };
        Self { kind, scale }
    }

    #[must_use]
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    #[must_use]
    pub fn scale(&self) -> &AxisScale {
        &self.scale
    }

    /// Rebuilds the domain from the union of the series domains. Returns
    /// whether the domain changed.
    pub(super) fn apply_domains<'a, I>(&mut self, domains: I) -> ChartResult<bool>
    where
        I: IntoIterator<Item = &'a SeriesDomain>,
    {
        match &mut self.scale {
            AxisScale::Continuous(scale) => {
                let previous = scale.domain();
                let (min, max) = union_continuous(
                    domains.into_iter().filter_map(SeriesDomain::as_continuous),
                )
                .unwrap_or(FALLBACK_CONTINUOUS_DOMAIN);
                scale.set_domain_bounds(min, max)?;
                Ok(scale.domain() != previous)
            }
            AxisScale::Band(scale) => {
                let keys =
                    union_categories(domains.into_iter().filter_map(SeriesDomain::as_categories));
                if keys.iter().eq(scale.domain().iter()) {
                    return Ok(false);
                }
                scale.set_domain_keys(keys);
                Ok(true)
            }
        }
    }

    /// Returns whether the range changed.
    pub(super) fn apply_range(&mut self, range: PixelRange) -> ChartResult<bool> {
        if self.scale.range() == range {
            return Ok(false);
        }
        match &mut self.scale {
            AxisScale::Continuous(scale) => scale.set_range(range)?,
            AxisScale::Band(scale) => scale.set_range(range)?,
        }
        Ok(true)
    }
}
