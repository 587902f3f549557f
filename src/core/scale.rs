use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::domain::{
    FALLBACK_CONTINUOUS_DOMAIN, category_domain, continuous_domain, widen_degenerate,
};
use crate::core::types::PixelRange;
use crate::core::value::{CategoryKey, as_finite_number};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Continuous,
    Band,
}

/// Domain-to-pixel mapping consumed by series geometry.
///
/// Series only read scales; the chart owns and mutates them between the data
/// and render phases of a pass.
pub trait Scale {
    fn kind(&self) -> ScaleKind;

    fn range(&self) -> PixelRange;

    /// Pixel position of `value`, `None` when the value is outside what the
    /// scale can map (non-numeric input, unknown category).
    fn convert(&self, value: &Value) -> Option<f64>;

    /// Leading edge of the slot allocated to `value`. Equals `convert` for
    /// scales without bands.
    fn band_start(&self, value: &Value) -> Option<f64> {
        self.convert(value)
    }

    /// Width of one band, `None` for continuous scales.
    fn bandwidth(&self) -> Option<f64> {
        None
    }

    fn is_continuous(&self) -> bool {
        self.kind() == ScaleKind::Continuous
    }
}

/// Linear numeric scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    domain_min: f64,
    domain_max: f64,
    range: PixelRange,
    #[serde(default)]
    clamp: bool,
}

impl ContinuousScale {
    pub fn new(domain: (f64, f64), range: PixelRange) -> ChartResult<Self> {
        let mut scale = Self::default();
        scale.set_domain_bounds(domain.0, domain.1)?;
        scale.set_range(range)?;
        Ok(scale)
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    #[must_use]
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    pub fn set_clamp(&mut self, clamp: bool) {
        self.clamp = clamp;
    }

    /// Sets the domain to the numeric extent of `values`. Falls back to
    /// `[0, 1]` when no value is numeric.
    pub fn set_domain<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let (min, max) = continuous_domain(values);
        self.domain_min = min;
        self.domain_max = max;
    }

    pub fn set_domain_bounds(&mut self, min: f64, max: f64) -> ChartResult<()> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain bounds must be finite".to_owned(),
            ));
        }
        let (min, max) = widen_degenerate((min, max));
        self.domain_min = min;
        self.domain_max = max;
        Ok(())
    }

    pub fn set_range(&mut self, range: PixelRange) -> ChartResult<()> {
        validate_range(range)?;
        self.range = range;
        Ok(())
    }

    /// Linear interpolation of a number into the pixel range.
    #[must_use]
    pub fn convert_number(&self, value: f64) -> f64 {
        let normalized = (value - self.domain_min) / (self.domain_max - self.domain_min);
        let pixel = self.range.start + normalized * self.range.span();
        if self.clamp {
            self.range.clamp(pixel)
        } else {
            pixel
        }
    }

    /// Inverse of `convert_number`, ignoring clamping.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let span = self.range.span();
        if span == 0.0 {
            return self.domain_min;
        }
        let normalized = (pixel - self.range.start) / span;
        self.domain_min + normalized * (self.domain_max - self.domain_min)
    }
}

impl Default for ContinuousScale {
    fn default() -> Self {
        Self {
            domain_min: FALLBACK_CONTINUOUS_DOMAIN.0,
            domain_max: FALLBACK_CONTINUOUS_DOMAIN.1,
            range: PixelRange::default(),
            clamp: false,
        }
    }
}

impl Scale for ContinuousScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Continuous
    }

    fn range(&self) -> PixelRange {
        self.range
    }

    fn convert(&self, value: &Value) -> Option<f64> {
        as_finite_number(value).map(|number| self.convert_number(number))
    }
}

/// Discrete scale giving every category an equal slot of the range.
///
/// Converting against an empty domain is unsupported: every lookup misses and
/// returns `None`, and `bandwidth` is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandScale {
    domain: IndexSet<CategoryKey>,
    range: PixelRange,
}

impl BandScale {
    pub fn new(domain: IndexSet<CategoryKey>, range: PixelRange) -> ChartResult<Self> {
        validate_range(range)?;
        Ok(Self { domain, range })
    }

    #[must_use]
    pub fn domain(&self) -> &IndexSet<CategoryKey> {
        &self.domain
    }

    /// Distinct keys of `values` in first-seen order.
    pub fn set_domain<'a, I>(&mut self, values: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        self.domain = category_domain(values);
    }

    pub fn set_domain_keys(&mut self, keys: IndexSet<CategoryKey>) {
        self.domain = keys;
    }

    pub fn set_range(&mut self, range: PixelRange) -> ChartResult<()> {
        validate_range(range)?;
        self.range = range;
        Ok(())
    }

    #[must_use]
    pub fn index_of(&self, key: &CategoryKey) -> Option<usize> {
        self.domain.get_index_of(key)
    }

    #[must_use]
    pub fn key_start(&self, key: &CategoryKey) -> Option<f64> {
        let bandwidth = self.bandwidth()?;
        let index = self.index_of(key)?;
        Some(self.range.start + bandwidth * index as f64)
    }
}

impl Scale for BandScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Band
    }

    fn range(&self) -> PixelRange {
        self.range
    }

    fn convert(&self, value: &Value) -> Option<f64> {
        let start = self.band_start(value)?;
        Some(start + self.bandwidth()? / 2.0)
    }

    fn band_start(&self, value: &Value) -> Option<f64> {
        self.key_start(&CategoryKey::from_value(value))
    }

    fn bandwidth(&self) -> Option<f64> {
        if self.domain.is_empty() {
            return None;
        }
        Some(self.range.span() / self.domain.len() as f64)
    }
}

fn validate_range(range: PixelRange) -> ChartResult<()> {
    if !range.start.is_finite() || !range.end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }
    Ok(())
}
