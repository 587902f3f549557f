use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::value::{CategoryKey, as_finite_number};

/// Domain used when no numeric value is available.
pub const FALLBACK_CONTINUOUS_DOMAIN: (f64, f64) = (0.0, 1.0);

/// `[min, max]` over the finite numeric entries, `None` if there are none.
#[must_use]
pub fn numeric_extent<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a Value>,
{
    values
        .into_iter()
        .filter_map(as_finite_number)
        .fold(None, |extent, value| match extent {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}

/// Widens a zero-width domain by one unit on each side.
#[must_use]
pub fn widen_degenerate(domain: (f64, f64)) -> (f64, f64) {
    let (min, max) = domain;
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        domain
    }
}

/// Continuous domain of a value column: numeric extent, `[0, 1]` fallback,
/// degenerate extents widened.
#[must_use]
pub fn continuous_domain<'a, I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a Value>,
{
    widen_degenerate(numeric_extent(values).unwrap_or(FALLBACK_CONTINUOUS_DOMAIN))
}

/// Distinct category keys in first-seen order.
#[must_use]
pub fn category_domain<'a, I>(values: I) -> IndexSet<CategoryKey>
where
    I: IntoIterator<Item = &'a Value>,
{
    values.into_iter().map(CategoryKey::from_value).collect()
}

/// Domain contributed by one series along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesDomain {
    Continuous { min: f64, max: f64 },
    Category(IndexSet<CategoryKey>),
}

impl SeriesDomain {
    #[must_use]
    pub fn continuous((min, max): (f64, f64)) -> Self {
        Self::Continuous { min, max }
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous { min, max } => Some((*min, *max)),
            Self::Category(_) => None,
        }
    }

    #[must_use]
    pub fn as_categories(&self) -> Option<&IndexSet<CategoryKey>> {
        match self {
            Self::Category(keys) => Some(keys),
            Self::Continuous { .. } => None,
        }
    }
}

impl Default for SeriesDomain {
    fn default() -> Self {
        Self::continuous(FALLBACK_CONTINUOUS_DOMAIN)
    }
}

/// Envelope of several continuous domains, `None` when the input is empty.
#[must_use]
pub fn union_continuous<I>(domains: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    domains.into_iter().fold(None, |acc, (min, max)| match acc {
        None => Some((min, max)),
        Some((lo, hi)) => Some((lo.min(min), hi.max(max))),
    })
}

/// Ordered union of category domains: earlier domains keep their order, new
/// keys are appended as they are first seen.
#[must_use]
pub fn union_categories<'a, I>(domains: I) -> IndexSet<CategoryKey>
where
    I: IntoIterator<Item = &'a IndexSet<CategoryKey>>,
{
    let mut merged = IndexSet::new();
    for domain in domains {
        merged.extend(domain.iter().cloned());
    }
    merged
}
