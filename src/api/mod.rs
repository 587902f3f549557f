mod axis;
mod chart;
mod config;
mod context;
mod invalidation;

use serde::{Deserialize, Serialize};

pub use axis::{Axis, AxisScale};
pub use chart::{Chart, PassSummary, PointerHit};
pub use config::{AxisKind, ChartConfig};
pub use context::ChartContext;
pub use invalidation::{
    InvalidationLevel, InvalidationMask, InvalidationTopic, InvalidationTopics,
};

/// Handle of a series registered with a [`Chart`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u32);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
