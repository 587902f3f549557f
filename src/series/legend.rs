use serde::{Deserialize, Serialize};

use crate::api::SeriesId;
use crate::render::Color;
use crate::scene::MarkerShape;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendLabel {
    pub text: String,
}

/// Swatch drawn next to the legend label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendMarker {
    pub shape: MarkerShape,
    pub fill: Color,
    pub stroke: Color,
}

/// One legend entry. `enabled` mirrors the series' visibility; toggling it
/// goes back through `Chart::set_legend_item_enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendDatum {
    pub id: SeriesId,
    pub item_id: Option<String>,
    pub enabled: bool,
    pub label: LegendLabel,
    pub marker: LegendMarker,
}
