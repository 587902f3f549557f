mod legend;
mod line_series;
mod property;
mod style;
mod tooltip;

pub use legend::{LegendDatum, LegendLabel, LegendMarker};
pub use line_series::{LineSeries, LineSeriesOptions, MarkerDatum};
pub use property::SeriesProperty;
pub use style::{HighlightStyle, MarkerStyle};
pub use tooltip::{
    TooltipRendererFn, TooltipRendererParams, default_tooltip_html, format_tooltip_value, to_fixed,
};
