//! chart-scene: retained scene graph and series pipeline for category/value
//! charts.
//!
//! Series own a subtree of a retained [`scene::Scene`] and reconcile it with
//! their data through a data join. A [`Chart`] owns the scene, the axes and
//! the series, and schedules work in two phases: every pending data phase
//! runs (and the axis domains are recomputed) before any series redraws.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod series;
pub mod telemetry;

pub use api::{Chart, ChartConfig, PassSummary, SeriesId};
pub use error::{ChartError, ChartResult};
pub use series::{LineSeries, LineSeriesOptions};
