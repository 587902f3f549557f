use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::api::{ChartContext, InvalidationMask, SeriesId};
use crate::core::{Row, SeriesDomain, category_domain, continuous_domain, field_value};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;
use crate::scene::{
    DataJoin, LineJoin, MarkerNode, NodeClass, NodeId, NodeKind, PathNode, PointerEvents, Scene,
    Selection,
};

use super::legend::{LegendDatum, LegendLabel, LegendMarker};
use super::property::SeriesProperty;
use super::style::{HighlightStyle, MarkerStyle};
use super::tooltip::{TooltipRendererFn, TooltipRendererParams, default_tooltip_html};

fn default_fill() -> Color {
    Color::from_rgb8(0xf3, 0x62, 0x2d)
}

fn default_stroke() -> Color {
    Color::from_rgb8(0xaa, 0x45, 0x20)
}

fn default_stroke_width() -> f64 {
    3.0
}

fn default_true() -> bool {
    true
}

/// Serializable inputs of a [`LineSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesOptions {
    #[serde(default)]
    pub x_field: String,
    #[serde(default)]
    pub y_field: String,
    #[serde(default)]
    pub x_field_name: String,
    #[serde(default)]
    pub y_field_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_fill")]
    pub fill: Color,
    #[serde(default = "default_stroke")]
    pub stroke: Color,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub marker: MarkerStyle,
    #[serde(default)]
    pub highlight_style: HighlightStyle,
    #[serde(default = "default_true")]
    pub tooltip_enabled: bool,
}

impl Default for LineSeriesOptions {
    fn default() -> Self {
        Self {
            x_field: String::new(),
            y_field: String::new(),
            x_field_name: String::new(),
            y_field_name: String::new(),
            title: None,
            fill: default_fill(),
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
            visible: true,
            marker: MarkerStyle::default(),
            highlight_style: HighlightStyle::default(),
            tooltip_enabled: true,
        }
    }
}

impl LineSeriesOptions {
    #[must_use]
    pub fn with_fields(mut self, x_field: impl Into<String>, y_field: impl Into<String>) -> Self {
        self.x_field = x_field.into();
        self.y_field = y_field.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "series stroke width must be finite and >= 0".to_owned(),
            ));
        }
        if !self.marker.size.is_finite() || !self.marker.stroke_width.is_finite() {
            return Err(ChartError::InvalidData(
                "marker size and stroke width must be finite".to_owned(),
            ));
        }
        for color in [self.fill, self.stroke]
            .into_iter()
            .chain(self.marker.fill)
            .chain(self.marker.stroke)
        {
            color.validate()?;
        }
        Ok(())
    }
}

/// Screen-space record produced for every plotted row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerDatum {
    /// Index of the originating row among the rows drawn by the last
    /// render pass.
    pub row_index: usize,
    pub x: f64,
    pub y: f64,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub size: f64,
}

#[derive(Debug)]
struct RetainedNodes {
    group: NodeId,
    line: NodeId,
    markers: Selection<MarkerDatum>,
}

/// Category/value series drawn as a polyline with one marker per row.
///
/// Inputs are changed through setters that record how much work the change
/// needs; the owning chart runs [`LineSeries::process_data`] and
/// [`LineSeries::update`] accordingly.
pub struct LineSeries {
    options: LineSeriesOptions,
    data: Arc<[Row]>,
    /// Rows behind `x_data` / `y_data`.
    processed_rows: Arc<[Row]>,
    /// Rows behind the retained markers; tooltips read from here.
    drawn_rows: Arc<[Row]>,
    x_data: Vec<Value>,
    y_data: Vec<Value>,
    domain_x: SeriesDomain,
    domain_y: SeriesDomain,
    tooltip_renderer: Option<TooltipRendererFn>,
    pending: InvalidationMask,
    retained: Option<RetainedNodes>,
}

impl fmt::Debug for LineSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSeries")
            .field("options", &self.options)
            .field("rows", &self.data.len())
            .field("domain_x", &self.domain_x)
            .field("domain_y", &self.domain_y)
            .field("custom_tooltip", &self.tooltip_renderer.is_some())
            .field("pending", &self.pending)
            .field("attached", &self.retained.is_some())
            .finish()
    }
}

impl Default for LineSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::from_options(LineSeriesOptions::default())
    }

    #[must_use]
    pub fn from_options(options: LineSeriesOptions) -> Self {
        Self {
            options,
            data: Arc::from([]),
            processed_rows: Arc::from([]),
            drawn_rows: Arc::from([]),
            x_data: Vec::new(),
            y_data: Vec::new(),
            domain_x: SeriesDomain::default(),
            domain_y: SeriesDomain::default(),
            tooltip_renderer: None,
            pending: SeriesProperty::Data.invalidation(),
            retained: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &LineSeriesOptions {
        &self.options
    }

    #[must_use]
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<Row>) {
        self.data = Arc::from(data);
        self.invalidate(SeriesProperty::Data);
    }

    #[must_use]
    pub fn x_field(&self) -> &str {
        &self.options.x_field
    }

    pub fn set_x_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if self.options.x_field != field {
            self.options.x_field = field;
            self.x_data.clear();
            self.invalidate(SeriesProperty::XField);
        }
    }

    #[must_use]
    pub fn y_field(&self) -> &str {
        &self.options.y_field
    }

    pub fn set_y_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if self.options.y_field != field {
            self.options.y_field = field;
            self.y_data.clear();
            self.invalidate(SeriesProperty::YField);
        }
    }

    #[must_use]
    pub fn x_field_name(&self) -> &str {
        &self.options.x_field_name
    }

    pub fn set_x_field_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.options.x_field_name != name {
            self.options.x_field_name = name;
            self.invalidate(SeriesProperty::XFieldName);
        }
    }

    #[must_use]
    pub fn y_field_name(&self) -> &str {
        &self.options.y_field_name
    }

    pub fn set_y_field_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.options.y_field_name != name {
            self.options.y_field_name = name;
            self.invalidate(SeriesProperty::YFieldName);
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.options.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        if self.options.title != title {
            self.options.title = title;
            self.invalidate(SeriesProperty::Title);
        }
    }

    #[must_use]
    pub fn fill(&self) -> Color {
        self.options.fill
    }

    /// Sets the fill and derives the stroke as a darker shade of it.
    pub fn set_fill(&mut self, fill: Color) {
        if self.options.fill != fill {
            self.options.fill = fill;
            self.invalidate(SeriesProperty::Fill);
            self.set_stroke(fill.darker());
        }
    }

    #[must_use]
    pub fn stroke(&self) -> Color {
        self.options.stroke
    }

    pub fn set_stroke(&mut self, stroke: Color) {
        if self.options.stroke != stroke {
            self.options.stroke = stroke;
            self.invalidate(SeriesProperty::Stroke);
        }
    }

    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.options.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f64) -> ChartResult<()> {
        if !width.is_finite() || width < 0.0 {
            return Err(ChartError::InvalidData(
                "series stroke width must be finite and >= 0".to_owned(),
            ));
        }
        if self.options.stroke_width != width {
            self.options.stroke_width = width;
            self.invalidate(SeriesProperty::StrokeWidth);
        }
        Ok(())
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.options.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.options.visible != visible {
            self.options.visible = visible;
            self.invalidate(SeriesProperty::Visible);
        }
    }

    #[must_use]
    pub fn marker(&self) -> &MarkerStyle {
        &self.options.marker
    }

    pub fn set_marker(&mut self, marker: MarkerStyle) {
        if self.options.marker != marker {
            self.options.marker = marker;
            self.invalidate(SeriesProperty::Marker);
        }
    }

    #[must_use]
    pub fn highlight_style(&self) -> &HighlightStyle {
        &self.options.highlight_style
    }

    pub fn set_highlight_style(&mut self, style: HighlightStyle) {
        if self.options.highlight_style != style {
            self.options.highlight_style = style;
            self.invalidate(SeriesProperty::HighlightStyle);
        }
    }

    #[must_use]
    pub fn tooltip_enabled(&self) -> bool {
        self.options.tooltip_enabled
    }

    pub fn set_tooltip_enabled(&mut self, enabled: bool) {
        if self.options.tooltip_enabled != enabled {
            self.options.tooltip_enabled = enabled;
            self.invalidate(SeriesProperty::TooltipEnabled);
        }
    }

    /// Replaces the built-in tooltip markup. `None` restores the default.
    pub fn set_tooltip_renderer(&mut self, renderer: Option<TooltipRendererFn>) {
        self.tooltip_renderer = renderer;
        self.invalidate(SeriesProperty::TooltipRenderer);
    }

    /// Work recorded since the last completed pass.
    #[must_use]
    pub fn pending(&self) -> InvalidationMask {
        self.pending
    }

    #[must_use]
    pub fn is_data_dirty(&self) -> bool {
        self.pending.needs_data()
    }

    #[must_use]
    pub fn is_render_dirty(&self) -> bool {
        self.pending.needs_render()
    }

    pub(crate) fn invalidate(&mut self, property: SeriesProperty) {
        let mask = property.invalidation();
        if mask.is_none() {
            return;
        }
        self.pending.merge(mask);
        trace!(?property, level = ?self.pending.level(), "series invalidated");
    }

    /// Category domain (or continuous, if the x axis is continuous) from the
    /// last data phase.
    #[must_use]
    pub fn domain_x(&self) -> &SeriesDomain {
        &self.domain_x
    }

    /// Always continuous.
    #[must_use]
    pub fn domain_y(&self) -> &SeriesDomain {
        &self.domain_y
    }

    /// Whether the last data phase extracted any rows.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.x_data.is_empty()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.retained.is_some()
    }

    #[must_use]
    pub fn group_node(&self) -> Option<NodeId> {
        self.retained.as_ref().map(|retained| retained.group)
    }

    #[must_use]
    pub fn line_node(&self) -> Option<NodeId> {
        self.retained.as_ref().map(|retained| retained.line)
    }

    /// Per-datum group nodes in data order.
    #[must_use]
    pub fn marker_groups(&self) -> &[NodeId] {
        self.retained
            .as_ref()
            .map(|retained| retained.markers.nodes())
            .unwrap_or_default()
    }

    /// Marker datums from the last render pass, in data order.
    #[must_use]
    pub fn marker_data(&self) -> &[MarkerDatum] {
        self.retained
            .as_ref()
            .map(|retained| retained.markers.data())
            .unwrap_or_default()
    }

    /// Marker nodes from the last render pass, in data order.
    #[must_use]
    pub fn marker_nodes(&self, scene: &Scene) -> Vec<NodeId> {
        self.retained.as_ref().map_or_else(Vec::new, |retained| {
            retained
                .markers
                .select_by_class(scene, NodeClass::Marker)
                .nodes()
                .collect()
        })
    }

    /// Datum bound to `node` when it is one of this series' markers.
    #[must_use]
    pub fn marker_datum_for_node(&self, scene: &Scene, node: NodeId) -> Option<&MarkerDatum> {
        let retained = self.retained.as_ref()?;
        let marker = scene.node(node)?;
        if marker.class() != NodeClass::Marker {
            return None;
        }
        retained.markers.datum_of(marker.parent()?)
    }

    /// Creates the retained nodes under `parent`.
    pub fn attach(&mut self, scene: &mut Scene, parent: NodeId) -> ChartResult<()> {
        if self.retained.is_some() {
            self.detach(scene)?;
        }
        let group = scene.create_child(parent, NodeKind::Group)?;
        scene.get_mut(group)?.visible = self.options.visible;

        let line = scene.create_child(
            group,
            NodeKind::Path(PathNode {
                line_join: LineJoin::Round,
                ..PathNode::default()
            }),
        )?;
        scene.get_mut(line)?.pointer_events = PointerEvents::None;

        self.retained = Some(RetainedNodes {
            group,
            line,
            markers: Selection::new(group),
        });
        self.invalidate(SeriesProperty::Attachment);
        debug!(group = group.raw(), "series attached");
        Ok(())
    }

    /// Releases the retained nodes. Safe to call on a detached series.
    pub fn detach(&mut self, scene: &mut Scene) -> ChartResult<()> {
        if let Some(retained) = self.retained.take() {
            if scene.contains(retained.group) {
                scene.remove(retained.group)?;
            }
            debug!(group = retained.group.raw(), "series detached");
        }
        self.invalidate(SeriesProperty::Attachment);
        Ok(())
    }

    /// Data phase: extracts the bound fields and recomputes both domains.
    ///
    /// Returns `false` (leaving the series data-dirty) when there is no chart
    /// or either axis is unresolved.
    pub fn process_data(&mut self, chart: Option<&ChartContext<'_>>) -> bool {
        let Some(chart) = chart.filter(|chart| chart.axes_resolved()) else {
            trace!("data phase deferred: axes unresolved");
            return false;
        };
        let (Some(x_scale), Some(_)) = (chart.x_scale(), chart.y_scale()) else {
            return false;
        };

        let x_field = self.options.x_field.as_str();
        let y_field = self.options.y_field.as_str();
        if x_field.is_empty() || y_field.is_empty() {
            self.x_data.clear();
            self.y_data.clear();
        } else {
            let rows = &self.data;
            let extract = |field: &str| -> Vec<Value> {
                rows.iter()
                    .map(|row| field_value(row, field).cloned().unwrap_or(Value::Null))
                    .collect()
            };
            self.x_data = extract(x_field);
            self.y_data = extract(y_field);
        }

        self.domain_x = if x_scale.is_continuous() {
            SeriesDomain::continuous(continuous_domain(&self.x_data))
        } else {
            SeriesDomain::Category(category_domain(&self.x_data))
        };
        self.domain_y = SeriesDomain::continuous(continuous_domain(&self.y_data));
        self.processed_rows = Arc::clone(&self.data);

        self.pending.complete_data();
        trace!(
            rows = self.x_data.len(),
            domain_x = ?self.domain_x,
            domain_y = ?self.domain_y,
            "series data processed"
        );
        true
    }

    /// Render phase: rebuilds the line, joins marker datums to nodes and
    /// restyles every marker.
    ///
    /// Returns whether geometry was rebuilt. A missing chart, a chart that is
    /// still recomputing data or layout, or unresolved axes leave the series
    /// render-dirty; a hidden series only syncs group visibility.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        chart: Option<&ChartContext<'_>>,
        highlighted: Option<NodeId>,
    ) -> ChartResult<bool> {
        let Some(retained) = self.retained.as_mut() else {
            trace!("render skipped: series detached");
            return Ok(false);
        };
        scene.get_mut(retained.group)?.visible = self.options.visible;

        let Some(chart) = chart else {
            return Ok(false);
        };
        if chart.data_pending() || chart.layout_pending() {
            trace!("render deferred: chart pass in flight");
            return Ok(false);
        }
        let (Some(x_scale), Some(y_scale)) = (chart.x_scale(), chart.y_scale()) else {
            return Ok(false);
        };
        if !self.options.visible {
            self.pending.clear();
            return Ok(false);
        }

        let x_offset = x_scale.bandwidth().unwrap_or(0.0) / 2.0;
        let y_offset = y_scale.bandwidth().unwrap_or(0.0) / 2.0;
        let LineSeriesOptions {
            fill,
            stroke,
            stroke_width,
            marker,
            highlight_style,
            ..
        } = self.options;

        let mut marker_data = Vec::with_capacity(self.x_data.len());
        let line = scene
            .get_mut(retained.line)?
            .as_path_mut()
            .ok_or_else(|| {
                ChartError::InvalidSceneOperation("series line node is not a path".to_owned())
            })?;
        line.path.clear();
        let mut pen_down = false;
        for (row_index, (x_value, y_value)) in self.x_data.iter().zip(&self.y_data).enumerate() {
            let (Some(x), Some(y)) = (x_scale.band_start(x_value), y_scale.band_start(y_value))
            else {
                pen_down = false;
                continue;
            };
            let (x, y) = (x + x_offset, y + y_offset);
            if pen_down {
                line.path.line_to(x, y);
            } else {
                line.path.move_to(x, y);
                pen_down = true;
            }
            marker_data.push(MarkerDatum {
                row_index,
                x,
                y,
                fill,
                stroke,
                stroke_width: marker.stroke_width,
                size: marker.size,
            });
        }
        line.style.fill = None;
        line.style.stroke = Some(fill);
        line.style.stroke_width = stroke_width;

        let markers = std::mem::replace(&mut retained.markers, Selection::new(retained.group));
        let DataJoin {
            update,
            enter,
            exit,
        } = markers.join(marker_data);
        let removed = exit.remove(scene)?;
        let entered = enter.append(scene, |_| NodeKind::Group)?;
        entered.append_child(scene, |_| NodeKind::Marker(MarkerNode::default()))?;
        let added = entered.len();
        let groups = update.merge(entered);

        groups
            .select_by_class(scene, NodeClass::Marker)
            .each(scene, |node, datum, _| {
                let is_highlighted = highlighted == Some(node.id());
                node.translation_x = datum.x;
                node.translation_y = datum.y;
                node.visible = marker.enabled && datum.size > 0.0;
                if let Some(shape) = node.as_marker_mut() {
                    shape.shape = marker.shape;
                    shape.size = datum.size;
                    shape.style.fill = Some(match highlight_style.fill {
                        Some(color) if is_highlighted => color,
                        _ => marker.fill.unwrap_or(datum.fill),
                    });
                    shape.style.stroke = Some(match highlight_style.stroke {
                        Some(color) if is_highlighted => color,
                        _ => marker.stroke.unwrap_or(datum.stroke),
                    });
                    shape.style.stroke_width = datum.stroke_width;
                    shape.style.fill_opacity = marker.fill_opacity;
                    shape.style.stroke_opacity = marker.stroke_opacity;
                }
            })?;

        trace!(
            markers = groups.len(),
            added,
            removed,
            "series rendered"
        );
        retained.markers = groups;
        self.drawn_rows = Arc::clone(&self.processed_rows);
        self.pending.clear();
        Ok(true)
    }

    /// Tooltip markup for a marker of this series, built from the row the
    /// marker was drawn from even when newer data is pending. Empty when the
    /// fields are unbound, tooltips are disabled or nothing was drawn for
    /// `datum.row_index`.
    #[must_use]
    pub fn tooltip_html(&self, datum: &MarkerDatum) -> String {
        let x_key = self.options.x_field.as_str();
        let y_key = self.options.y_field.as_str();
        if x_key.is_empty() || y_key.is_empty() || !self.options.tooltip_enabled {
            return String::new();
        }
        let Some(row) = self.drawn_rows.get(datum.row_index) else {
            return String::new();
        };

        let title = self.options.title.as_deref();
        let color = self.options.fill;
        match &self.tooltip_renderer {
            Some(renderer) => renderer(&TooltipRendererParams {
                datum: row,
                x_key,
                x_name: &self.options.x_field_name,
                y_key,
                y_name: &self.options.y_field_name,
                title,
                color,
            }),
            None => {
                default_tooltip_html(title, color, field_value(row, x_key), field_value(row, y_key))
            }
        }
    }

    /// Appends this series' legend entry. Series without data or with
    /// unbound fields contribute nothing.
    pub fn list_series_items(&self, id: SeriesId, items: &mut Vec<LegendDatum>) {
        let y_field = &self.options.y_field;
        if self.data.is_empty() || self.options.x_field.is_empty() || y_field.is_empty() {
            return;
        }
        items.push(LegendDatum {
            id,
            item_id: None,
            enabled: self.options.visible,
            label: LegendLabel {
                text: self.options.title.clone().unwrap_or_else(|| y_field.clone()),
            },
            marker: LegendMarker {
                shape: self.options.marker.shape,
                fill: self.options.fill,
                stroke: self.options.stroke,
            },
        });
    }
}
