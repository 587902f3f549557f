use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Padding, PixelRange, Scale, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HighlightedNode, InteractionState, PointerState};
use crate::render::{RenderFrame, Renderer};
use crate::scene::{NodeId, NodeKind, Scene};
use crate::series::{LegendDatum, LineSeries, SeriesProperty};

use super::config::validate_value_axis;
use super::{
    Axis, AxisKind, ChartConfig, ChartContext, InvalidationMask, InvalidationTopic, SeriesId,
};

/// What one [`Chart::run_pass`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassSummary {
    /// Series whose data phase completed.
    pub data_processed: usize,
    /// Series whose geometry was rebuilt.
    pub rendered: usize,
    /// Series left dirty because an axis is unresolved.
    pub deferred: usize,
    /// Whether any axis domain or range changed.
    pub axes_changed: bool,
}

impl PassSummary {
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::default()
    }
}

/// Marker under the pointer, as reported by [`Chart::pointer_move`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointerHit {
    pub series_id: SeriesId,
    pub node: NodeId,
    pub row_index: usize,
    /// `None` when the series produced no tooltip.
    pub tooltip_html: Option<String>,
}

/// Owns the scene, the axes and the registered series, and schedules their
/// work.
///
/// Setters on series and on the chart only record invalidations. A pass
/// (`run_pass`, or implicitly `render`) then runs every pending data phase
/// in registration order, recomputes the axis domains and ranges, and runs
/// every pending render phase.
pub struct Chart<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    scene: Scene,
    series_root: NodeId,
    x_axis: Option<Axis>,
    y_axis: Option<Axis>,
    series: Vec<(SeriesId, LineSeries)>,
    next_series_id: u32,
    interaction: InteractionState,
    pending: InvalidationMask,
}

impl<R: Renderer> Chart<R> {
    pub fn new(renderer: R, config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;

        let mut scene = Scene::new();
        let series_root = scene.create_child(scene.root(), NodeKind::Group)?;

        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            x_axis = ?config.x_axis,
            y_axis = ?config.y_axis,
            "chart created"
        );

        Ok(Self {
            renderer,
            config,
            scene,
            series_root,
            x_axis: config.x_axis.map(Axis::new),
            y_axis: config.y_axis.map(Axis::new),
            series: Vec::new(),
            next_series_id: 0,
            interaction: InteractionState::default(),
            pending: InvalidationMask::data(InvalidationTopic::Layout),
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn x_axis(&self) -> Option<&Axis> {
        self.x_axis.as_ref()
    }

    #[must_use]
    pub fn y_axis(&self) -> Option<&Axis> {
        self.y_axis.as_ref()
    }

    /// Chart-level work recorded since the last pass.
    #[must_use]
    pub fn pending(&self) -> InvalidationMask {
        self.pending
    }

    /// Whether the next pass has anything to do.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_none()
            || self
                .series
                .iter()
                .any(|(_, series)| !series.pending().is_none())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if self.config.viewport != viewport {
            self.config.viewport = viewport;
            self.pending
                .merge(InvalidationMask::render(InvalidationTopic::Layout));
        }
        Ok(())
    }

    pub fn set_padding(&mut self, padding: Padding) -> ChartResult<()> {
        let mut config = self.config;
        config.padding = padding;
        config.validate()?;
        if self.config.padding != padding {
            self.config.padding = padding;
            self.pending
                .merge(InvalidationMask::render(InvalidationTopic::Layout));
        }
        Ok(())
    }

    /// Replaces the category axis. `None` leaves it unresolved, which parks
    /// every series until an axis is set again.
    pub fn set_x_axis(&mut self, kind: Option<AxisKind>) {
        if self.config.x_axis == kind {
            return;
        }
        self.config.x_axis = kind;
        self.x_axis = kind.map(Axis::new);
        self.axis_replaced();
    }

    /// Replaces the value axis, which must be continuous.
    pub fn set_y_axis(&mut self, kind: Option<AxisKind>) -> ChartResult<()> {
        validate_value_axis(kind)?;
        if self.config.y_axis == kind {
            return Ok(());
        }
        self.config.y_axis = kind;
        self.y_axis = kind.map(Axis::new);
        self.axis_replaced();
        Ok(())
    }

    fn axis_replaced(&mut self) {
        self.pending
            .merge(InvalidationMask::data(InvalidationTopic::Layout));
        for (_, series) in &mut self.series {
            series.invalidate(SeriesProperty::Attachment);
        }
        debug!(x_axis = ?self.config.x_axis, y_axis = ?self.config.y_axis, "axis replaced");
    }

    /// Attaches `series` and returns its handle. Its data phase runs on the
    /// next pass.
    pub fn add_series(&mut self, mut series: LineSeries) -> ChartResult<SeriesId> {
        series.options().validate()?;
        series.attach(&mut self.scene, self.series_root)?;

        let id = SeriesId::new(self.next_series_id);
        self.next_series_id += 1;
        self.series.push((id, series));
        self.pending
            .merge(InvalidationMask::data(InvalidationTopic::Attachment));
        debug!(series = id.raw(), count = self.series.len(), "series added");
        Ok(id)
    }

    /// Detaches and returns the series, releasing its scene nodes.
    pub fn remove_series(&mut self, id: SeriesId) -> ChartResult<LineSeries> {
        let index = self
            .series
            .iter()
            .position(|(series_id, _)| *series_id == id)
            .ok_or(ChartError::UnknownSeries(id))?;
        let (_, mut series) = self.series.remove(index);

        if self
            .interaction
            .highlighted()
            .is_some_and(|highlighted| highlighted.series_id == id)
        {
            self.interaction.replace_highlight(None);
        }
        series.detach(&mut self.scene)?;
        self.pending
            .merge(InvalidationMask::data(InvalidationTopic::Attachment));
        debug!(series = id.raw(), count = self.series.len(), "series removed");
        Ok(series)
    }

    /// Registered series handles in registration order.
    #[must_use]
    pub fn series_ids(&self) -> Vec<SeriesId> {
        self.series.iter().map(|(id, _)| *id).collect()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&LineSeries> {
        self.series
            .iter()
            .find(|(series_id, _)| *series_id == id)
            .map(|(_, series)| series)
    }

    /// Mutable access for setters. Changes take effect on the next pass.
    #[must_use]
    pub fn series_mut(&mut self, id: SeriesId) -> Option<&mut LineSeries> {
        self.series
            .iter_mut()
            .find(|(series_id, _)| *series_id == id)
            .map(|(_, series)| series)
    }

    fn require_series_mut(&mut self, id: SeriesId) -> ChartResult<&mut LineSeries> {
        self.series_mut(id).ok_or(ChartError::UnknownSeries(id))
    }

    /// Runs one scheduling pass: pending data phases, axis domains, axis
    /// ranges, pending render phases. A pass with nothing pending does
    /// nothing.
    pub fn run_pass(&mut self) -> ChartResult<PassSummary> {
        let mut summary = PassSummary::default();
        let data_needed = self.pending.needs_data()
            || self.series.iter().any(|(_, series)| series.is_data_dirty());

        if data_needed {
            let context = chart_context(&self.x_axis, &self.y_axis).with_data_pending(true);
            for (id, series) in &mut self.series {
                if !series.is_data_dirty() {
                    continue;
                }
                if series.process_data(Some(&context)) {
                    summary.data_processed += 1;
                } else {
                    summary.deferred += 1;
                    warn!(series = id.raw(), "series data deferred: axis unresolved");
                }
            }
            summary.axes_changed |= self.apply_axis_domains()?;
        }

        if data_needed || self.pending.needs_render() {
            summary.axes_changed |= self.apply_axis_ranges()?;
        }
        self.pending.clear();

        if summary.axes_changed {
            for (_, series) in &mut self.series {
                series.invalidate(SeriesProperty::Scales);
            }
        }

        let highlighted = self.interaction.highlighted().map(|highlighted| highlighted.node);
        let context = chart_context(&self.x_axis, &self.y_axis);
        for (id, series) in &mut self.series {
            if series.is_data_dirty() || !series.is_render_dirty() {
                continue;
            }
            if series.update(&mut self.scene, Some(&context), highlighted)? {
                summary.rendered += 1;
                trace!(series = id.raw(), "series render phase complete");
            }
        }
        self.drop_stale_highlight();

        if !summary.is_idle() {
            debug!(
                data_processed = summary.data_processed,
                rendered = summary.rendered,
                deferred = summary.deferred,
                axes_changed = summary.axes_changed,
                "chart pass complete"
            );
        }
        Ok(summary)
    }

    fn apply_axis_domains(&mut self) -> ChartResult<bool> {
        let mut changed = false;
        if let Some(axis) = &mut self.x_axis {
            changed |= axis.apply_domains(contributing(&self.series).map(LineSeries::domain_x))?;
        }
        if let Some(axis) = &mut self.y_axis {
            changed |= axis.apply_domains(contributing(&self.series).map(LineSeries::domain_y))?;
        }
        Ok(changed)
    }

    fn apply_axis_ranges(&mut self) -> ChartResult<bool> {
        let (x_range, y_range) = plot_ranges(self.config.viewport, self.config.padding);
        let mut changed = false;
        if let Some(axis) = &mut self.x_axis {
            changed |= axis.apply_range(x_range)?;
        }
        if let Some(axis) = &mut self.y_axis {
            changed |= axis.apply_range(y_range)?;
        }
        Ok(changed)
    }

    /// Clears a highlight whose marker was removed by a shrinking join.
    fn drop_stale_highlight(&mut self) {
        let Some(highlighted) = self.interaction.highlighted() else {
            return;
        };
        let alive = self.series(highlighted.series_id).is_some_and(|series| {
            series
                .marker_datum_for_node(&self.scene, highlighted.node)
                .is_some()
        });
        if !alive {
            self.interaction.replace_highlight(None);
            debug!(
                series = highlighted.series_id.raw(),
                node = highlighted.node.raw(),
                "highlighted marker released"
            );
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<HighlightedNode> {
        self.interaction.highlighted()
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.interaction.pointer()
    }

    /// Highlights one marker node of `series_id`. Nodes that are not markers
    /// of that series are ignored and `false` is returned.
    pub fn highlight_node(&mut self, series_id: SeriesId, node: NodeId) -> ChartResult<bool> {
        let series = self
            .series(series_id)
            .ok_or(ChartError::UnknownSeries(series_id))?;
        if series.marker_datum_for_node(&self.scene, node).is_none() {
            trace!(series = series_id.raw(), node = node.raw(), "highlight ignored: not a marker");
            return Ok(false);
        }

        let next = HighlightedNode { series_id, node };
        if self.interaction.highlighted() == Some(next) {
            return Ok(true);
        }
        let previous = self.interaction.replace_highlight(Some(next));
        if let Some(previous) = previous {
            if let Some(series) = self.series_mut(previous.series_id) {
                series.invalidate(SeriesProperty::Highlight);
            }
        }
        self.require_series_mut(series_id)?
            .invalidate(SeriesProperty::Highlight);
        trace!(series = series_id.raw(), node = node.raw(), "node highlighted");
        Ok(true)
    }

    /// Clears the highlight, restoring the node's normal style on the next
    /// pass.
    pub fn dehighlight(&mut self) {
        if let Some(previous) = self.interaction.replace_highlight(None) {
            if let Some(series) = self.series_mut(previous.series_id) {
                series.invalidate(SeriesProperty::Highlight);
            }
            trace!(node = previous.node.raw(), "node dehighlighted");
        }
    }

    /// Hit-tests the scene at `(x, y)`. A marker hit becomes the highlighted
    /// node and its tooltip is returned; anything else clears the highlight.
    ///
    /// Pending work is flushed with [`Chart::run_pass`] first, so the hit test
    /// and the tooltip see the current geometry.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<Option<PointerHit>> {
        self.interaction.on_pointer_move(x, y);
        if self.has_pending_work() {
            self.run_pass()?;
        }

        let scene = &self.scene;
        let hit = scene.pick(x, y).and_then(|node| {
            self.series.iter().find_map(|(series_id, series)| {
                series
                    .marker_datum_for_node(scene, node)
                    .map(|datum| PointerHit {
                        series_id: *series_id,
                        node,
                        row_index: datum.row_index,
                        tooltip_html: Some(series.tooltip_html(datum))
                            .filter(|html| !html.is_empty()),
                    })
            })
        });

        match hit {
            Some(hit) => {
                self.highlight_node(hit.series_id, hit.node)?;
                Ok(Some(hit))
            }
            None => {
                self.dehighlight();
                Ok(None)
            }
        }
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.on_pointer_leave();
        self.dehighlight();
    }

    /// Legend entries for every series with data, in registration order.
    #[must_use]
    pub fn legend_data(&self) -> Vec<LegendDatum> {
        let mut items = Vec::with_capacity(self.series.len());
        for (id, series) in &self.series {
            series.list_series_items(*id, &mut items);
        }
        items
    }

    /// Legend toggle: shows or hides the series behind a legend entry.
    pub fn set_legend_item_enabled(&mut self, id: SeriesId, enabled: bool) -> ChartResult<()> {
        self.require_series_mut(id)?.set_visible(enabled);
        Ok(())
    }

    /// Runs a pass and flattens the visible scene into draw primitives.
    pub fn build_render_frame(&mut self) -> ChartResult<RenderFrame> {
        self.run_pass()?;
        RenderFrame::from_scene(&self.scene, self.config.viewport)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    /// Renders only when a setter recorded work since the last pass.
    pub fn render_if_invalidated(&mut self) -> ChartResult<bool> {
        if !self.has_pending_work() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }
}

fn chart_context<'a>(x_axis: &'a Option<Axis>, y_axis: &'a Option<Axis>) -> ChartContext<'a> {
    ChartContext::new(
        x_axis.as_ref().map(|axis| axis.scale() as &dyn Scale),
        y_axis.as_ref().map(|axis| axis.scale() as &dyn Scale),
    )
}

/// Series whose domains feed the axes: data phase complete and at least one
/// extracted row.
fn contributing(series: &[(SeriesId, LineSeries)]) -> impl Iterator<Item = &LineSeries> {
    series
        .iter()
        .map(|(_, series)| series)
        .filter(|series| series.is_attached() && !series.is_data_dirty() && series.has_data())
}

/// Plot-area ranges: x left to right, y bottom to top.
fn plot_ranges(viewport: Viewport, padding: Padding) -> (PixelRange, PixelRange) {
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let right = (width - padding.right).max(padding.left);
    let bottom = (height - padding.bottom).max(padding.top);
    (
        PixelRange::new(padding.left, right),
        PixelRange::new(bottom, padding.top),
    )
}
