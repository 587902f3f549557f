use std::fmt;

use crate::core::Scale;

/// Read-only view of the chart handed to a series for one phase.
///
/// `data_pending` / `layout_pending` are raised while the chart is itself
/// recomputing domains or ranges; a series must not draw against scales in
/// that state.
#[derive(Clone, Copy)]
pub struct ChartContext<'a> {
    x_scale: Option<&'a dyn Scale>,
    y_scale: Option<&'a dyn Scale>,
    data_pending: bool,
    layout_pending: bool,
}

impl<'a> ChartContext<'a> {
    #[must_use]
    pub fn new(x_scale: Option<&'a dyn Scale>, y_scale: Option<&'a dyn Scale>) -> Self {
        Self {
            x_scale,
            y_scale,
            data_pending: false,
            layout_pending: false,
        }
    }

    #[must_use]
    pub fn with_data_pending(mut self, pending: bool) -> Self {
        self.data_pending = pending;
        self
    }

    #[must_use]
    pub fn with_layout_pending(mut self, pending: bool) -> Self {
        self.layout_pending = pending;
        self
    }

    #[must_use]
    pub fn x_scale(&self) -> Option<&'a dyn Scale> {
        self.x_scale
    }

    #[must_use]
    pub fn y_scale(&self) -> Option<&'a dyn Scale> {
        self.y_scale
    }

    #[must_use]
    pub fn data_pending(&self) -> bool {
        self.data_pending
    }

    #[must_use]
    pub fn layout_pending(&self) -> bool {
        self.layout_pending
    }

    #[must_use]
    pub fn axes_resolved(&self) -> bool {
        self.x_scale.is_some() && self.y_scale.is_some()
    }
}

impl fmt::Debug for ChartContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartContext")
            .field("x_scale", &self.x_scale.map(|scale| scale.kind()))
            .field("y_scale", &self.y_scale.map(|scale| scale.kind()))
            .field("data_pending", &self.data_pending)
            .field("layout_pending", &self.layout_pending)
            .finish()
    }
}
