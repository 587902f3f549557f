use serde::{Deserialize, Serialize};

use crate::api::SeriesId;
use crate::scene::NodeId;

/// Marker node currently highlighted, with the series that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightedNode {
    pub series_id: SeriesId,
    pub node: NodeId,
}

/// Public pointer state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    pub inside: bool,
    pub x: f64,
    pub y: f64,
}

/// Chart-wide interaction state. At most one node is highlighted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pointer: PointerState,
    highlighted: Option<HighlightedNode>,
}

impl InteractionState {
    #[must_use]
    pub fn pointer(self) -> PointerState {
        self.pointer
    }

    #[must_use]
    pub fn highlighted(self) -> Option<HighlightedNode> {
        self.highlighted
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = PointerState { inside: true, x, y };
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer.inside = false;
    }

    /// Stores the new highlight and returns the one it replaced.
    pub fn replace_highlight(
        &mut self,
        highlighted: Option<HighlightedNode>,
    ) -> Option<HighlightedNode> {
        std::mem::replace(&mut self.highlighted, highlighted)
    }
}
