use serde::{Deserialize, Serialize};

use crate::render::Color;
use crate::scene::marker::MarkerShape;
use crate::scene::path::PathData;

/// Stable identity of a node inside one `Scene`. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Whether a node takes part in hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerEvents {
    #[default]
    All,
    None,
}

/// Resolved visibility of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    /// The node itself is hidden.
    Hidden,
    /// The node is visible but an ancestor hides it.
    HiddenByAncestor,
}

impl Visibility {
    #[must_use]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Paint properties shared by paths and markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathNode {
    pub path: PathData,
    pub style: ShapeStyle,
    pub line_join: LineJoin,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerNode {
    pub shape: MarkerShape,
    pub size: f64,
    pub style: ShapeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Path(PathNode),
    Marker(MarkerNode),
}

impl NodeKind {
    #[must_use]
    pub fn class(&self) -> NodeClass {
        match self {
            Self::Group => NodeClass::Group,
            Self::Path(_) => NodeClass::Path,
            Self::Marker(_) => NodeClass::Marker,
        }
    }
}

/// Discriminant of `NodeKind`, used to sub-select children by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Group,
    Path,
    Marker,
}

/// One retained drawable.
///
/// Tree links are private: reparenting goes through `Scene` so a node is
/// never owned by two groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub kind: NodeKind,
    pub translation_x: f64,
    pub translation_y: f64,
    pub opacity: f64,
    pub visible: bool,
    pub pointer_events: PointerEvents,
}

impl Node {
    pub(super) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            kind,
            translation_x: 0.0,
            translation_y: 0.0,
            opacity: 1.0,
            visible: true,
            pointer_events: PointerEvents::All,
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn class(&self) -> NodeClass {
        self.kind.class()
    }

    #[must_use]
    pub fn as_marker(&self) -> Option<&MarkerNode> {
        match &self.kind {
            NodeKind::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn as_marker_mut(&mut self) -> Option<&mut MarkerNode> {
        match &mut self.kind {
            NodeKind::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&PathNode> {
        match &self.kind {
            NodeKind::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathNode> {
        match &mut self.kind {
            NodeKind::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Hit test in the coordinate space of the node's parent.
    #[must_use]
    pub fn contains_local(&self, x: f64, y: f64) -> bool {
        match &self.kind {
            NodeKind::Marker(marker) => marker.shape.contains(
                marker.size,
                x - self.translation_x,
                y - self.translation_y,
            ),
            NodeKind::Group | NodeKind::Path(_) => false,
        }
    }
}
