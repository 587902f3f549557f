mod marker;
mod node;
mod path;
mod scene_graph;
mod selection;

pub use marker::MarkerShape;
pub use node::{
    LineJoin, MarkerNode, Node, NodeClass, NodeId, NodeKind, PathNode, PointerEvents, ShapeStyle,
    Visibility,
};
pub use path::{PathCommand, PathData};
pub use scene_graph::Scene;
pub use selection::{
    BoundSelection, DataJoin, EnterSelection, ExitSelection, Selection, SubSelection,
};
