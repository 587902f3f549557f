use std::collections::HashMap;

use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::scene::node::{Node, NodeId, NodeKind, PointerEvents, Visibility};

/// Arena owning every retained node of one chart.
///
/// The tree is rooted at a group created with the scene. Nodes are created
/// detached and become part of the tree once appended to a parent.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId::new(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(root, NodeKind::Group));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn get(&self, id: NodeId) -> ChartResult<&Node> {
        self.nodes.get(&id).ok_or(ChartError::UnknownNode(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> ChartResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(ChartError::UnknownNode(id))
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(Node::children)
            .unwrap_or_default()
    }

    /// Creates a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, kind));
        id
    }

    /// Creates a node and appends it as the last child of `parent`.
    pub fn create_child(&mut self, parent: NodeId, kind: NodeKind) -> ChartResult<NodeId> {
        self.get(parent)?;
        let id = self.create(kind);
        self.append(parent, id)?;
        Ok(id)
    }

    /// Makes `child` the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> ChartResult<()> {
        self.get(child)?;
        self.get(parent)?;
        if child == self.root {
            return Err(ChartError::InvalidSceneOperation(
                "the scene root cannot be reparented".to_owned(),
            ));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(ChartError::InvalidSceneOperation(format!(
                "appending {child:?} under {parent:?} would create a cycle"
            )));
        }

        self.detach(child)?;
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlinks `id` from its parent. The node stays alive and can be appended
    /// elsewhere.
    pub fn detach(&mut self, id: NodeId) -> ChartResult<()> {
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| *child != id);
            }
            self.get_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Unlinks `id` and discards it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> ChartResult<()> {
        if id == self.root {
            return Err(ChartError::InvalidSceneOperation(
                "the scene root cannot be removed".to_owned(),
            ));
        }
        self.detach(id)?;

        let mut stack = vec![id];
        let mut released = 0_usize;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                released += 1;
            }
        }
        trace!(node = id.raw(), released, "remove scene subtree");
        Ok(())
    }

    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(Node::parent);
        }
        false
    }

    /// Effective visibility, taking every ancestor into account.
    pub fn visibility(&self, id: NodeId) -> ChartResult<Visibility> {
        let node = self.get(id)?;
        if !node.visible {
            return Ok(Visibility::Hidden);
        }
        let mut current = node.parent;
        while let Some(parent) = current {
            let parent_node = self.get(parent)?;
            if !parent_node.visible {
                return Ok(Visibility::HiddenByAncestor);
            }
            current = parent_node.parent;
        }
        Ok(Visibility::Visible)
    }

    /// Depth-first pre-order walk starting at `start`, children in order.
    pub fn traverse<F>(&self, start: NodeId, mut visit: F) -> ChartResult<()>
    where
        F: FnMut(&Node, usize),
    {
        self.get(start)?;
        let mut stack = vec![(start, 0_usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.get(id)?;
            visit(node, depth);
            stack.extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
        }
        Ok(())
    }

    /// Top-most visible node accepting pointer events at `(x, y)`, in scene
    /// coordinates.
    #[must_use]
    pub fn pick(&self, x: f64, y: f64) -> Option<NodeId> {
        self.pick_in(self.root, x, y)
    }

    fn pick_in(&self, id: NodeId, x: f64, y: f64) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        if !node.visible {
            return None;
        }
        match node.kind {
            NodeKind::Group => {
                let local_x = x - node.translation_x;
                let local_y = y - node.translation_y;
                node.children
                    .iter()
                    .rev()
                    .find_map(|child| self.pick_in(*child, local_x, local_y))
            }
            NodeKind::Path(_) | NodeKind::Marker(_) => {
                (node.pointer_events == PointerEvents::All && node.contains_local(x, y))
                    .then_some(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::scene::node::{MarkerNode, NodeKind, Visibility};

    fn marker(size: f64) -> NodeKind {
        NodeKind::Marker(MarkerNode {
            size,
            ..MarkerNode::default()
        })
    }

    #[test]
    fn append_transfers_ownership() {
        let mut scene = Scene::new();
        let a = scene.create_child(scene.root(), NodeKind::Group).expect("a");
        let b = scene.create_child(scene.root(), NodeKind::Group).expect("b");
        let leaf = scene.create_child(a, marker(4.0)).expect("leaf");

        scene.append(b, leaf).expect("reparent");
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), &[leaf]);
        assert_eq!(scene.node(leaf).and_then(|node| node.parent()), Some(b));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut scene = Scene::new();
        let outer = scene.create_child(scene.root(), NodeKind::Group).expect("outer");
        let inner = scene.create_child(outer, NodeKind::Group).expect("inner");
        assert!(scene.append(inner, outer).is_err());
        assert!(scene.append(outer, outer).is_err());
    }

    #[test]
    fn remove_releases_the_subtree() {
        let mut scene = Scene::new();
        let group = scene.create_child(scene.root(), NodeKind::Group).expect("group");
        let leaf = scene.create_child(group, marker(4.0)).expect("leaf");
        scene.remove(group).expect("remove");
        assert!(!scene.contains(group));
        assert!(!scene.contains(leaf));
        assert!(scene.children(scene.root()).is_empty());
        assert!(scene.remove(scene.root()).is_err());
    }

    #[test]
    fn hidden_group_hides_descendants() {
        let mut scene = Scene::new();
        let group = scene.create_child(scene.root(), NodeKind::Group).expect("group");
        let leaf = scene.create_child(group, marker(4.0)).expect("leaf");
        scene.get_mut(group).expect("group").visible = false;

        assert_eq!(scene.visibility(group).expect("group"), Visibility::Hidden);
        assert_eq!(
            scene.visibility(leaf).expect("leaf"),
            Visibility::HiddenByAncestor
        );
    }

    #[test]
    fn pick_prefers_the_last_drawn_node() {
        let mut scene = Scene::new();
        let below = scene.create_child(scene.root(), marker(10.0)).expect("below");
        let above = scene.create_child(scene.root(), marker(10.0)).expect("above");
        assert_eq!(scene.pick(1.0, 1.0), Some(above));

        scene.get_mut(above).expect("above").visible = false;
        assert_eq!(scene.pick(1.0, 1.0), Some(below));
        assert_eq!(scene.pick(50.0, 50.0), None);
    }
}
