//! Data-join engine binding ordered data to retained scene nodes.
//!
//! A join splits a new data sequence against the nodes currently bound to a
//! selection into three disjoint sets:
//!
//! - **update**: data items matched to an existing node,
//! - **enter**: data items with no node yet,
//! - **exit**: existing nodes with no data item left.
//!
//! The engine never creates or removes nodes on its own. Callers append the
//! enter set (possibly several nodes per item), remove the exit set, and then
//! `merge` update and enter back into a selection in data order. Leaving the
//! exit set unresolved leaks stale nodes into the tree; this is a caller
//! contract, not something the engine checks.

use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;
use tracing::trace;

use crate::error::ChartResult;
use crate::scene::node::{Node, NodeClass, NodeId, NodeKind};
use crate::scene::scene_graph::Scene;

/// Nodes under one parent group, each bound to one datum.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<D> {
    parent: NodeId,
    nodes: Vec<NodeId>,
    data: Vec<D>,
}

impl<D> Selection<D> {
    /// Empty selection whose entered nodes will be appended under `parent`.
    #[must_use]
    pub fn new(parent: NodeId) -> Self {
        Self {
            parent,
            nodes: Vec::new(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn data(&self) -> &[D] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &D)> {
        self.nodes.iter().copied().zip(self.data.iter())
    }

    #[must_use]
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|candidate| *candidate == node)
    }

    #[must_use]
    pub fn datum_of(&self, node: NodeId) -> Option<&D> {
        self.position_of(node).and_then(|index| self.data.get(index))
    }

    /// Joins by position: the nth item binds to the nth node.
    pub fn join(self, data: Vec<D>) -> DataJoin<D> {
        let Self {
            parent,
            mut nodes,
            data: _previous,
        } = self;
        let mut data = data;
        let bound = nodes.len().min(data.len());
        let exit_nodes = nodes.split_off(bound);
        let enter_data = data.split_off(bound);
        let enter_positions = (bound..bound + enter_data.len()).collect();

        trace!(
            update = bound,
            enter = enter_data.len(),
            exit = exit_nodes.len(),
            "positional data join"
        );

        DataJoin {
            update: BoundSelection {
                selection: Self {
                    parent,
                    nodes,
                    data,
                },
                positions: (0..bound).collect(),
            },
            enter: EnterSelection {
                parent,
                data: enter_data,
                positions: enter_positions,
            },
            exit: ExitSelection {
                parent,
                nodes: exit_nodes,
            },
        }
    }

    /// Joins by identity key: an item binds to the first unclaimed node whose
    /// previous datum has the same key. Unmatched items enter, unclaimed
    /// nodes exit; duplicate keys therefore fall through to enter/exit.
    pub fn join_keyed<K, F>(self, data: Vec<D>, key: F) -> DataJoin<D>
    where
        K: Eq + Hash,
        F: Fn(&D) -> K,
    {
        let Self {
            parent,
            nodes,
            data: previous,
        } = self;

        let mut index_by_key: HashMap<K, usize> = HashMap::with_capacity(previous.len());
        for (index, datum) in previous.iter().enumerate() {
            index_by_key.entry(key(datum)).or_insert(index);
        }

        let mut claimed = vec![false; nodes.len()];
        let mut update = BoundSelection {
            selection: Self::new(parent),
            positions: Vec::new(),
        };
        let mut enter = EnterSelection {
            parent,
            data: Vec::new(),
            positions: Vec::new(),
        };

        for (position, datum) in data.into_iter().enumerate() {
            match index_by_key.get(&key(&datum)).copied() {
                Some(index) if index < nodes.len() && !claimed[index] => {
                    claimed[index] = true;
                    update.selection.nodes.push(nodes[index]);
                    update.selection.data.push(datum);
                    update.positions.push(position);
                }
                _ => {
                    enter.data.push(datum);
                    enter.positions.push(position);
                }
            }
        }

        let exit_nodes = nodes
            .into_iter()
            .zip(claimed)
            .filter_map(|(node, claimed)| (!claimed).then_some(node))
            .collect::<Vec<_>>();

        trace!(
            update = update.len(),
            enter = enter.len(),
            exit = exit_nodes.len(),
            "keyed data join"
        );

        DataJoin {
            update,
            enter,
            exit: ExitSelection {
                parent,
                nodes: exit_nodes,
            },
        }
    }

    /// Appends one new child to every selected node, built from its datum.
    pub fn append_child<F>(&self, scene: &mut Scene, mut make: F) -> ChartResult<Vec<NodeId>>
    where
        F: FnMut(&D) -> NodeKind,
    {
        self.iter()
            .map(|(node, datum)| scene.create_child(node, make(datum)))
            .collect()
    }

    /// Children of the selected nodes having `class`, each paired with the
    /// datum of its parent so data order is preserved.
    #[must_use]
    pub fn select_by_class<'s>(&'s self, scene: &Scene, class: NodeClass) -> SubSelection<'s, D> {
        let mut entries = SmallVec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            for child in scene.children(*node) {
                if scene.node(*child).is_some_and(|child| child.class() == class) {
                    entries.push((*child, index));
                }
            }
        }
        SubSelection {
            entries,
            data: &self.data,
        }
    }

    /// Visits every selected node with its datum and index.
    pub fn each<F>(&self, scene: &mut Scene, mut visit: F) -> ChartResult<()>
    where
        F: FnMut(&mut Node, &D, usize),
    {
        for (index, (node, datum)) in self.iter().enumerate() {
            visit(scene.get_mut(node)?, datum, index);
        }
        Ok(())
    }

    /// Re-appends the selected nodes so their draw order follows data order.
    pub fn order(&self, scene: &mut Scene) -> ChartResult<()> {
        for node in &self.nodes {
            scene.append(self.parent, *node)?;
        }
        Ok(())
    }

    /// Removes every bound node and empties the selection.
    pub fn clear(self, scene: &mut Scene) -> ChartResult<Self> {
        let parent = self.parent;
        let DataJoin { exit, .. } = self.join(Vec::new());
        exit.remove(scene)?;
        Ok(Self::new(parent))
    }
}

/// Result of a join. Both `enter` and `exit` must be resolved by the caller.
#[derive(Debug)]
#[must_use = "resolve the enter and exit sets of a data join"]
pub struct DataJoin<D> {
    pub update: BoundSelection<D>,
    pub enter: EnterSelection<D>,
    pub exit: ExitSelection,
}

/// Nodes bound during a join, remembering where each sits in the new data.
#[derive(Debug)]
pub struct BoundSelection<D> {
    selection: Selection<D>,
    positions: Vec<usize>,
}

impl<D> BoundSelection<D> {
    #[must_use]
    pub fn selection(&self) -> &Selection<D> {
        &self.selection
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        self.selection.nodes()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn append_child<F>(&self, scene: &mut Scene, make: F) -> ChartResult<Vec<NodeId>>
    where
        F: FnMut(&D) -> NodeKind,
    {
        self.selection.append_child(scene, make)
    }

    pub fn each<F>(&self, scene: &mut Scene, visit: F) -> ChartResult<()>
    where
        F: FnMut(&mut Node, &D, usize),
    {
        self.selection.each(scene, visit)
    }

    /// Combines the update set with the appended enter set of the same join
    /// into one selection in data order.
    #[must_use]
    pub fn merge(self, entered: BoundSelection<D>) -> Selection<D> {
        let parent = self.selection.parent;
        let bound = self.positions.len();
        let contiguous = self
            .positions
            .iter()
            .enumerate()
            .all(|(index, position)| index == *position)
            && entered
                .positions
                .iter()
                .enumerate()
                .all(|(index, position)| bound + index == *position);

        if contiguous {
            let mut nodes = self.selection.nodes;
            let mut data = self.selection.data;
            nodes.extend(entered.selection.nodes);
            data.extend(entered.selection.data);
            return Selection {
                parent,
                nodes,
                data,
            };
        }

        let total = bound + entered.positions.len();
        let mut slots: Vec<Option<(NodeId, D)>> = (0..total).map(|_| None).collect();
        for part in [self, entered] {
            let BoundSelection {
                selection,
                positions,
            } = part;
            for ((node, datum), position) in
                selection.nodes.into_iter().zip(selection.data).zip(positions)
            {
                if let Some(slot) = slots.get_mut(position) {
                    *slot = Some((node, datum));
                }
            }
        }
        let (nodes, data): (Vec<NodeId>, Vec<D>) = slots.into_iter().flatten().unzip();
        Selection {
            parent,
            nodes,
            data,
        }
    }
}

/// Data items waiting for nodes.
#[derive(Debug)]
pub struct EnterSelection<D> {
    parent: NodeId,
    data: Vec<D>,
    positions: Vec<usize>,
}

impl<D> EnterSelection<D> {
    #[must_use]
    pub fn data(&self) -> &[D] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Creates one node per item under the selection parent.
    pub fn append<F>(self, scene: &mut Scene, mut make: F) -> ChartResult<BoundSelection<D>>
    where
        F: FnMut(&D) -> NodeKind,
    {
        let mut nodes = Vec::with_capacity(self.data.len());
        for datum in &self.data {
            nodes.push(scene.create_child(self.parent, make(datum))?);
        }
        Ok(BoundSelection {
            selection: Selection {
                parent: self.parent,
                nodes,
                data: self.data,
            },
            positions: self.positions,
        })
    }
}

/// Nodes whose data went away.
#[derive(Debug)]
#[must_use = "exit nodes stay in the tree until removed"]
pub struct ExitSelection {
    parent: NodeId,
    nodes: Vec<NodeId>,
}

impl ExitSelection {
    #[must_use]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every exit node (and its subtree) from the scene.
    pub fn remove(self, scene: &mut Scene) -> ChartResult<usize> {
        for node in &self.nodes {
            scene.remove(*node)?;
        }
        Ok(self.nodes.len())
    }
}

/// Children picked out of a selection by class, still indexed by the
/// datum of their parent.
#[derive(Debug)]
pub struct SubSelection<'s, D> {
    entries: SmallVec<[(NodeId, usize); 8]>,
    data: &'s [D],
}

impl<D> SubSelection<'_, D> {
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(node, _)| *node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn each<F>(&self, scene: &mut Scene, mut visit: F) -> ChartResult<()>
    where
        F: FnMut(&mut Node, &D, usize),
    {
        for (node, index) in &self.entries {
            if let Some(datum) = self.data.get(*index) {
                visit(scene.get_mut(*node)?, datum, *index);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DataJoin, Selection};
    use crate::scene::node::{MarkerNode, NodeClass, NodeKind};
    use crate::scene::scene_graph::Scene;

    fn bind(scene: &mut Scene, selection: Selection<i32>, data: Vec<i32>) -> Selection<i32> {
        let DataJoin { update, enter, exit } = selection.join(data);
        exit.remove(scene).expect("remove exit");
        let entered = enter.append(scene, |_| NodeKind::Group).expect("enter");
        update.merge(entered)
    }

    #[test]
    fn positional_join_partitions_by_length() {
        let mut scene = Scene::new();
        let root = scene.root();
        let selection = bind(&mut scene, Selection::new(root), vec![1, 2, 3, 4]);

        let DataJoin { update, enter, exit } = selection.join(vec![10, 20]);
        assert_eq!(update.len(), 2);
        assert!(enter.is_empty());
        assert_eq!(exit.len(), 2);
        assert_eq!(exit.remove(&mut scene).expect("remove"), 2);
        let merged = update.merge(enter.append(&mut scene, |_| NodeKind::Group).expect("enter"));
        assert_eq!(merged.data(), &[10, 20]);
        assert_eq!(scene.children(root).len(), 2);
    }

    #[test]
    fn keyed_join_follows_identity_under_reordering() {
        let mut scene = Scene::new();
        let root = scene.root();
        let selection = bind(&mut scene, Selection::new(root), vec![1, 2, 3]);
        let node_of_3 = selection.nodes()[2];
        let node_of_1 = selection.nodes()[0];

        let DataJoin { update, enter, exit } = selection.join_keyed(vec![3, 4, 1], |d| *d);
        assert_eq!(update.len(), 2);
        assert_eq!(enter.data(), &[4]);
        assert_eq!(exit.len(), 1);
        exit.remove(&mut scene).expect("remove");
        let merged = update.merge(enter.append(&mut scene, |_| NodeKind::Group).expect("enter"));

        assert_eq!(merged.data(), &[3, 4, 1]);
        assert_eq!(merged.nodes()[0], node_of_3);
        assert_eq!(merged.nodes()[2], node_of_1);
    }

    #[test]
    fn sub_selection_keeps_parent_datum() {
        let mut scene = Scene::new();
        let root = scene.root();
        let groups = bind(&mut scene, Selection::new(root), vec![7, 8]);
        groups
            .append_child(&mut scene, |_| NodeKind::Marker(MarkerNode::default()))
            .expect("markers");

        let markers = groups.select_by_class(&scene, NodeClass::Marker);
        assert_eq!(markers.len(), 2);
        let mut seen = Vec::new();
        markers
            .each(&mut scene, |node, datum, _| {
                node.translation_x = f64::from(*datum);
                seen.push(*datum);
            })
            .expect("each");
        assert_eq!(seen, vec![7, 8]);
        assert!(groups.select_by_class(&scene, NodeClass::Path).is_empty());
    }

    #[test]
    fn clear_removes_every_node() {
        let mut scene = Scene::new();
        let root = scene.root();
        let selection = bind(&mut scene, Selection::new(root), vec![1, 2]);
        let cleared = selection.clear(&mut scene).expect("clear");
        assert!(cleared.is_empty());
        assert!(scene.children(root).is_empty());
    }
}
