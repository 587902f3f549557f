use std::collections::HashMap;

use chart_scene::scene::{
    DataJoin, MarkerNode, NodeClass, NodeId, NodeKind, Scene, Selection,
};
use proptest::prelude::*;

fn marker() -> NodeKind {
    NodeKind::Marker(MarkerNode {
        size: 4.0,
        ..MarkerNode::default()
    })
}

/// Joins `data` positionally, resolving enter and exit the way a series does.
fn rejoin(scene: &mut Scene, selection: Selection<u32>, data: Vec<u32>) -> Selection<u32> {
    let DataJoin {
        update,
        enter,
        exit,
    } = selection.join(data);
    exit.remove(scene).expect("exit");
    let entered = enter.append(scene, |_| NodeKind::Group).expect("enter");
    entered.append_child(scene, |_| marker()).expect("markers");
    update.merge(entered)
}

#[test]
fn growth_appends_without_touching_existing_nodes() {
    let mut scene = Scene::new();
    let parent = scene.root();
    let first = rejoin(&mut scene, Selection::new(parent), vec![1, 2, 3]);
    let before = first.nodes().to_vec();

    let second = rejoin(&mut scene, first, vec![1, 2, 3, 4]);
    assert_eq!(&second.nodes()[..3], before.as_slice());
    assert_eq!(second.len(), 4);
    assert_eq!(second.data(), &[1, 2, 3, 4]);
    assert_eq!(scene.children(parent), second.nodes());
}

#[test]
fn shrink_releases_surplus_subtrees() {
    let mut scene = Scene::new();
    let parent = scene.root();
    let first = rejoin(&mut scene, Selection::new(parent), vec![1, 2, 3, 4]);
    let removed: Vec<NodeId> = first.nodes()[2..].to_vec();
    let removed_markers: Vec<NodeId> = removed
        .iter()
        .flat_map(|group| scene.children(*group).to_vec())
        .collect();

    let second = rejoin(&mut scene, first, vec![7, 8]);
    assert_eq!(second.len(), 2);
    for node in removed.iter().chain(&removed_markers) {
        assert!(!scene.contains(*node));
    }
    // root + 2 groups + 2 markers
    assert_eq!(scene.len(), 5);
}

#[test]
fn sub_selection_pairs_children_with_parent_datum() {
    let mut scene = Scene::new();
    let root = scene.root();
    let selection = rejoin(&mut scene, Selection::new(root), vec![10, 20]);

    let markers = selection.select_by_class(&scene, NodeClass::Marker);
    assert_eq!(markers.len(), 2);
    markers
        .each(&mut scene, |node, datum, _| {
            node.translation_x = f64::from(*datum);
        })
        .expect("each");

    let xs: Vec<f64> = selection
        .select_by_class(&scene, NodeClass::Marker)
        .nodes()
        .map(|node| scene.get(node).expect("marker").translation_x)
        .collect();
    assert_eq!(xs, [10.0, 20.0]);
    assert!(selection.select_by_class(&scene, NodeClass::Path).is_empty());
}

#[test]
fn keyed_join_follows_identity_across_reorder() {
    let mut scene = Scene::new();
    let parent = scene.root();
    let DataJoin { update, enter, exit } = Selection::new(parent).join_keyed(vec![1, 2, 3], |d| *d);
    let _ = exit.remove(&mut scene).expect("exit");
    let selection = update.merge(enter.append(&mut scene, |_| marker()).expect("enter"));
    let by_key: HashMap<u32, NodeId> = selection.iter().map(|(node, d)| (*d, node)).collect();

    let DataJoin { update, enter, exit } = selection.join_keyed(vec![3, 1, 5], |d| *d);
    assert_eq!(exit.nodes(), &[by_key[&2]]);
    assert_eq!(enter.data(), &[5]);
    let _ = exit.remove(&mut scene).expect("exit");
    let merged = update.merge(enter.append(&mut scene, |_| marker()).expect("enter"));
    merged.order(&mut scene).expect("order");

    assert_eq!(merged.data(), &[3, 1, 5]);
    assert_eq!(merged.nodes()[0], by_key[&3]);
    assert_eq!(merged.nodes()[1], by_key[&1]);
    assert_eq!(scene.children(parent), merged.nodes());
}

#[test]
fn clear_removes_everything_it_bound() {
    let mut scene = Scene::new();
    let root = scene.root();
    let selection = rejoin(&mut scene, Selection::new(root), vec![1, 2]);
    let cleared = selection.clear(&mut scene).expect("clear");
    assert!(cleared.is_empty());
    assert_eq!(scene.len(), 1);
}

proptest! {
    #[test]
    fn positional_join_preserves_common_prefix(
        first in prop::collection::vec(any::<u32>(), 0..48),
        second in prop::collection::vec(any::<u32>(), 0..48)
    ) {
        let mut scene = Scene::new();
        let parent = scene.root();
        let initial = rejoin(&mut scene, Selection::new(parent), first.clone());
        let before = initial.nodes().to_vec();

        let next = rejoin(&mut scene, initial, second.clone());
        let kept = first.len().min(second.len());

        prop_assert_eq!(&next.nodes()[..kept], &before[..kept]);
        prop_assert_eq!(next.data(), second.as_slice());
        prop_assert_eq!(scene.children(parent), next.nodes());
        prop_assert_eq!(scene.len(), 1 + 2 * second.len());
        for node in &before[kept..] {
            prop_assert!(!scene.contains(*node));
        }
    }

    #[test]
    fn keyed_join_keeps_nodes_of_surviving_keys(
        first in prop::collection::hash_set(0u16..64, 0..32),
        second in prop::collection::hash_set(0u16..64, 0..32)
    ) {
        let first: Vec<u16> = first.into_iter().collect();
        let second: Vec<u16> = second.into_iter().collect();
        let mut scene = Scene::new();
        let parent = scene.root();

        let DataJoin { update, enter, exit } = Selection::new(parent).join_keyed(first, |d| *d);
        let _ = exit.remove(&mut scene).expect("exit");
        let initial = update.merge(enter.append(&mut scene, |_| marker()).expect("enter"));
        let before: HashMap<u16, NodeId> = initial.iter().map(|(node, d)| (*d, node)).collect();

        let DataJoin { update, enter, exit } = initial.join_keyed(second.clone(), |d| *d);
        let _ = exit.remove(&mut scene).expect("exit");
        let next = update.merge(enter.append(&mut scene, |_| marker()).expect("enter"));

        prop_assert_eq!(next.data(), second.as_slice());
        for (node, datum) in next.iter() {
            if let Some(previous) = before.get(datum) {
                prop_assert_eq!(node, *previous);
            }
        }
        prop_assert_eq!(scene.len(), 1 + second.len());
    }
}
