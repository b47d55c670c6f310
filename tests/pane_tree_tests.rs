//! Structural invariants of the pane tree across multi-step scenarios.

use workdeck::pane::{EdgePosition, PaneNode, SplitDirection};
use workdeck::tab::Tab;
use workdeck::workspace::WorkspaceStore;

fn assert_sizes_sum_to_100(root: &PaneNode) {
    root.for_each(&mut |node| {
        if let PaneNode::Split {
            children, sizes, ..
        } = node
        {
            assert_eq!(children.len(), sizes.len());
            assert!(children.len() >= 2, "split with fewer than two children");
            let total: f64 = sizes.iter().sum();
            assert!((total - 100.0).abs() < 1e-6, "sizes sum to {total}");
        }
    });
}

#[test]
fn nested_splits_build_the_expected_shape() {
    let mut store = WorkspaceStore::new();
    let first = store.active_pane_id().clone();
    store.add_tab_to_pane(&first, Tab::terminal("t1"));

    // Split right, then split the new pane downward: a vertical split nested
    // inside a horizontal one.
    store.split_pane(&first, Tab::terminal("t2"), EdgePosition::Right);
    let second = store.active_pane_id().clone();
    store.split_pane(&second, Tab::terminal("t3"), EdgePosition::Bottom);

    match store.root() {
        PaneNode::Split {
            direction,
            children,
            ..
        } => {
            assert_eq!(*direction, SplitDirection::Horizontal);
            assert_eq!(children.len(), 2);
            match &children[1] {
                PaneNode::Split { direction, .. } => {
                    assert_eq!(*direction, SplitDirection::Vertical)
                }
                PaneNode::Leaf { .. } => panic!("expected nested split"),
            }
        }
        PaneNode::Leaf { .. } => panic!("expected split at root"),
    }
    assert_eq!(store.root().leaf_count(), 3);
    assert_sizes_sum_to_100(store.root());
}

#[test]
fn same_axis_split_inserts_a_sibling_instead_of_nesting() {
    let mut store = WorkspaceStore::new();
    let first = store.active_pane_id().clone();
    store.add_tab_to_pane(&first, Tab::terminal("t1"));
    store.split_pane(&first, Tab::terminal("t2"), EdgePosition::Right);
    let second = store.active_pane_id().clone();
    store.split_pane(&second, Tab::terminal("t3"), EdgePosition::Right);

    match store.root() {
        PaneNode::Split {
            direction,
            children,
            ..
        } => {
            assert_eq!(*direction, SplitDirection::Horizontal);
            assert_eq!(children.len(), 3, "same-axis split should widen the split");
            assert!(children.iter().all(PaneNode::is_leaf));
        }
        PaneNode::Leaf { .. } => panic!("expected split at root"),
    }
    assert_sizes_sum_to_100(store.root());
}

#[test]
fn draining_panes_collapses_back_to_a_single_leaf() {
    let mut store = WorkspaceStore::new();
    let first = store.active_pane_id().clone();
    let t1 = Tab::terminal("t1");
    let t2 = Tab::terminal("t2");
    let t3 = Tab::terminal("t3");
    store.add_tab_to_pane(&first, t1.clone());
    store.split_pane(&first, t2.clone(), EdgePosition::Right);
    let second = store.active_pane_id().clone();
    store.split_pane(&second, t3.clone(), EdgePosition::Bottom);
    assert_eq!(store.root().leaf_count(), 3);

    store.remove_tab(t3.id());
    assert_eq!(store.root().leaf_count(), 2);
    assert_sizes_sum_to_100(store.root());

    store.remove_tab(t2.id());
    assert!(store.root().is_leaf());
    assert_eq!(store.root().id(), &first);
    assert_eq!(store.active_pane_id(), &first);

    // Removing the last tab leaves the single empty pane, never zero panes
    store.remove_tab(t1.id());
    assert!(store.root().is_leaf());
    assert!(store.root().tabs_of(store.active_pane_id()).unwrap().is_empty());
}

#[test]
fn moving_the_last_tab_out_prunes_the_source_pane() {
    let mut store = WorkspaceStore::new();
    let first = store.active_pane_id().clone();
    let t1 = Tab::terminal("t1");
    let t2 = Tab::terminal("t2");
    store.add_tab_to_pane(&first, t1.clone());
    store.split_pane(&first, t2.clone(), EdgePosition::Right);
    let second = store.active_pane_id().clone();

    store.move_tab_to_pane(t2.id(), &second, &first);

    assert!(store.root().is_leaf());
    assert_eq!(store.root().id(), &first);
    let tabs = store.root().tabs_of(&first).unwrap();
    assert_eq!(tabs.len(), 2);
    // The moved tab appends and becomes active in the target
    assert_eq!(tabs[1].id(), t2.id());
    assert_eq!(store.root().active_tab_of(&first), Some(t2.id()));
    assert_eq!(store.active_pane_id(), &first);
}

#[test]
fn move_to_new_split_against_an_edge() {
    let mut store = WorkspaceStore::new();
    let first = store.active_pane_id().clone();
    let t1 = Tab::terminal("t1");
    let t2 = Tab::terminal("t2");
    store.add_tab_to_pane(&first, t1.clone());
    store.add_tab_to_pane(&first, t2.clone());

    store.move_tab_to_new_split(t2.id(), &first, &first, EdgePosition::Top);

    match store.root() {
        PaneNode::Split {
            direction,
            children,
            ..
        } => {
            assert_eq!(*direction, SplitDirection::Vertical);
            // Top edge: the new pane leads
            assert_eq!(children[0].tabs_of(children[0].id()).unwrap()[0].id(), t2.id());
            assert_eq!(children[1].id(), &first);
        }
        PaneNode::Leaf { .. } => panic!("expected split"),
    }
    assert_ne!(store.active_pane_id(), &first);
    assert_sizes_sum_to_100(store.root());
}

#[test]
fn active_tab_reassigns_to_the_following_tab_on_removal() {
    let mut store = WorkspaceStore::new();
    let pane = store.active_pane_id().clone();
    let t1 = Tab::terminal("t1");
    let t2 = Tab::terminal("t2");
    let t3 = Tab::terminal("t3");
    store.add_tab_to_pane(&pane, t1.clone());
    store.add_tab_to_pane(&pane, t2.clone());
    store.add_tab_to_pane(&pane, t3.clone());
    store.set_active_tab(&pane, t2.id());

    store.remove_tab(t2.id());
    assert_eq!(store.root().active_tab_of(&pane), Some(t3.id()));

    store.remove_tab(t3.id());
    assert_eq!(store.root().active_tab_of(&pane), Some(t1.id()));
}

#[test]
fn reorder_accepts_only_exact_permutations() {
    let mut store = WorkspaceStore::new();
    let pane = store.active_pane_id().clone();
    let t1 = Tab::terminal("t1");
    let t2 = Tab::terminal("t2");
    store.add_tab_to_pane(&pane, t1.clone());
    store.add_tab_to_pane(&pane, t2.clone());

    store.reorder_tabs(&pane, &[t2.id().clone(), t1.id().clone()]);
    let tabs = store.root().tabs_of(&pane).unwrap();
    assert_eq!(tabs[0].id(), t2.id());

    // A list that is not a permutation of the pane's tabs is ignored
    store.reorder_tabs(&pane, &[t1.id().clone()]);
    let tabs = store.root().tabs_of(&pane).unwrap();
    assert_eq!(tabs[0].id(), t2.id());
}

#[test]
fn pane_ids_are_never_reused_within_a_store() {
    let mut store = WorkspaceStore::new();
    let first = store.active_pane_id().clone();
    let t1 = Tab::terminal("t1");
    let t2 = Tab::terminal("t2");
    store.add_tab_to_pane(&first, t1);
    store.split_pane(&first, t2.clone(), EdgePosition::Right);
    let second = store.active_pane_id().clone();

    store.remove_tab(t2.id());
    store.split_pane(&first, Tab::terminal("t3"), EdgePosition::Right);
    let third = store.active_pane_id().clone();
    assert_ne!(third, second);
}
