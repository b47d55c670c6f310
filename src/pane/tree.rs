//! Pure mutation algorithms for the pane tree
//!
//! Every operation takes the current root by value and returns a new root
//! plus enough information for the caller to know whether anything changed.
//! Nothing here mutates shared state; the workspace store is the only caller
//! and owns the single mutable tree.
//!
//! Structural operations end with [`normalize`], the invariant-restoring
//! pass: empty leaves inside splits are pruned, splits with one surviving
//! child collapse into that child (the survivor is promoted unchanged), and
//! sizes are renormalized proportionally to sum to 100. A tree can never end
//! up with zero panes; a fresh empty leaf is substituted instead.

use super::types::{EdgePosition, IdGen, PaneId, PaneNode};
use crate::tab::{Tab, TabId};

/// Split the leaf `target`, placing `tab` in a new leaf on the `edge` side.
///
/// If the target's parent split already runs along `edge.axis()`, the new
/// leaf is inserted as an adjacent sibling and the target's size is halved
/// between the two. Otherwise the target is replaced by a new 2-child split
/// with sizes `[50, 50]`.
///
/// Returns the new root and the id of the created leaf, or `None` when the
/// target leaf does not exist (tree unchanged).
pub fn split(
    root: PaneNode,
    target: &PaneId,
    tab: Tab,
    edge: EdgePosition,
    ids: &mut IdGen,
) -> (PaneNode, Option<PaneId>) {
    let new_leaf = PaneNode::leaf_with_tab(ids.pane_id(), tab);
    let new_id = new_leaf.id().clone();
    let (root, leftover) = insert_split(root, target, edge, Some(new_leaf), ids);
    if leftover.is_some() {
        log::debug!("split: target pane {target} not found; tree unchanged");
        return (root, None);
    }
    log::debug!("split: pane {target} {edge:?} -> new pane {new_id}");
    (normalize(root, ids), Some(new_id))
}

/// Move a tab from `source` to the end of `target`'s tab list and make it
/// the target's active tab. A drained source leaf is pruned, which is how a
/// pane closes when its last tab is dragged away.
///
/// Returns the new root and whether the move happened.
pub fn move_tab_to_pane(
    root: PaneNode,
    tab_id: &TabId,
    source: &PaneId,
    target: &PaneId,
    ids: &mut IdGen,
) -> (PaneNode, bool) {
    let (root, detached) = detach(root, Some(source), tab_id);
    let Some(detached) = detached else {
        log::debug!("move_tab_to_pane: tab {tab_id} not in pane {source}; no-op");
        return (root, false);
    };
    let (root, leftover) = attach_tab(root, target, Some(detached.tab));
    if let Some(tab) = leftover {
        // Target leaf vanished between gesture and dispatch. Put the tab
        // back at its original slot so the tree is byte-identical to the
        // pre-call state; a false return means no notification fires.
        log::warn!("move_tab_to_pane: target pane {target} not found; restoring tab to {source}");
        let root = reinsert_tab(root, source, tab, detached.index, detached.was_active);
        return (root, false);
    }
    log::debug!("move_tab_to_pane: {tab_id} {source} -> {target}");
    (normalize(root, ids), true)
}

/// Move a tab out of `source` into a new split created against `edge` of
/// `target`. The existing `Tab` value is carried over, so its identity is
/// preserved across the move.
///
/// Returns the new root and the id of the created leaf, or `None` if either
/// pane was missing (tree left semantically unchanged).
pub fn move_tab_to_new_split(
    root: PaneNode,
    tab_id: &TabId,
    source: &PaneId,
    target: &PaneId,
    edge: EdgePosition,
    ids: &mut IdGen,
) -> (PaneNode, Option<PaneId>) {
    let (root, detached) = detach(root, Some(source), tab_id);
    let Some(detached) = detached else {
        log::debug!("move_tab_to_new_split: tab {tab_id} not in pane {source}; no-op");
        return (root, None);
    };
    let new_leaf = PaneNode::leaf_with_tab(ids.pane_id(), detached.tab);
    let new_id = new_leaf.id().clone();
    let (root, leftover) = insert_split(root, target, edge, Some(new_leaf), ids);
    if let Some(PaneNode::Leaf { mut tabs, .. }) = leftover {
        log::warn!(
            "move_tab_to_new_split: target pane {target} not found; restoring tab to {source}"
        );
        let Some(tab) = tabs.pop() else {
            return (normalize(root, ids), None);
        };
        let root = reinsert_tab(root, source, tab, detached.index, detached.was_active);
        return (root, None);
    }
    log::debug!("move_tab_to_new_split: {tab_id} {source} -> {edge:?} of {target} (new pane {new_id})");
    (normalize(root, ids), Some(new_id))
}

/// Append a tab to a leaf and make it active. If the leaf already holds a
/// tab with the same id, the existing tab is re-activated instead (a leaf
/// never holds two tabs with one id).
pub fn add_tab_to_pane(root: PaneNode, target: &PaneId, tab: Tab) -> (PaneNode, bool) {
    let (root, leftover) = attach_tab(root, target, Some(tab));
    if leftover.is_some() {
        log::debug!("add_tab_to_pane: pane {target} not found; no-op");
        return (root, false);
    }
    (root, true)
}

/// Remove a tab from the first pre-order leaf holding it, pruning the leaf
/// if it drains.
pub fn remove_tab(root: PaneNode, tab_id: &TabId, ids: &mut IdGen) -> (PaneNode, bool) {
    let (root, detached) = detach(root, None, tab_id);
    match detached {
        Some(_) => (normalize(root, ids), true),
        None => {
            log::debug!("remove_tab: tab {tab_id} not found; no-op");
            (root, false)
        }
    }
}

/// Replace a leaf's tab order with the given permutation. A permutation
/// whose id multiset does not match the existing tabs is rejected as a
/// no-op (caller bug, not a user-facing condition).
pub fn reorder_tabs(root: PaneNode, target: &PaneId, order: &[TabId]) -> (PaneNode, bool) {
    match root {
        PaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
        } => {
            if &id != target {
                return (
                    PaneNode::Leaf {
                        id,
                        tabs,
                        active_tab_id,
                    },
                    false,
                );
            }
            let mut have: Vec<&TabId> = tabs.iter().map(Tab::id).collect();
            let mut want: Vec<&TabId> = order.iter().collect();
            have.sort();
            want.sort();
            if have != want {
                log::debug!("reorder_tabs: permutation does not match tabs of {id}; no-op");
                return (
                    PaneNode::Leaf {
                        id,
                        tabs,
                        active_tab_id,
                    },
                    false,
                );
            }
            let mut remaining = tabs;
            let mut reordered = Vec::with_capacity(order.len());
            for tab_id in order {
                if let Some(ix) = remaining.iter().position(|t| t.id() == tab_id) {
                    reordered.push(remaining.remove(ix));
                }
            }
            (
                PaneNode::Leaf {
                    id,
                    tabs: reordered,
                    active_tab_id,
                },
                true,
            )
        }
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => {
            let mut changed = false;
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                if changed {
                    out.push(child);
                } else {
                    let (child, did) = reorder_tabs(child, target, order);
                    changed = did;
                    out.push(child);
                }
            }
            (
                PaneNode::Split {
                    id,
                    direction,
                    children: out,
                    sizes,
                },
                changed,
            )
        }
    }
}

/// Replace a split's sizes. Rejects (no-op) a size list of the wrong length
/// or containing non-positive or non-finite values.
pub fn update_sizes(root: PaneNode, split_id: &PaneId, sizes: &[f64]) -> (PaneNode, bool) {
    match root {
        leaf @ PaneNode::Leaf { .. } => (leaf, false),
        PaneNode::Split {
            id,
            direction,
            children,
            sizes: old_sizes,
        } => {
            if &id == split_id {
                if sizes.len() == children.len()
                    && sizes.iter().all(|s| s.is_finite() && *s > 0.0)
                {
                    return (
                        PaneNode::Split {
                            id,
                            direction,
                            children,
                            sizes: sizes.to_vec(),
                        },
                        true,
                    );
                }
                log::debug!("update_sizes: invalid sizes for split {id}; no-op");
                return (
                    PaneNode::Split {
                        id,
                        direction,
                        children,
                        sizes: old_sizes,
                    },
                    false,
                );
            }
            let mut changed = false;
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                if changed {
                    out.push(child);
                } else {
                    let (child, did) = update_sizes(child, split_id, sizes);
                    changed = did;
                    out.push(child);
                }
            }
            (
                PaneNode::Split {
                    id,
                    direction,
                    children: out,
                    sizes: old_sizes,
                },
                changed,
            )
        }
    }
}

/// Invariant-restoring pass run after every structural mutation.
pub fn normalize(root: PaneNode, ids: &mut IdGen) -> PaneNode {
    match normalize_node(root) {
        Some(node) => node,
        // The whole tree drained; the workspace always shows one pane.
        None => PaneNode::empty_leaf(ids.pane_id()),
    }
}

fn normalize_node(node: PaneNode) -> Option<PaneNode> {
    match node {
        PaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
        } => {
            if tabs.is_empty() {
                return None;
            }
            let active_tab_id = active_tab_id
                .filter(|a| tabs.iter().any(|t| t.id() == a))
                .or_else(|| Some(tabs[0].id().clone()));
            Some(PaneNode::Leaf {
                id,
                tabs,
                active_tab_id,
            })
        }
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => {
            let mut kept: Vec<(PaneNode, f64)> = Vec::with_capacity(children.len());
            for (ix, child) in children.into_iter().enumerate() {
                let size = sizes
                    .get(ix)
                    .copied()
                    .filter(|s| s.is_finite() && *s > 0.0)
                    .unwrap_or(1.0);
                if let Some(node) = normalize_node(child) {
                    kept.push((node, size));
                }
            }
            match kept.len() {
                0 => None,
                // Promote the surviving child unchanged; its id is the one
                // that remains.
                1 => Some(kept.remove(0).0),
                _ => {
                    let total: f64 = kept.iter().map(|(_, s)| s).sum();
                    let (children, sizes) = kept
                        .into_iter()
                        .map(|(c, s)| (c, s * 100.0 / total))
                        .unzip();
                    Some(PaneNode::Split {
                        id,
                        direction,
                        children,
                        sizes,
                    })
                }
            }
        }
    }
}

/// A tab pulled out of its leaf, with enough context to undo the removal.
struct Detached {
    tab: Tab,
    index: usize,
    was_active: bool,
}

/// Remove a tab, returning it with its former position. `source` restricts
/// the search to one leaf; `None` takes the first pre-order match. The
/// leaf's active tab moves to the tab immediately following, or preceding
/// if the removed tab was last, or none if it was the only tab.
fn detach(node: PaneNode, source: Option<&PaneId>, tab_id: &TabId) -> (PaneNode, Option<Detached>) {
    match node {
        PaneNode::Leaf {
            id,
            mut tabs,
            mut active_tab_id,
        } => {
            let in_scope = source.is_none_or(|s| s == &id);
            if in_scope {
                if let Some(ix) = tabs.iter().position(|t| t.id() == tab_id) {
                    let tab = tabs.remove(ix);
                    let was_active = active_tab_id.as_ref() == Some(tab_id);
                    if was_active {
                        active_tab_id = next_active(&tabs, ix);
                    }
                    return (
                        PaneNode::Leaf {
                            id,
                            tabs,
                            active_tab_id,
                        },
                        Some(Detached {
                            tab,
                            index: ix,
                            was_active,
                        }),
                    );
                }
            }
            (
                PaneNode::Leaf {
                    id,
                    tabs,
                    active_tab_id,
                },
                None,
            )
        }
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => {
            let mut found = None;
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                if found.is_some() {
                    out.push(child);
                } else {
                    let (child, tab) = detach(child, source, tab_id);
                    found = tab;
                    out.push(child);
                }
            }
            (
                PaneNode::Split {
                    id,
                    direction,
                    children: out,
                    sizes,
                },
                found,
            )
        }
    }
}

fn next_active(tabs: &[Tab], removed_ix: usize) -> Option<TabId> {
    if tabs.is_empty() {
        None
    } else if removed_ix < tabs.len() {
        Some(tabs[removed_ix].id().clone())
    } else {
        Some(tabs[removed_ix - 1].id().clone())
    }
}

/// Append a tab to the target leaf, threading it back out if the leaf does
/// not exist in this subtree.
fn attach_tab(node: PaneNode, target: &PaneId, tab: Option<Tab>) -> (PaneNode, Option<Tab>) {
    match node {
        PaneNode::Leaf {
            id,
            mut tabs,
            mut active_tab_id,
        } => {
            if &id == target {
                if let Some(tab) = tab {
                    active_tab_id = Some(tab.id().clone());
                    if !tabs.iter().any(|t| t.id() == tab.id()) {
                        tabs.push(tab);
                    }
                    return (
                        PaneNode::Leaf {
                            id,
                            tabs,
                            active_tab_id,
                        },
                        None,
                    );
                }
            }
            (
                PaneNode::Leaf {
                    id,
                    tabs,
                    active_tab_id,
                },
                tab,
            )
        }
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => {
            let mut pending = tab;
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                if pending.is_none() {
                    out.push(child);
                } else {
                    let (child, rest) = attach_tab(child, target, pending.take());
                    pending = rest;
                    out.push(child);
                }
            }
            (
                PaneNode::Split {
                    id,
                    direction,
                    children: out,
                    sizes,
                },
                pending,
            )
        }
    }
}

/// Undo a detach: put the tab back into `source` at its original index,
/// restoring the active pointer if the tab had been active. Leaves the tree
/// byte-identical to its pre-detach state.
fn reinsert_tab(
    node: PaneNode,
    source: &PaneId,
    tab: Tab,
    index: usize,
    was_active: bool,
) -> PaneNode {
    let (node, _) = reinsert_slot(node, source, Some((tab, index, was_active)));
    node
}

fn reinsert_slot(
    node: PaneNode,
    source: &PaneId,
    slot: Option<(Tab, usize, bool)>,
) -> (PaneNode, Option<(Tab, usize, bool)>) {
    match node {
        PaneNode::Leaf {
            id,
            mut tabs,
            mut active_tab_id,
        } => match slot {
            Some((tab, index, was_active)) if &id == source => {
                if was_active {
                    active_tab_id = Some(tab.id().clone());
                }
                tabs.insert(index.min(tabs.len()), tab);
                (
                    PaneNode::Leaf {
                        id,
                        tabs,
                        active_tab_id,
                    },
                    None,
                )
            }
            slot => (
                PaneNode::Leaf {
                    id,
                    tabs,
                    active_tab_id,
                },
                slot,
            ),
        },
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => {
            let mut pending = slot;
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                if pending.is_none() {
                    out.push(child);
                } else {
                    let (child, rest) = reinsert_slot(child, source, pending.take());
                    pending = rest;
                    out.push(child);
                }
            }
            (
                PaneNode::Split {
                    id,
                    direction,
                    children: out,
                    sizes,
                },
                pending,
            )
        }
    }
}

/// Insert `new_leaf` against `edge` of the leaf `target`. Threads the new
/// leaf back out when the target does not exist in this subtree.
fn insert_split(
    node: PaneNode,
    target: &PaneId,
    edge: EdgePosition,
    new_leaf: Option<PaneNode>,
    ids: &mut IdGen,
) -> (PaneNode, Option<PaneNode>) {
    match node {
        PaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
        } => {
            if &id == target && new_leaf.is_some() {
                let new_leaf = new_leaf.into_iter().next();
                let original = PaneNode::Leaf {
                    id,
                    tabs,
                    active_tab_id,
                };
                let mut children: Vec<PaneNode> = Vec::with_capacity(2);
                if edge.leading() {
                    children.extend(new_leaf);
                    children.push(original);
                } else {
                    children.push(original);
                    children.extend(new_leaf);
                }
                (
                    PaneNode::Split {
                        id: ids.pane_id(),
                        direction: edge.axis(),
                        children,
                        sizes: vec![50.0, 50.0],
                    },
                    None,
                )
            } else {
                (
                    PaneNode::Leaf {
                        id,
                        tabs,
                        active_tab_id,
                    },
                    new_leaf,
                )
            }
        }
        PaneNode::Split {
            id,
            direction,
            mut children,
            mut sizes,
        } => {
            let mut pending = new_leaf;
            // Same-axis parent: insert the new leaf as an adjacent sibling,
            // halving the target's share.
            if pending.is_some() && direction == edge.axis() {
                if let Some(ix) = children
                    .iter()
                    .position(|c| c.is_leaf() && c.id() == target)
                {
                    let new_leaf = pending.take();
                    let half = sizes[ix] / 2.0;
                    sizes[ix] = half;
                    let insert_at = if edge.leading() { ix } else { ix + 1 };
                    children.splice(insert_at..insert_at, new_leaf);
                    sizes.insert(insert_at, half);
                    return (
                        PaneNode::Split {
                            id,
                            direction,
                            children,
                            sizes,
                        },
                        None,
                    );
                }
            }
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                if pending.is_none() {
                    out.push(child);
                } else {
                    let (child, rest) = insert_split(child, target, edge, pending.take(), ids);
                    pending = rest;
                    out.push(child);
                }
            }
            (
                PaneNode::Split {
                    id,
                    direction,
                    children: out,
                    sizes,
                },
                pending,
            )
        }
    }
}
