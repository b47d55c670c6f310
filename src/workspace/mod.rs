//! Workspace store: the single mutable holder of the pane tree
//!
//! The store owns the current tree plus the active-pane pointer, exposes the
//! mutation API, and notifies subscribers synchronously after each mutation.
//! All UI surfaces read the tree reactively and write only through this API.
//!
//! A [`RestoreGuard`] marks a project-switch restore in progress so the
//! persistence subscription can suppress debounced writes while the tree is
//! being rebuilt from disk.

pub mod resize;

use crate::pane::tree;
use crate::pane::types::{EdgePosition, IdGen, PaneId, PaneNode};
use crate::tab::{Tab, TabId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Callback invoked synchronously after every store mutation.
pub type Subscriber = Box<dyn FnMut(&WorkspaceStore) + Send>;

/// Handle returned by [`WorkspaceStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Scoped token marking a restore in progress. While any guard is alive,
/// [`WorkspaceStore::is_restoring`] is true. Dropping the guard always
/// releases it, so nested or overlapping restores cannot leave the flag
/// stuck.
pub struct RestoreGuard {
    depth: Arc<AtomicUsize>,
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mutable holder of the pane tree and active-pane pointer.
///
/// Constructed once per window; tests instantiate independent stores.
pub struct WorkspaceStore {
    root: PaneNode,
    active_pane_id: PaneId,
    ids: IdGen,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: u64,
    restore_depth: Arc<AtomicUsize>,
}

/// Process-wide shared handle to a store.
pub type SharedWorkspaceStore = Arc<Mutex<WorkspaceStore>>;

/// Create a store behind the shared handle UI surfaces clone.
pub fn shared_store() -> SharedWorkspaceStore {
    Arc::new(Mutex::new(WorkspaceStore::new()))
}

impl WorkspaceStore {
    /// Create a store holding a single empty leaf.
    pub fn new() -> Self {
        let mut ids = IdGen::new();
        let root = PaneNode::empty_leaf(ids.pane_id());
        let active_pane_id = root.id().clone();
        Self {
            root,
            active_pane_id,
            ids,
            subscribers: Vec::new(),
            next_subscriber: 1,
            restore_depth: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn root(&self) -> &PaneNode {
        &self.root
    }

    pub fn active_pane_id(&self) -> &PaneId {
        &self.active_pane_id
    }

    /// Subscribe to mutations. The callback runs synchronously after every
    /// change, including atomic restores.
    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Begin a restore. Hold the returned guard for the duration of the
    /// rebuild; the persistence subscription checks [`Self::is_restoring`]
    /// and skips scheduling writes while it is set.
    pub fn begin_restore(&self) -> RestoreGuard {
        self.restore_depth.fetch_add(1, Ordering::SeqCst);
        RestoreGuard {
            depth: Arc::clone(&self.restore_depth),
        }
    }

    pub fn is_restoring(&self) -> bool {
        self.restore_depth.load(Ordering::SeqCst) > 0
    }

    // The tree ops take the root by value; swap in a throwaway leaf while
    // the new root is computed.
    fn take_root(&mut self) -> PaneNode {
        std::mem::replace(&mut self.root, PaneNode::empty_leaf(PaneId::from("detached")))
    }

    /// Split `pane_id`, placing `tab` in a new leaf on the `edge` side, and
    /// focus the new pane.
    pub fn split_pane(&mut self, pane_id: &PaneId, tab: Tab, edge: EdgePosition) {
        let root = self.take_root();
        let (root, new_id) = tree::split(root, pane_id, tab, edge, &mut self.ids);
        self.root = root;
        if let Some(new_id) = new_id {
            self.active_pane_id = new_id;
            self.after_mutation();
        }
    }

    /// Move a tab between leaves and focus the target pane.
    pub fn move_tab_to_pane(&mut self, tab_id: &TabId, source: &PaneId, target: &PaneId) {
        let root = self.take_root();
        let (root, moved) = tree::move_tab_to_pane(root, tab_id, source, target, &mut self.ids);
        self.root = root;
        if moved {
            self.active_pane_id = target.clone();
            self.after_mutation();
        }
    }

    /// Move a tab into a new split against `edge` of `target` and focus the
    /// new pane.
    pub fn move_tab_to_new_split(
        &mut self,
        tab_id: &TabId,
        source: &PaneId,
        target: &PaneId,
        edge: EdgePosition,
    ) {
        let root = self.take_root();
        let (root, new_id) =
            tree::move_tab_to_new_split(root, tab_id, source, target, edge, &mut self.ids);
        self.root = root;
        if let Some(new_id) = new_id {
            self.active_pane_id = new_id;
            self.after_mutation();
        }
    }

    /// Append a tab to a leaf, making it that leaf's active tab, and focus
    /// the pane.
    pub fn add_tab_to_pane(&mut self, pane_id: &PaneId, tab: Tab) {
        let root = self.take_root();
        let (root, added) = tree::add_tab_to_pane(root, pane_id, tab);
        self.root = root;
        if added {
            self.active_pane_id = pane_id.clone();
            self.after_mutation();
        }
    }

    /// Remove a tab wherever it lives; a drained leaf is pruned.
    pub fn remove_tab(&mut self, tab_id: &TabId) {
        let root = self.take_root();
        let (root, removed) = tree::remove_tab(root, tab_id, &mut self.ids);
        self.root = root;
        if removed {
            self.after_mutation();
        }
    }

    /// Reorder a leaf's tabs; permutations that do not match are ignored.
    pub fn reorder_tabs(&mut self, pane_id: &PaneId, order: &[TabId]) {
        let root = self.take_root();
        let (root, changed) = tree::reorder_tabs(root, pane_id, order);
        self.root = root;
        if changed {
            self.after_mutation();
        }
    }

    /// Commit a split's sizes. Called once per resize gesture, at
    /// pointer-up, via [`resize::ResizeDrag`].
    pub fn update_pane_sizes(&mut self, split_id: &PaneId, sizes: &[f64]) {
        let root = self.take_root();
        let (root, changed) = tree::update_sizes(root, split_id, sizes);
        self.root = root;
        if changed {
            self.after_mutation();
        }
    }

    /// Focus a leaf. Ignored when the id does not name a live leaf.
    pub fn set_active_pane(&mut self, pane_id: &PaneId) {
        if self.active_pane_id != *pane_id && self.root.find_leaf(pane_id).is_some() {
            self.active_pane_id = pane_id.clone();
            self.notify();
        }
    }

    /// Activate a tab within its leaf. Ignored when the leaf does not hold
    /// the tab.
    pub fn set_active_tab(&mut self, pane_id: &PaneId, tab_id: &TabId) {
        let holds = self
            .root
            .tabs_of(pane_id)
            .is_some_and(|tabs| tabs.iter().any(|t| t.id() == tab_id));
        if !holds {
            log::debug!("set_active_tab: pane {pane_id} does not hold tab {tab_id}; no-op");
            return;
        }
        let root = self.take_root();
        let (root, _) = set_leaf_active(root, pane_id, tab_id);
        self.root = root;
        self.notify();
    }

    /// Atomically replace the tree and active pane in one update, so no
    /// observer sees a root from one project paired with an active-pane id
    /// from another.
    pub fn install(&mut self, root: PaneNode, active_pane_id: Option<PaneId>) {
        self.ids.observe_tree(&root);
        self.root = root;
        self.active_pane_id = active_pane_id
            .filter(|id| self.root.find_leaf(id).is_some())
            .unwrap_or_else(|| self.root.first_leaf_id().clone());
        log::info!(
            "installed workspace tree ({} panes, active {})",
            self.root.leaf_count(),
            self.active_pane_id
        );
        self.notify();
    }

    /// Reset to a fresh single empty leaf (no persisted state for the
    /// incoming project).
    pub fn reset(&mut self) {
        let root = PaneNode::empty_leaf(self.ids.pane_id());
        let active = root.id().clone();
        self.root = root;
        self.active_pane_id = active;
        log::info!("reset workspace to a single empty pane");
        self.notify();
    }

    /// Re-resolve the active pane, then notify. The active pointer must
    /// always name a live leaf; when its leaf was pruned, fall back to the
    /// first leaf in pre-order.
    fn after_mutation(&mut self) {
        if self.root.find_leaf(&self.active_pane_id).is_none() {
            self.active_pane_id = self.root.first_leaf_id().clone();
        }
        self.notify();
    }

    fn notify(&mut self) {
        // Swap the list out so callbacks can read the store while the
        // subscriber list is borrowed mutably.
        let mut subs = std::mem::take(&mut self.subscribers);
        for (_, sub) in &mut subs {
            sub(self);
        }
        self.subscribers = subs;
    }
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self::new()
    }
}

fn set_leaf_active(root: PaneNode, target: &PaneId, tab_id: &TabId) -> (PaneNode, bool) {
    match root {
        PaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
        } => {
            if &id == target {
                return (
                    PaneNode::Leaf {
                        id,
                        tabs,
                        active_tab_id: Some(tab_id.clone()),
                    },
                    true,
                );
            }
            (
                PaneNode::Leaf {
                    id,
                    tabs,
                    active_tab_id,
                },
                false,
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
                    let (child, did) = set_leaf_active(child, target, tab_id);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as Counter;

    #[test]
    fn test_new_store_has_single_empty_leaf() {
        let store = WorkspaceStore::new();
        assert!(store.root().is_leaf());
        assert_eq!(store.active_pane_id(), store.root().id());
    }

    #[test]
    fn test_subscribers_fire_once_per_mutation() {
        let mut store = WorkspaceStore::new();
        let count = Arc::new(Counter::new(0));
        let seen = Arc::clone(&count);
        store.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let pane = store.active_pane_id().clone();
        store.add_tab_to_pane(&pane, Tab::terminal("t1"));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // No-op mutations do not notify
        store.reorder_tabs(&pane, &[TabId::from("terminal:missing")]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = WorkspaceStore::new();
        let count = Arc::new(Counter::new(0));
        let seen = Arc::clone(&count);
        let id = store.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        store.unsubscribe(id);

        let pane = store.active_pane_id().clone();
        store.add_tab_to_pane(&pane, Tab::terminal("t1"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restore_guard_is_scoped_and_nestable() {
        let store = WorkspaceStore::new();
        assert!(!store.is_restoring());
        {
            let _outer = store.begin_restore();
            assert!(store.is_restoring());
            {
                let _inner = store.begin_restore();
                assert!(store.is_restoring());
            }
            assert!(store.is_restoring());
        }
        assert!(!store.is_restoring());
    }

    #[test]
    fn test_split_focuses_new_pane() {
        let mut store = WorkspaceStore::new();
        let pane = store.active_pane_id().clone();
        store.add_tab_to_pane(&pane, Tab::terminal("t1"));
        store.split_pane(&pane, Tab::terminal("t2"), EdgePosition::Right);
        assert_ne!(store.active_pane_id(), &pane);
        assert!(store.root().find_leaf(store.active_pane_id()).is_some());
    }

    #[test]
    fn test_active_pane_falls_back_after_prune() {
        let mut store = WorkspaceStore::new();
        let first = store.active_pane_id().clone();
        let t1 = Tab::terminal("t1");
        let t2 = Tab::terminal("t2");
        store.add_tab_to_pane(&first, t1.clone());
        store.split_pane(&first, t2.clone(), EdgePosition::Bottom);
        let second = store.active_pane_id().clone();

        // Drain the focused second pane; focus falls back to a live leaf
        store.remove_tab(t2.id());
        assert_ne!(store.active_pane_id(), &second);
        assert!(store.root().find_leaf(store.active_pane_id()).is_some());
    }

    #[test]
    fn test_set_active_pane_rejects_unknown_ids() {
        let mut store = WorkspaceStore::new();
        let before = store.active_pane_id().clone();
        store.set_active_pane(&PaneId::from("pane-999"));
        assert_eq!(store.active_pane_id(), &before);
    }

    #[test]
    fn test_install_is_atomic_and_falls_back() {
        let mut store = WorkspaceStore::new();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        store.subscribe(Box::new(move |s| {
            sink.lock()
                .push((s.root().leaf_count(), s.active_pane_id().clone()));
        }));

        let mut ids = IdGen::new();
        let tree = PaneNode::leaf_with_tab(ids.pane_id(), Tab::terminal("t1"));
        let leaf = tree.id().clone();
        store.install(tree, Some(PaneId::from("pane-404")));

        let seen = observed.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (1, leaf));
    }
}
