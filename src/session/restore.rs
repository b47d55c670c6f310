//! Rebuild a live pane tree from its serialized form.
//!
//! Restore is forgiving: the legacy leaf schema is migrated in place,
//! editor tabs whose file is no longer in the open-files list are dropped,
//! and a layout that drains entirely falls back to a fresh empty pane. The
//! tree is installed into the store atomically under a [`RestoreGuard`] so
//! the persistence subscription never writes a half-rebuilt layout back.
//!
//! [`RestoreGuard`]: crate::workspace::RestoreGuard

use super::storage::{DebouncedWriter, KvStore, editor_state_key, load_editor_state};
use super::{EditorState, SerializedPaneNode, SerializedTab};
use crate::pane::types::{IdGen, PaneId, PaneNode};
use crate::pane::tree;
use crate::tab::Tab;
use crate::workspace::WorkspaceStore;
use std::collections::HashSet;

/// Rebuild one pane node. Tab ids are regenerated from the foreign keys, so
/// they come out identical to the ids the tabs had when captured.
pub fn restore_pane_node(node: SerializedPaneNode) -> PaneNode {
    match node {
        SerializedPaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
            editor_file_paths,
        } => {
            let tabs: Vec<Tab> = if tabs.is_empty() {
                // Legacy schema: only editor file paths were persisted.
                editor_file_paths
                    .unwrap_or_default()
                    .into_iter()
                    .map(Tab::editor)
                    .collect()
            } else {
                tabs.into_iter()
                    .map(|t| match t {
                        SerializedTab::Terminal { terminal_id } => Tab::terminal(terminal_id),
                        SerializedTab::Editor { file_path } => Tab::editor(file_path),
                    })
                    .collect()
            };
            PaneNode::Leaf {
                id: PaneId::from(id),
                tabs,
                active_tab_id: active_tab_id.map(Into::into),
            }
        }
        SerializedPaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => PaneNode::Split {
            id: PaneId::from(id),
            direction,
            children: children.into_iter().map(restore_pane_node).collect(),
            sizes,
        },
    }
}

/// Drop editor tabs whose file is no longer in the open-files list. Terminal
/// tabs always survive. A leaf whose active tab was dropped falls back to
/// its first remaining tab.
pub fn filter_editor_tabs(node: PaneNode, open_files: &HashSet<&str>) -> PaneNode {
    match node {
        PaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
        } => {
            let tabs: Vec<Tab> = tabs
                .into_iter()
                .filter(|tab| match tab.file_path() {
                    Some(path) => open_files.contains(path),
                    None => true,
                })
                .collect();
            let active_tab_id = active_tab_id
                .filter(|active| tabs.iter().any(|t| t.id() == active))
                .or_else(|| tabs.first().map(|t| t.id().clone()));
            PaneNode::Leaf {
                id,
                tabs,
                active_tab_id,
            }
        }
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => PaneNode::Split {
            id,
            direction,
            children: children
                .into_iter()
                .map(|child| filter_editor_tabs(child, open_files))
                .collect(),
            sizes,
        },
    }
}

/// A restored tree ready to install.
#[derive(Debug)]
pub struct RestoredLayout {
    pub root: PaneNode,
    pub active_pane_id: Option<PaneId>,
}

/// Turn a persisted document into an installable layout: rebuild, filter
/// against the open-files list, then normalize away drained leaves and
/// degenerate splits.
pub fn restore_layout(state: &EditorState) -> Option<RestoredLayout> {
    let layout = state.pane_layout.clone()?;
    let open_files: HashSet<&str> = state.open_files.iter().map(String::as_str).collect();

    let mut ids = IdGen::new();
    let root = restore_pane_node(layout);
    ids.observe_tree(&root);
    let root = filter_editor_tabs(root, &open_files);
    let root = tree::normalize(root, &mut ids);

    Some(RestoredLayout {
        root,
        active_pane_id: state.active_pane_id.clone().map(PaneId::from),
    })
}

/// Install a persisted document into the store, or reset to a single empty
/// pane when the document has no layout. Runs under a restore guard so the
/// persistence subscription skips the resulting notifications.
pub fn apply_editor_state(store: &mut WorkspaceStore, state: Option<&EditorState>) {
    let _guard = store.begin_restore();
    match state.and_then(restore_layout) {
        Some(layout) => store.install(layout.root, layout.active_pane_id),
        None => store.reset(),
    }
}

/// Switch the window to another project: flush the outgoing project's
/// pending write, load the incoming project's state, then install it
/// atomically.
pub fn switch_project(
    store: &mut WorkspaceStore,
    writer: &mut DebouncedWriter,
    kv: &dyn KvStore,
    incoming_project: &str,
) -> anyhow::Result<()> {
    writer.flush()?;
    let state = load_editor_state(kv, &editor_state_key(incoming_project));
    log::info!(
        "switching to project {incoming_project} ({})",
        if state.is_some() {
            "persisted layout found"
        } else {
            "no persisted layout"
        }
    );
    apply_editor_state(store, state.as_ref());
    Ok(())
}
