//! Capture the live workspace into its serialized form.

use super::{CollaboratorState, EditorState, SerializedPaneNode, SerializedTab};
use crate::pane::PaneNode;
use crate::workspace::WorkspaceStore;

/// Serialize one pane node. Tab ids are dropped; they are a deterministic
/// function of the foreign key and regenerate on restore.
pub fn capture_pane_node(node: &PaneNode) -> SerializedPaneNode {
    match node {
        PaneNode::Leaf {
            id,
            tabs,
            active_tab_id,
        } => SerializedPaneNode::Leaf {
            id: id.as_str().to_string(),
            tabs: tabs.iter().map(capture_tab).collect(),
            active_tab_id: active_tab_id.as_ref().map(|t| t.as_str().to_string()),
            editor_file_paths: None,
        },
        PaneNode::Split {
            id,
            direction,
            children,
            sizes,
        } => SerializedPaneNode::Split {
            id: id.as_str().to_string(),
            direction: *direction,
            children: children.iter().map(capture_pane_node).collect(),
            sizes: sizes.clone(),
        },
    }
}

fn capture_tab(tab: &crate::tab::Tab) -> SerializedTab {
    match tab {
        crate::tab::Tab::Terminal { terminal_id, .. } => SerializedTab::Terminal {
            terminal_id: terminal_id.clone(),
        },
        crate::tab::Tab::Editor { file_path, .. } => SerializedTab::Editor {
            file_path: file_path.clone(),
        },
    }
}

/// Snapshot the full persisted document from the store plus the
/// collaborator-owned fields.
pub fn capture_editor_state(store: &WorkspaceStore, collab: &CollaboratorState) -> EditorState {
    EditorState {
        pane_layout: Some(capture_pane_node(store.root())),
        active_pane_id: Some(store.active_pane_id().as_str().to_string()),
        open_files: collab.open_files.clone(),
        active_file_path: collab.active_file_path.clone(),
        expanded_dirs: collab.expanded_dirs.clone(),
        file_explorer_visible: collab.file_explorer_visible,
        active_tab_id: collab.active_tab_id.clone(),
        saved_at: Some(chrono::Utc::now().to_rfc3339()),
    }
}
