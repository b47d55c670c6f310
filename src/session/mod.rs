//! Durable workspace state: save/restore across restarts and project
//! switches
//!
//! The pane tree plus active pointers persist through a key-value store
//! under `"editor-state/" + projectId`. The wire format drops ephemeral tab
//! ids (they regenerate deterministically on load) and tolerates an older
//! schema in which a leaf carried only `editorFilePaths`.

pub mod capture;
pub mod restore;
pub mod storage;

use crate::pane::SplitDirection;
use serde::{Deserialize, Serialize};

/// A tab reference on the wire: the foreign key only, no tab id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedTab {
    Terminal {
        #[serde(rename = "terminalId")]
        terminal_id: String,
    },
    Editor {
        #[serde(rename = "filePath")]
        file_path: String,
    },
}

/// Recursive pane tree node as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedPaneNode {
    Leaf {
        id: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tabs: Vec<SerializedTab>,
        #[serde(rename = "activeTabId", default, skip_serializing_if = "Option::is_none")]
        active_tab_id: Option<String>,
        /// Legacy schema: older builds persisted only the open editor file
        /// paths, with no tabs array.
        #[serde(
            rename = "editorFilePaths",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        editor_file_paths: Option<Vec<String>>,
    },
    Split {
        id: String,
        direction: SplitDirection,
        children: Vec<SerializedPaneNode>,
        sizes: Vec<f64>,
    },
}

/// The whole persisted document for one project. The fields beyond the pane
/// layout and active pane belong to collaborating subsystems (open-files
/// list, file explorer) and are carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pane_layout: Option<SerializedPaneNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_pane_id: Option<String>,
    pub open_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_file_path: Option<String>,
    pub expanded_dirs: Vec<String>,
    pub file_explorer_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tab_id: Option<String>,
    /// Timestamp of the save (ISO 8601), informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

/// Collaborator-owned state written alongside the pane layout.
#[derive(Debug, Clone, Default)]
pub struct CollaboratorState {
    pub open_files: Vec<String>,
    pub active_file_path: Option<String>,
    pub expanded_dirs: Vec<String>,
    pub file_explorer_visible: bool,
    pub active_tab_id: Option<String>,
}
