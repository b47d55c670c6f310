//! Tab identity: the mapping from a tab to its terminal or editor content.
//!
//! Tab ids are a deterministic function of the tab kind and its foreign key,
//! so the same terminal or file always maps to the same id. The foreign keys
//! (terminal ids, file paths) are owned by external registries; this crate
//! only carries them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque tab identifier, unique within a single leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TabId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A tab displayed within a leaf pane: either a terminal session or an open
/// file in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
    /// A terminal session, keyed into the external terminal registry.
    Terminal { id: TabId, terminal_id: String },
    /// An open file, keyed into the external open-files registry.
    Editor { id: TabId, file_path: String },
}

impl Tab {
    /// Create a terminal tab. The id is derived from the terminal id.
    pub fn terminal(terminal_id: impl Into<String>) -> Self {
        let terminal_id = terminal_id.into();
        Tab::Terminal {
            id: TabId(format!("terminal:{terminal_id}")),
            terminal_id,
        }
    }

    /// Create an editor tab. The id is derived from the file path.
    pub fn editor(file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        Tab::Editor {
            id: TabId(format!("editor:{file_path}")),
            file_path,
        }
    }

    pub fn id(&self) -> &TabId {
        match self {
            Tab::Terminal { id, .. } | Tab::Editor { id, .. } => id,
        }
    }

    pub fn is_editor(&self) -> bool {
        matches!(self, Tab::Editor { .. })
    }

    /// File path for editor tabs, `None` for terminal tabs.
    pub fn file_path(&self) -> Option<&str> {
        match self {
            Tab::Editor { file_path, .. } => Some(file_path),
            Tab::Terminal { .. } => None,
        }
    }

    /// Terminal id for terminal tabs, `None` for editor tabs.
    pub fn terminal_id(&self) -> Option<&str> {
        match self {
            Tab::Terminal { terminal_id, .. } => Some(terminal_id),
            Tab::Editor { .. } => None,
        }
    }
}
