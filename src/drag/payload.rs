//! Drag payload wire format
//!
//! The platform's native drag channel only carries strings, so the payload
//! travels as JSON and is validated here at the boundary. A payload that
//! fails to parse makes the whole drop a silent no-op; nothing in the drag
//! path surfaces an error to the user.

use crate::pane::types::PaneId;
use crate::tab::TabId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What is being dragged: a tab grabbed by its header, or a file dragged in
/// from outside the pane system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DragPayload {
    Tab {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "sourcePaneId")]
        source_pane_id: PaneId,
    },
    File {
        #[serde(rename = "filePath")]
        file_path: String,
    },
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("drag payload is empty")]
    Empty,
    #[error("drag payload is not a valid drag message: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Parse and validate a raw drag-data string.
pub fn parse_payload(raw: &str) -> Result<DragPayload, PayloadError> {
    if raw.trim().is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(serde_json::from_str(raw)?)
}

/// Encode a payload for the native drag channel.
pub fn encode_payload(payload: &DragPayload) -> String {
    serde_json::to_string(payload).unwrap_or_else(|err| {
        log::error!("failed to encode drag payload: {err}");
        String::new()
    })
}
