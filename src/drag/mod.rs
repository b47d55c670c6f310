//! Drag session: the single, process-wide record of an in-progress drag
//!
//! Exactly one session exists per window, so there is never ambiguity about
//! what is being dragged. Each pane's overlay independently asks whether it
//! is the current preview target by comparing its own id against the
//! session's preview.
//!
//! A browser-cancelled drag (Escape) never fires a drop, so the session
//! simply stays `Dragging` until a drop or a new drag start supersedes it;
//! a stale dragging state is harmless because no mutation happens without a
//! drop.

pub mod payload;
pub mod zones;

pub use payload::{DragPayload, PayloadError, encode_payload, parse_payload};
pub use zones::{DropZoneOverlay, FileOpener, zone_rects};

use crate::pane::types::{DropPosition, PaneId};
use parking_lot::Mutex;
use std::sync::Arc;

/// The pane/zone pair currently previewed as the drop target.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTarget {
    pub pane_id: PaneId,
    pub position: DropPosition,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        payload: DragPayload,
        preview: Option<PreviewTarget>,
    },
}

/// Single-flight drag state machine.
#[derive(Debug)]
pub struct DragSession {
    state: DragState,
}

/// Process-wide shared handle to the one drag session.
pub type SharedDragSession = Arc<Mutex<DragSession>>;

/// Create the session behind the shared handle overlays clone.
pub fn shared_session() -> SharedDragSession {
    Arc::new(Mutex::new(DragSession::new()))
}

impl DragSession {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Begin a drag. Supersedes any previous drag still lingering after a
    /// cancelled gesture.
    pub fn start(&mut self, payload: DragPayload) {
        log::debug!("drag start: {payload:?}");
        self.state = DragState::Dragging {
            payload,
            preview: None,
        };
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Dragging { payload, .. } => Some(payload),
            DragState::Idle => None,
        }
    }

    pub fn preview(&self) -> Option<&PreviewTarget> {
        match &self.state {
            DragState::Dragging { preview, .. } => preview.as_ref(),
            DragState::Idle => None,
        }
    }

    /// The position previewed on the given pane, if that pane is the
    /// current target.
    pub fn preview_for(&self, pane_id: &PaneId) -> Option<DropPosition> {
        self.preview()
            .filter(|t| &t.pane_id == pane_id)
            .map(|t| t.position)
    }

    /// Zone drag-enter: last writer wins; re-entering the current zone is a
    /// no-op.
    pub fn set_preview(&mut self, pane_id: &PaneId, position: DropPosition) {
        if let DragState::Dragging { preview, .. } = &mut self.state {
            let next = PreviewTarget {
                pane_id: pane_id.clone(),
                position,
            };
            if preview.as_ref() != Some(&next) {
                *preview = Some(next);
            }
        }
    }

    /// Clear the preview, but only if the given pane still owns it. A pane
    /// whose overlay was left for another pane must not clear the new
    /// target.
    pub fn clear_preview_for(&mut self, pane_id: &PaneId) {
        if let DragState::Dragging { preview, .. } = &mut self.state {
            if preview.as_ref().is_some_and(|t| &t.pane_id == pane_id) {
                *preview = None;
            }
        }
    }

    /// Conclude the drag, returning the payload (if any) and resetting to
    /// idle.
    pub fn finish(&mut self) -> Option<DragPayload> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { payload, .. } => Some(payload),
            DragState::Idle => None,
        }
    }
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}
