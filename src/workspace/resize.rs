//! Buffered divider-drag resizing
//!
//! While a resize handle is being dragged, intermediate sizes are buffered
//! here instead of being committed to the store, so a store-driven re-render
//! never fights the pointer-driven size. The buffer flushes to the store
//! exactly once, at pointer-up; if the owning split unmounts mid-drag the
//! buffer is discarded instead.

use super::WorkspaceStore;
use crate::pane::types::PaneId;

/// One in-progress resize gesture on a single split.
#[derive(Debug)]
pub struct ResizeDrag {
    split_id: PaneId,
    pending: Option<Vec<f64>>,
}

impl ResizeDrag {
    /// Begin a gesture at pointer-down on one of the split's dividers.
    pub fn begin(split_id: PaneId) -> Self {
        Self {
            split_id,
            pending: None,
        }
    }

    pub fn split_id(&self) -> &PaneId {
        &self.split_id
    }

    /// Buffer the latest pointer-driven sizes. The store is untouched.
    pub fn update(&mut self, sizes: Vec<f64>) {
        self.pending = Some(sizes);
    }

    /// The sizes the UI should render while the gesture is live.
    pub fn preview(&self) -> Option<&[f64]> {
        self.pending.as_deref()
    }

    /// Pointer-up: flush the buffered sizes to the store, once.
    pub fn commit(self, store: &mut WorkspaceStore) {
        if let Some(sizes) = self.pending {
            store.update_pane_sizes(&self.split_id, &sizes);
        }
    }

    /// The split unmounted mid-drag: drop the buffer without touching the
    /// store.
    pub fn cancel(self) {
        if self.pending.is_some() {
            log::debug!("resize of split {} cancelled; buffer discarded", self.split_id);
        }
    }
}
