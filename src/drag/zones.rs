//! Drop zones: the five fixed-proportion regions of a pane overlay
//!
//! Each pane renders five overlapping regions over its content area: left
//! and right quarter-width strips at full height, top and bottom
//! quarter-height strips at the middle half width, and a center zone
//! covering the middle 50% x 50%. The host places these as real regions and
//! forwards the platform's enter/leave/drop events; there is no runtime
//! hit-testing against stored rectangles here.

use super::payload::{DragPayload, parse_payload};
use super::DragSession;
use crate::pane::types::{DropPosition, PaneBounds, PaneId};
use crate::tab::Tab;
use crate::workspace::WorkspaceStore;

/// Collaborator interface to the editor's open-files registry. A dropped
/// file is opened before a tab for it is created; a failed open drops the
/// gesture.
pub trait FileOpener {
    fn open(&mut self, path: &str) -> bool;
}

/// Compute the five zone rectangles for a pane's content bounds, in the
/// same coordinate space as `bounds`.
pub fn zone_rects(bounds: PaneBounds) -> [(DropPosition, PaneBounds); 5] {
    let PaneBounds {
        x,
        y,
        width: w,
        height: h,
    } = bounds;
    [
        (DropPosition::Left, PaneBounds::new(x, y, w * 0.25, h)),
        (
            DropPosition::Right,
            PaneBounds::new(x + w * 0.75, y, w * 0.25, h),
        ),
        (
            DropPosition::Top,
            PaneBounds::new(x + w * 0.25, y, w * 0.5, h * 0.25),
        ),
        (
            DropPosition::Bottom,
            PaneBounds::new(x + w * 0.25, y + h * 0.75, w * 0.5, h * 0.25),
        ),
        (
            DropPosition::Center,
            PaneBounds::new(x + w * 0.25, y + h * 0.25, w * 0.5, h * 0.5),
        ),
    ]
}

/// Per-pane overlay raising drag events into the shared session and
/// dispatching drops into the store.
#[derive(Debug, Clone)]
pub struct DropZoneOverlay {
    pane_id: PaneId,
}

impl DropZoneOverlay {
    pub fn new(pane_id: PaneId) -> Self {
        Self { pane_id }
    }

    pub fn pane_id(&self) -> &PaneId {
        &self.pane_id
    }

    /// Whether this pane currently holds the preview, and at which
    /// position.
    pub fn preview(&self, session: &DragSession) -> Option<DropPosition> {
        session.preview_for(&self.pane_id)
    }

    /// The pointer entered one of this overlay's zones.
    pub fn on_drag_enter(&self, session: &mut DragSession, position: DropPosition) {
        session.set_preview(&self.pane_id, position);
    }

    /// The pointer left a zone. `still_inside` is the host's containment
    /// check: true when the pointer merely crossed into an adjacent zone of
    /// this same overlay, in which case the preview is kept to avoid
    /// flicker at zone boundaries.
    pub fn on_drag_leave(&self, session: &mut DragSession, still_inside: bool) {
        if !still_inside {
            session.clear_preview_for(&self.pane_id);
        }
    }

    /// A drop landed on this pane at `position`. `raw_payload` is the
    /// platform drag-data string; a payload that fails validation makes the
    /// whole drop a no-op. Exactly one store mutation is dispatched for a
    /// valid payload.
    pub fn on_drop(
        &self,
        session: &mut DragSession,
        store: &mut WorkspaceStore,
        position: DropPosition,
        raw_payload: &str,
        opener: &mut dyn FileOpener,
    ) {
        session.clear_preview_for(&self.pane_id);
        session.finish();

        let payload = match parse_payload(raw_payload) {
            Ok(payload) => payload,
            Err(err) => {
                log::debug!("ignoring drop with malformed payload: {err}");
                return;
            }
        };

        match (payload, position.edge()) {
            (
                DragPayload::Tab {
                    tab_id,
                    source_pane_id,
                },
                None,
            ) => {
                store.move_tab_to_pane(&tab_id, &source_pane_id, &self.pane_id);
            }
            (
                DragPayload::Tab {
                    tab_id,
                    source_pane_id,
                },
                Some(edge),
            ) => {
                store.move_tab_to_new_split(&tab_id, &source_pane_id, &self.pane_id, edge);
            }
            (DragPayload::File { file_path }, edge) => {
                if !opener.open(&file_path) {
                    log::debug!("dropped file {file_path} could not be opened; ignoring");
                    return;
                }
                let tab = Tab::editor(file_path);
                match edge {
                    None => store.add_tab_to_pane(&self.pane_id, tab),
                    Some(edge) => store.split_pane(&self.pane_id, tab, edge),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_rects_cover_expected_proportions() {
        let bounds = PaneBounds::new(100.0, 200.0, 400.0, 200.0);
        let zones = zone_rects(bounds);

        let rect_of = |pos: DropPosition| {
            zones
                .iter()
                .find(|(p, _)| *p == pos)
                .map(|(_, r)| *r)
                .unwrap()
        };

        assert_eq!(rect_of(DropPosition::Left), PaneBounds::new(100.0, 200.0, 100.0, 200.0));
        assert_eq!(
            rect_of(DropPosition::Right),
            PaneBounds::new(400.0, 200.0, 100.0, 200.0)
        );
        assert_eq!(
            rect_of(DropPosition::Top),
            PaneBounds::new(200.0, 200.0, 200.0, 50.0)
        );
        assert_eq!(
            rect_of(DropPosition::Bottom),
            PaneBounds::new(200.0, 350.0, 200.0, 50.0)
        );
        assert_eq!(
            rect_of(DropPosition::Center),
            PaneBounds::new(200.0, 250.0, 200.0, 100.0)
        );
    }

    #[test]
    fn test_center_zone_sits_inside_strips() {
        let zones = zone_rects(PaneBounds::new(0.0, 0.0, 100.0, 100.0));
        let center = zones
            .iter()
            .find(|(p, _)| *p == DropPosition::Center)
            .map(|(_, r)| *r)
            .unwrap();
        // Center shares its left edge with the end of the left strip
        assert!((center.x - 25.0).abs() < f32::EPSILON);
        assert!((center.y - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_leave_keeps_preview_when_crossing_zones() {
        let mut session = DragSession::new();
        session.start(DragPayload::File {
            file_path: "/a.md".to_string(),
        });

        let overlay = DropZoneOverlay::new(PaneId::from("pane-1"));
        overlay.on_drag_enter(&mut session, DropPosition::Left);
        // Crossing from the left strip into center: leave fires, but the
        // pointer is still inside the overlay container.
        overlay.on_drag_leave(&mut session, true);
        overlay.on_drag_enter(&mut session, DropPosition::Center);
        assert_eq!(overlay.preview(&session), Some(DropPosition::Center));

        overlay.on_drag_leave(&mut session, false);
        assert_eq!(overlay.preview(&session), None);
    }
}
