// Workspace layout engine: a recursive tree of panes with tabs, drag-and-drop
// rearrangement, and durable persistence.
//
// # Mutex Usage Policy
//
// workdeck state is sync-only and lives behind `parking_lot::Mutex` shared
// handles ([`workspace::SharedWorkspaceStore`], [`drag::SharedDragSession`]).
// Never hold both locks at once; the drop path locks the drag session first,
// releases it, then locks the store.
//
// # Structure
//
//   - `pane`       — the tree types and the pure structural operations
//   - `tab`        — tab identity and its foreign keys
//   - `workspace`  — the mutable store, subscriptions, resize buffering
//   - `drag`       — the drag session, payload wire format, drop zones
//   - `session`    — capture/restore and the debounced key-value persistence

/// Crate version, surfaced for host diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod drag;
pub mod pane;
pub mod session;
pub mod tab;
pub mod workspace;
