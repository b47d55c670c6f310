//! Pane tree: data model and pure mutation algorithms
//!
//! The tree itself is plain data ([`types`]); every mutation is a pure
//! function from old root to new root ([`tree`]). The workspace store owns
//! the single live tree and is the only writer.

pub mod tree;
pub mod types;

pub use types::{
    DropPosition, EdgePosition, IdGen, PaneBounds, PaneId, PaneNode, SplitDirection,
};
