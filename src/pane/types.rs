//! Core types for the pane tree
//!
//! The workspace is a recursive tree of panes:
//! - Leaf nodes hold an ordered list of tabs
//! - Split nodes hold two or more children along one axis, with per-child
//!   percentage sizes
//!
//! Nodes carry string ids that are stable for the process lifetime and are
//! only regenerated when restructuring destroys the node.

use crate::tab::{Tab, TabId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a pane node (leaf or split).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(String);

impl PaneId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PaneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Direction of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Children are side by side (created by left/right edge drops)
    Horizontal,
    /// Children are stacked (created by top/bottom edge drops)
    Vertical,
}

/// Edge of a pane a new sibling is inserted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePosition {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgePosition {
    /// The split axis this edge implies.
    pub fn axis(self) -> SplitDirection {
        match self {
            EdgePosition::Left | EdgePosition::Right => SplitDirection::Horizontal,
            EdgePosition::Top | EdgePosition::Bottom => SplitDirection::Vertical,
        }
    }

    /// True when the new pane lands before the existing one (left/top).
    pub fn leading(self) -> bool {
        matches!(self, EdgePosition::Left | EdgePosition::Top)
    }
}

/// One of the five logical drop positions of a pane overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl DropPosition {
    /// The edge this position names, or `None` for center.
    pub fn edge(self) -> Option<EdgePosition> {
        match self {
            DropPosition::Left => Some(EdgePosition::Left),
            DropPosition::Right => Some(EdgePosition::Right),
            DropPosition::Top => Some(EdgePosition::Top),
            DropPosition::Bottom => Some(EdgePosition::Bottom),
            DropPosition::Center => None,
        }
    }
}

/// Bounds of a pane's content area, used for drop-zone geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaneBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PaneBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside these bounds
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Tree node for the workspace layout
///
/// Leaves own tabs; splits own two or more children plus a size per child.
/// Sizes are percentages that are renormalized to sum to 100 whenever the
/// child list changes.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneNode {
    Leaf {
        id: PaneId,
        tabs: Vec<Tab>,
        active_tab_id: Option<TabId>,
    },
    Split {
        id: PaneId,
        direction: SplitDirection,
        children: Vec<PaneNode>,
        sizes: Vec<f64>,
    },
}

impl PaneNode {
    /// Create an empty leaf
    pub fn empty_leaf(id: PaneId) -> Self {
        PaneNode::Leaf {
            id,
            tabs: Vec::new(),
            active_tab_id: None,
        }
    }

    /// Create a leaf holding exactly one tab, active
    pub fn leaf_with_tab(id: PaneId, tab: Tab) -> Self {
        let active = Some(tab.id().clone());
        PaneNode::Leaf {
            id,
            tabs: vec![tab],
            active_tab_id: active,
        }
    }

    pub fn id(&self) -> &PaneId {
        match self {
            PaneNode::Leaf { id, .. } | PaneNode::Split { id, .. } => id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PaneNode::Leaf { .. })
    }

    /// Find any node by id (pre-order)
    pub fn find(&self, target: &PaneId) -> Option<&PaneNode> {
        if self.id() == target {
            return Some(self);
        }
        match self {
            PaneNode::Leaf { .. } => None,
            PaneNode::Split { children, .. } => {
                children.iter().find_map(|child| child.find(target))
            }
        }
    }

    /// Find a leaf by id
    pub fn find_leaf(&self, target: &PaneId) -> Option<&PaneNode> {
        self.find(target).filter(|node| node.is_leaf())
    }

    /// Ids of all leaves, pre-order
    pub fn leaf_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids(&self, out: &mut Vec<PaneId>) {
        match self {
            PaneNode::Leaf { id, .. } => out.push(id.clone()),
            PaneNode::Split { children, .. } => {
                for child in children {
                    child.collect_leaf_ids(out);
                }
            }
        }
    }

    /// Id of the first leaf in pre-order. Every tree has at least one leaf.
    pub fn first_leaf_id(&self) -> &PaneId {
        match self {
            PaneNode::Leaf { id, .. } => id,
            PaneNode::Split { children, .. } => children[0].first_leaf_id(),
        }
    }

    /// Total number of leaves
    pub fn leaf_count(&self) -> usize {
        match self {
            PaneNode::Leaf { .. } => 1,
            PaneNode::Split { children, .. } => children.iter().map(PaneNode::leaf_count).sum(),
        }
    }

    /// Tabs of the leaf with the given id
    pub fn tabs_of(&self, target: &PaneId) -> Option<&[Tab]> {
        match self.find_leaf(target)? {
            PaneNode::Leaf { tabs, .. } => Some(tabs),
            PaneNode::Split { .. } => None,
        }
    }

    /// Active tab id of the leaf with the given id
    pub fn active_tab_of(&self, target: &PaneId) -> Option<&TabId> {
        match self.find_leaf(target)? {
            PaneNode::Leaf { active_tab_id, .. } => active_tab_id.as_ref(),
            PaneNode::Split { .. } => None,
        }
    }

    /// Id of the first leaf (pre-order) holding the given tab
    pub fn leaf_containing_tab(&self, tab_id: &TabId) -> Option<&PaneId> {
        match self {
            PaneNode::Leaf { id, tabs, .. } => {
                tabs.iter().any(|t| t.id() == tab_id).then_some(id)
            }
            PaneNode::Split { children, .. } => children
                .iter()
                .find_map(|child| child.leaf_containing_tab(tab_id)),
        }
    }

    /// Walk every node pre-order
    pub fn for_each(&self, f: &mut impl FnMut(&PaneNode)) {
        f(self);
        if let PaneNode::Split { children, .. } = self {
            for child in children {
                child.for_each(f);
            }
        }
    }
}

/// Generator for pane ids. Ids are never reused; persisted ids observed
/// during restore advance the counter past their numeric suffix.
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn pane_id(&mut self) -> PaneId {
        let id = PaneId(format!("pane-{}", self.next));
        self.next += 1;
        id
    }

    /// Advance past an externally supplied id of the form `pane-<n>`.
    pub fn observe(&mut self, id: &PaneId) {
        if let Some(n) = id
            .as_str()
            .strip_prefix("pane-")
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.next = self.next.max(n + 1);
        }
    }

    /// Advance past every id in a tree (used after installing a restored tree).
    pub fn observe_tree(&mut self, root: &PaneNode) {
        root.for_each(&mut |node| self.observe(node.id()));
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}
