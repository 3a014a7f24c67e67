//! Engine state and the snapshot handed to the presentation layer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemId(pub u64);

/// Identity of a supplied item list. A new key means a new list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListKey(pub u64);

/// An item as the engine sees it. Content is owned and rendered elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
}

impl Item {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            title: title.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemList {
    pub key: ListKey,
    pub items: Vec<Item>,
}

impl ItemList {
    pub fn new(key: u64, items: Vec<Item>) -> Self {
        Self {
            key: ListKey(key),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Phase {
    #[default]
    Idle,
    /// At the bottom of the inner content with a next item available.
    Pulling,
    /// A programmatic jump is in flight; both locks are held.
    Advancing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ViewerStatus {
    /// No items: no active index can be valid.
    #[default]
    Empty,
    Ready,
}

/// The single mutable state shared by every component.
#[derive(Clone, Debug, Default)]
pub struct EngineState {
    pub(crate) item_count: usize,
    pub(crate) active_index: usize,
    pub(crate) scroll_progress: f32,
    pub(crate) transition_progress: f32,
    pub(crate) scroll_direction: ScrollDirection,
    pub(crate) inner_offset: f32,
    pub(crate) is_at_top: bool,
    pub(crate) is_at_bottom: bool,
    pub(crate) phase: Phase,
    // Only ever written through `set_locks`.
    programmatic_scroll_locked: bool,
    visibility_locked: bool,
}

impl EngineState {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            is_at_top: true,
            ..Self::default()
        }
    }

    pub fn status(&self) -> ViewerStatus {
        if self.item_count == 0 {
            ViewerStatus::Empty
        } else {
            ViewerStatus::Ready
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    pub fn transition_progress(&self) -> f32 {
        self.transition_progress
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll_direction
    }

    pub fn inner_offset(&self) -> f32 {
        self.inner_offset
    }

    pub fn is_at_top(&self) -> bool {
        self.is_at_top
    }

    pub fn is_at_bottom(&self) -> bool {
        self.is_at_bottom
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_programmatic_scroll_locked(&self) -> bool {
        self.programmatic_scroll_locked
    }

    pub fn is_visibility_locked(&self) -> bool {
        self.visibility_locked
    }

    pub fn is_locked(&self) -> bool {
        self.programmatic_scroll_locked || self.visibility_locked
    }

    pub fn has_next(&self) -> bool {
        self.active_index + 1 < self.item_count
    }

    /// Both locks move together.
    pub(crate) fn set_locks(&mut self, locked: bool) {
        self.programmatic_scroll_locked = locked;
        self.visibility_locked = locked;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status(),
            item_count: self.item_count,
            active_index: self.active_index,
            scroll_progress: self.scroll_progress,
            transition_progress: self.transition_progress,
            scroll_direction: self.scroll_direction,
            inner_offset: self.inner_offset,
            is_at_top: self.is_at_top,
            is_at_bottom: self.is_at_bottom,
            is_programmatic_scroll_locked: self.programmatic_scroll_locked,
            is_visibility_locked: self.visibility_locked,
            phase: self.phase,
        }
    }
}

/// Everything the presentation layer reads, taken at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub status: ViewerStatus,
    pub item_count: usize,
    pub active_index: usize,
    pub scroll_progress: f32,
    pub transition_progress: f32,
    pub scroll_direction: ScrollDirection,
    pub inner_offset: f32,
    pub is_at_top: bool,
    pub is_at_bottom: bool,
    pub is_programmatic_scroll_locked: bool,
    pub is_visibility_locked: bool,
    pub phase: Phase,
}
