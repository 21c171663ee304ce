//! Pure presentation state: slide selection, accordion groups, viewport mode.
//!
//! Nothing here touches the DOM. The carousel, menu and dropdown modules keep
//! one of these per feature and mirror it into state classes after every
//! transition, so the invariants (one active slide, at most one open sibling)
//! are enforced in plain data and unit tested in isolation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State class marking the active slide/indicator and open panels.
pub const ACTIVE_CLASS: &str = "active";

/// Layout mode derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    Mobile,
    Desktop,
}

impl ViewportMode {
    /// Widths at or below `breakpoint` are mobile.
    pub fn from_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            ViewportMode::Mobile
        } else {
            ViewportMode::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == ViewportMode::Mobile
    }
}

impl fmt::Display for ViewportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportMode::Mobile => f.write_str("mobile"),
            ViewportMode::Desktop => f.write_str("desktop"),
        }
    }
}

/// Ordered slide handles with exactly one selected.
///
/// The selected index is always in `[0, len)`; construction rejects an empty
/// set so the invariant holds from the start.
#[derive(Debug, Clone)]
pub struct SlideSet<H> {
    handles: Vec<H>,
    current: usize,
}

impl<H: Copy> SlideSet<H> {
    /// Build a set selecting `initial` (wrapped). Returns `None` when empty.
    pub fn new(handles: Vec<H>, initial: usize) -> Option<Self> {
        if handles.is_empty() {
            return None;
        }
        let current = initial % handles.len();
        Some(Self { handles, current })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_handle(&self) -> H {
        self.handles[self.current]
    }

    pub fn handle(&self, index: usize) -> Option<H> {
        self.handles.get(index).copied()
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    /// Wrap any signed index into `[0, len)`.
    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.handles.len() as i64) as usize
    }

    pub fn next_index(&self) -> usize {
        (self.current + 1) % self.handles.len()
    }

    pub fn previous_index(&self) -> usize {
        (self.current + self.handles.len() - 1) % self.handles.len()
    }

    /// Select `index` (wrapped). Returns the previous index when the
    /// selection actually moved.
    pub fn select(&mut self, index: i64) -> Option<usize> {
        let target = self.wrap(index);
        if target == self.current {
            return None;
        }
        let previous = self.current;
        self.current = target;
        Some(previous)
    }
}

/// Open/closed flags for a group of sibling panels.
///
/// The exclusive operations implement accordion semantics (zero or one open);
/// [`Accordion::set`] is the independent mode used by hover dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Vec<bool>,
}

impl Accordion {
    pub fn new(len: usize) -> Self {
        Self {
            open: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.open
            .iter()
            .enumerate()
            .filter_map(|(i, &o)| o.then_some(i))
            .collect()
    }

    /// Flip `index`, closing every sibling first. Returns the new state of
    /// `index`; out-of-range indices leave the group untouched.
    pub fn toggle_exclusive(&mut self, index: usize) -> bool {
        if index >= self.open.len() {
            return false;
        }
        let was_open = self.open[index];
        self.open.iter_mut().for_each(|o| *o = false);
        self.open[index] = !was_open;
        !was_open
    }

    /// Set one panel independently of its siblings.
    pub fn set(&mut self, index: usize, open: bool) {
        if let Some(slot) = self.open.get_mut(index) {
            *slot = open;
        }
    }

    /// Close everything. Returns the indices that were open.
    pub fn close_all(&mut self) -> Vec<usize> {
        let closed = self.open_indices();
        self.open.iter_mut().for_each(|o| *o = false);
        closed
    }
}
