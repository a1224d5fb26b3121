//! Scroll position → visible index window, in constant time.

use serde::Serialize;

use crate::types::{DEFAULT_BUFFER_ROWS, DEFAULT_ROW_HEIGHT};

/// Fixed-height row geometry for a virtualized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    row_height: u32,
    buffer_rows: usize,
}

/// The half-open index range `[start, end)` to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
    /// Total scrollable height of the whole list, `len * row_height`.
    pub total_height: u64,
}

impl VisibleWindow {
    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `index` falls inside the window.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

impl Viewport {
    /// Create a viewport. A zero row height is bumped to one pixel.
    pub fn new(row_height: u32, buffer_rows: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            buffer_rows,
        }
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn buffer_rows(&self) -> usize {
        self.buffer_rows
    }

    /// Absolute top offset of the row at `index`.
    pub fn row_top(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.row_height)
    }

    /// Total scrollable height for a list of `len` rows.
    pub fn total_height(&self, len: usize) -> u64 {
        self.row_top(len)
    }

    /// Compute the window for a list of `len` rows.
    ///
    /// `start = max(0, floor(scroll_top / row_height) - buffer)` and
    /// `end = min(len, ceil((scroll_top + viewport_height) / row_height) + buffer)`.
    /// A scroll offset left past the end of a shorter list (after a list swap)
    /// clamps `start` down to `end`, so `0 <= start <= end <= len` always holds.
    pub fn window(&self, len: usize, scroll_top: f64, viewport_height: f64) -> VisibleWindow {
        let row_height = f64::from(self.row_height);
        let scroll_top = finite_non_negative(scroll_top);
        let viewport_height = finite_non_negative(viewport_height);

        let first_visible = (scroll_top / row_height).floor() as usize;
        let last_visible = ((scroll_top + viewport_height) / row_height).ceil() as usize;

        let end = last_visible.saturating_add(self.buffer_rows).min(len);
        let start = first_visible.saturating_sub(self.buffer_rows).min(end);

        VisibleWindow {
            start,
            end,
            total_height: self.total_height(len),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT, DEFAULT_BUFFER_ROWS)
    }
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
