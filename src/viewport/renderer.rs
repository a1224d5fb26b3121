//! Windowed rendering of a result list: only rows inside the visible window
//! (plus buffer) are materialized, each positioned by its logical offset.

use serde::Serialize;

use crate::types::{EntryType, SearchEntry};

use super::window::{Viewport, VisibleWindow};

/// Turns list items into host rows.
pub trait RowRenderer<T> {
    /// The materialized row type.
    type Row;

    /// Render a loaded item.
    fn render(&mut self, item: &T, index: usize) -> Self::Row;

    /// Render a slot whose item has not arrived yet.
    fn placeholder(&mut self, index: usize) -> Self::Row;
}

/// One materialized row and its absolute position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedRow<R> {
    pub index: usize,
    /// `index * row_height`.
    pub top: u64,
    pub row: R,
}

/// The rows of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedWindow<R> {
    pub window: VisibleWindow,
    pub rows: Vec<PositionedRow<R>>,
}

/// Coalesces scroll and resize notifications so the window is recomputed at
/// most once per animation frame.
#[derive(Debug, Clone, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a recompute as needed. Returns true only for the first request
    /// since the last frame, i.e. when the host should schedule a frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending request at frame time.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Scroll state for a virtualized list.
///
/// Holds no items: the list is passed to each render, so swapping the list
/// (a new query or filter) needs only [`invalidate`](Self::invalidate). The
/// scroll offset is kept across swaps.
#[derive(Debug, Clone)]
pub struct VirtualList {
    viewport: Viewport,
    scroll_top: f64,
    viewport_height: f64,
    throttle: FrameThrottle,
}

impl VirtualList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll_top: 0.0,
            viewport_height: 0.0,
            throttle: FrameThrottle::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Record a scroll event. Returns true if a frame should be scheduled.
    pub fn scroll_to(&mut self, scroll_top: f64) -> bool {
        self.scroll_top = scroll_top;
        self.throttle.request()
    }

    /// Record a resize event. Returns true if a frame should be scheduled.
    pub fn resize(&mut self, viewport_height: f64) -> bool {
        self.viewport_height = viewport_height;
        self.throttle.request()
    }

    /// Note that the list was swapped; the next frame recomputes the window.
    pub fn invalidate(&mut self) -> bool {
        self.throttle.request()
    }

    /// Current window for a list of `len` rows.
    pub fn window(&self, len: usize) -> VisibleWindow {
        self.viewport
            .window(len, self.scroll_top, self.viewport_height)
    }

    /// Render the visible slice of `items`. Slots holding `None` render as
    /// placeholders. Same inputs always produce the same rows.
    pub fn render<T, R>(&self, items: &[Option<T>], renderer: &mut R) -> RenderedWindow<R::Row>
    where
        R: RowRenderer<T>,
    {
        let window = self.window(items.len());
        let rows = (window.start..window.end)
            .map(|index| PositionedRow {
                index,
                top: self.viewport.row_top(index),
                row: match &items[index] {
                    Some(item) => renderer.render(item, index),
                    None => renderer.placeholder(index),
                },
            })
            .collect();
        RenderedWindow { window, rows }
    }

    /// Animation-frame hook: renders only if a scroll, resize, or list swap
    /// happened since the last frame.
    pub fn frame<T, R>(
        &mut self,
        items: &[Option<T>],
        renderer: &mut R,
    ) -> Option<RenderedWindow<R::Row>>
    where
        R: RowRenderer<T>,
    {
        if !self.throttle.take() {
            return None;
        }
        Some(self.render(items, renderer))
    }
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

/// A list row for one compendium entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryRow {
    Entry {
        id: String,
        entry_type: EntryType,
        name: String,
        subtitle: String,
        /// Omitted from display when empty.
        badge: String,
        summary: String,
    },
    /// Skeleton shown while the row's chunk is still in flight.
    Placeholder,
}

/// Renders [`SearchEntry`] slots as [`EntryRow`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryRowRenderer;

impl RowRenderer<SearchEntry> for EntryRowRenderer {
    type Row = EntryRow;

    fn render(&mut self, entry: &SearchEntry, _index: usize) -> EntryRow {
        EntryRow::Entry {
            id: entry.id.clone(),
            entry_type: entry.entry_type,
            name: entry.name.clone(),
            subtitle: entry.subtitle.clone(),
            badge: entry.source_label.clone(),
            summary: entry.summary.clone(),
        }
    }

    fn placeholder(&mut self, _index: usize) -> EntryRow {
        EntryRow::Placeholder
    }
}
