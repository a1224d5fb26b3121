//! Virtualized list rendering: window arithmetic and row materialization.

pub mod renderer;
pub mod window;

pub use renderer::{
    EntryRow, EntryRowRenderer, FrameThrottle, PositionedRow, RenderedWindow, RowRenderer,
    VirtualList,
};
pub use window::{Viewport, VisibleWindow};
