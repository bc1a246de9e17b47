//! Capabilities the gutter consumes from the host text view
//!
//! The host owns document storage, wrapping, caret placement and scrolling.
//! The gutter only queries it through these traits and never mutates it
//! beyond registering notifiers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::messages::Channel;
use crate::schedule::Notifier;
use crate::view::VerticalExtent;

/// Shared handle to the host editor. The host keeps its own clone.
pub type EditorRef<H> = Rc<RefCell<H>>;

/// Read-only queries over the host's logical line structure
pub trait LineIndexer {
    /// 0-based index of the logical line containing `offset`
    fn line_index_for_offset(&self, offset: usize) -> Result<usize>;

    /// Document offset at which logical line `line_index` starts
    fn line_start_offset(&self, line_index: usize) -> Result<usize>;

    /// The line index if `offset` is exactly the start of its logical line,
    /// `None` for offsets inside a line (e.g. wrapped continuation rows).
    fn line_start_index(&self, offset: usize) -> Result<Option<usize>> {
        let index = self.line_index_for_offset(offset)?;
        let start = self.line_start_offset(index)?;
        Ok((start == offset).then_some(index))
    }
}

/// Read-only queries over the host's pixel layout
pub trait MetricsProvider {
    /// Nearest document offset to a point in view coordinates
    fn point_to_offset(&self, x: i32, y: i32) -> usize;

    /// Vertical extent of the visual row containing `offset`
    fn offset_to_vertical_extent(&self, offset: usize) -> Result<VerticalExtent>;

    /// Last offset of the visual row containing `offset`; the next row
    /// starts one past it.
    fn row_end_offset(&self, offset: usize) -> Result<usize>;
}

/// Everything the gutter needs from the host editor
pub trait EditorHost: LineIndexer + MetricsProvider {
    fn caret_offset(&self) -> usize;

    /// Descent of the host's text font in pixels
    fn font_descent(&self) -> i32;

    /// Height of the host component in pixels
    fn host_height(&self) -> i32;

    /// Register a notifier for one change channel
    fn subscribe(&mut self, channel: Channel, notifier: Notifier);
}
