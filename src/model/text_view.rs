//! Reference host: a rope-backed text view with fixed-pitch character wrapping
//!
//! Every visual row is `line_height` pixels tall. With a wrap width set, a
//! logical line of `n` characters occupies `max(1, ceil(n / wrap))` rows.
//! Offsets are char indices into the rope.

use std::ops::Range;
use std::path::Path;

use ropey::Rope;

use crate::error::{GutterError, Result};
use crate::host::{EditorHost, EditorRef, LineIndexer, MetricsProvider};
use crate::messages::{Channel, DocumentChange, GeometryChange, Notification};
use crate::schedule::Notifier;
use crate::view::VerticalExtent;

/// Pixel metrics of the host's text font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub line_height: i32,
    pub descent: i32,
    pub char_width: i32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            line_height: 17,
            descent: 4,
            char_width: 8,
        }
    }
}

#[derive(Debug)]
pub struct TextView {
    buffer: Rope,
    metrics: TextMetrics,
    /// Wrap width in characters (None = no wrapping)
    wrap_columns: Option<usize>,
    caret: usize,
    visible: bool,
    /// First visual row of each logical line, plus the total row count
    row_starts: Vec<usize>,
    listeners: Vec<Notifier>,
}

impl TextView {
    pub fn new(text: &str) -> Self {
        let mut view = Self {
            buffer: Rope::from(text),
            metrics: TextMetrics::default(),
            wrap_columns: None,
            caret: 0,
            visible: true,
            row_starts: Vec::new(),
            listeners: Vec::new(),
        };
        view.rebuild_rows();
        view
    }

    pub fn from_file(path: &Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(&content))
    }

    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = TextMetrics {
            line_height: metrics.line_height.max(1),
            descent: metrics.descent.max(0),
            char_width: metrics.char_width.max(1),
        };
        self
    }

    pub fn with_wrap(mut self, wrap_columns: Option<usize>) -> Self {
        self.wrap_columns = wrap_columns.filter(|&w| w > 0);
        self.rebuild_rows();
        self
    }

    /// Wrap in a shared handle the gutter can hold
    pub fn into_shared(self) -> EditorRef<Self> {
        std::rc::Rc::new(std::cell::RefCell::new(self))
    }

    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    pub fn metrics(&self) -> TextMetrics {
        self.metrics
    }

    pub fn wrap_columns(&self) -> Option<usize> {
        self.wrap_columns
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Total number of visual rows
    pub fn row_count(&self) -> usize {
        self.row_starts.last().copied().unwrap_or(0)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // === Edits ===

    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        self.check_offset(char_idx)?;
        if text.is_empty() {
            return Ok(());
        }
        self.buffer.insert(char_idx, text);
        self.rebuild_rows();
        self.notify(Notification::Document(DocumentChange::Inserted));

        if self.caret >= char_idx {
            self.caret += text.chars().count();
            self.notify(Notification::CaretMoved);
        }
        Ok(())
    }

    pub fn remove(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end {
            return Err(GutterError::InvalidArgument(format!(
                "reversed range {}..{}",
                range.start, range.end
            )));
        }
        self.check_offset(range.end)?;
        if range.is_empty() {
            return Ok(());
        }
        self.buffer.remove(range.clone());
        self.rebuild_rows();
        self.notify(Notification::Document(DocumentChange::Removed));

        if self.caret > range.start {
            self.caret = if self.caret >= range.end {
                self.caret - range.len()
            } else {
                range.start
            };
            self.notify(Notification::CaretMoved);
        }
        Ok(())
    }

    /// Replace the whole document, keeping the caret clamped to the new text
    pub fn replace_all(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.rebuild_rows();
        self.notify(Notification::Document(DocumentChange::Replaced));

        let clamped = self.caret.min(self.buffer.len_chars());
        if clamped != self.caret {
            self.caret = clamped;
            self.notify(Notification::CaretMoved);
        }
    }

    pub fn set_caret(&mut self, offset: usize) -> Result<()> {
        self.check_offset(offset)?;
        if offset != self.caret {
            self.caret = offset;
            self.notify(Notification::CaretMoved);
        }
        Ok(())
    }

    /// Move the caret to the start of a 0-based logical line
    pub fn set_caret_line(&mut self, line_index: usize) -> Result<()> {
        let offset = self.line_start_offset(line_index)?;
        self.set_caret(offset)
    }

    /// Change the wrap width, as a resize of the host component would
    pub fn set_wrap(&mut self, wrap_columns: Option<usize>) {
        let wrap_columns = wrap_columns.filter(|&w| w > 0);
        if wrap_columns == self.wrap_columns {
            return;
        }
        self.wrap_columns = wrap_columns;
        self.rebuild_rows();
        self.notify(Notification::Geometry(GeometryChange::Resized));
    }

    pub fn move_to(&mut self) {
        self.notify(Notification::Geometry(GeometryChange::Moved));
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.notify(Notification::Geometry(if visible {
            GeometryChange::Shown
        } else {
            GeometryChange::Hidden
        }));
    }

    // === Layout helpers ===

    fn check_offset(&self, offset: usize) -> Result<()> {
        let len = self.buffer.len_chars();
        if offset > len {
            return Err(GutterError::StaleOffset { offset, len });
        }
        Ok(())
    }

    /// Offset one past the last character of a line, excluding its line break
    fn line_end(&self, line_index: usize) -> usize {
        if line_index + 1 >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        let next_start = self.buffer.line_to_char(line_index + 1);
        let crlf = next_start >= 2
            && self.buffer.char(next_start - 2) == '\r'
            && self.buffer.char(next_start - 1) == '\n';
        if crlf {
            next_start - 2
        } else {
            next_start - 1
        }
    }

    /// Characters in a line, excluding its line break
    fn line_len(&self, line_index: usize) -> usize {
        self.line_end(line_index) - self.buffer.line_to_char(line_index)
    }

    fn rows_in_line(&self, line_index: usize) -> usize {
        match self.wrap_columns {
            Some(wrap) => self.line_len(line_index).div_ceil(wrap).max(1),
            None => 1,
        }
    }

    fn rebuild_rows(&mut self) {
        let lines = self.buffer.len_lines();
        let mut row_starts = Vec::with_capacity(lines + 1);
        let mut row = 0;
        for line_index in 0..lines {
            row_starts.push(row);
            row += self.rows_in_line(line_index);
        }
        row_starts.push(row);
        self.row_starts = row_starts;
    }

    /// Logical line, its start offset, and the sub-row `offset` falls in
    fn locate(&self, offset: usize) -> Result<(usize, usize, usize)> {
        self.check_offset(offset)?;
        let line_index = self.buffer.char_to_line(offset);
        let line_start = self.buffer.line_to_char(line_index);
        let sub_row = match self.wrap_columns {
            Some(wrap) => ((offset - line_start) / wrap).min(self.rows_in_line(line_index) - 1),
            None => 0,
        };
        Ok((line_index, line_start, sub_row))
    }

    fn notify(&self, notification: Notification) {
        let channel = notification.channel();
        for listener in self.listeners.iter().filter(|l| l.channel() == channel) {
            listener.notify(notification);
        }
    }
}

impl LineIndexer for TextView {
    fn line_index_for_offset(&self, offset: usize) -> Result<usize> {
        self.check_offset(offset)?;
        Ok(self.buffer.char_to_line(offset))
    }

    fn line_start_offset(&self, line_index: usize) -> Result<usize> {
        if line_index >= self.buffer.len_lines() {
            return Err(GutterError::InvalidArgument(format!(
                "line {} out of range ({} lines)",
                line_index,
                self.buffer.len_lines()
            )));
        }
        Ok(self.buffer.line_to_char(line_index))
    }
}

impl MetricsProvider for TextView {
    fn point_to_offset(&self, x: i32, y: i32) -> usize {
        if y < 0 {
            return 0;
        }
        let row = (y / self.metrics.line_height) as usize;
        if row >= self.row_count() {
            return self.buffer.len_chars();
        }

        let line_index = self.row_starts.partition_point(|&start| start <= row) - 1;
        let line_start = self.buffer.line_to_char(line_index);
        let line_len = self.line_len(line_index);
        let sub_row = row - self.row_starts[line_index];
        let row_start = match self.wrap_columns {
            Some(wrap) => sub_row * wrap,
            None => 0,
        };
        let row_width = self
            .wrap_columns
            .unwrap_or(usize::MAX)
            .min(line_len - row_start.min(line_len));
        let column = (x.max(0) / self.metrics.char_width) as usize;
        line_start + row_start + column.min(row_width)
    }

    fn offset_to_vertical_extent(&self, offset: usize) -> Result<VerticalExtent> {
        let (line_index, _, sub_row) = self.locate(offset)?;
        let row = self.row_starts[line_index] + sub_row;
        Ok(VerticalExtent {
            top: row as i32 * self.metrics.line_height,
            height: self.metrics.line_height,
        })
    }

    fn row_end_offset(&self, offset: usize) -> Result<usize> {
        let (line_index, line_start, sub_row) = self.locate(offset)?;
        match self.wrap_columns {
            Some(wrap) if sub_row + 1 < self.rows_in_line(line_index) => {
                Ok(line_start + (sub_row + 1) * wrap - 1)
            }
            // The last row runs up to the line break, or to the document end
            _ if line_index + 1 < self.buffer.len_lines() => {
                Ok(self.buffer.line_to_char(line_index + 1) - 1)
            }
            _ => Ok(self.buffer.len_chars()),
        }
    }
}

impl EditorHost for TextView {
    fn caret_offset(&self) -> usize {
        self.caret
    }

    fn font_descent(&self) -> i32 {
        self.metrics.descent
    }

    fn host_height(&self) -> i32 {
        self.row_count() as i32 * self.metrics.line_height
    }

    fn subscribe(&mut self, channel: Channel, notifier: Notifier) {
        tracing::trace!(?channel, "gutter subscribed to text view");
        self.listeners.push(notifier);
    }
}
