//! Per-pass paint data: the visible offset range and the labels in it

use serde::Serialize;

use crate::host::MetricsProvider;
use crate::view::Rect;

/// Labels are padded to at least this many characters and the margin is
/// never narrower than this many digits.
pub const MIN_DIGITS: usize = 3;

/// Document offsets covered by a clip rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl VisibleRange {
    /// Map the clip's top and bottom edges to document offsets
    pub fn from_clip<M: MetricsProvider + ?Sized>(metrics: &M, clip: Rect) -> Self {
        Self {
            start_offset: metrics.point_to_offset(0, clip.y),
            end_offset: metrics.point_to_offset(0, clip.bottom()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset > self.end_offset
    }
}

/// A number to draw beside one visual row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineLabel {
    /// 1-based logical line number
    pub line_number: usize,
    pub baseline_y: i32,
    pub is_current_line: bool,
    /// Formatted text, padded to `MIN_DIGITS`
    pub text: String,
}

impl LineLabel {
    pub fn new(line_number: usize, baseline_y: i32, is_current_line: bool) -> Self {
        Self {
            line_number,
            baseline_y,
            is_current_line,
            text: format_line_number(line_number),
        }
    }

    /// Width of the label in characters
    pub fn digits(&self) -> usize {
        self.text.len()
    }
}

/// Right-align a line number in a field of at least `MIN_DIGITS` characters
pub fn format_line_number(line_number: usize) -> String {
    format!("{:>width$}", line_number, width = MIN_DIGITS)
}
