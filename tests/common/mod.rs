//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use line_gutter::error::{GutterError, Result};
use line_gutter::font::{FontHandle, FontSpec, FontSystem};
use line_gutter::gutter::{GutterOptions, GutterWidget};
use line_gutter::host::{EditorHost, EditorRef, LineIndexer, MetricsProvider};
use line_gutter::messages::Channel;
use line_gutter::model::{TextMetrics, TextView};
use line_gutter::schedule::Notifier;
use line_gutter::theme::{Color, GutterPalette};
use line_gutter::view::{Canvas, Rect, VerticalExtent};

/// Row height of the default text metrics
pub const LINE_HEIGHT: i32 = 17;
/// Descent of the default text metrics
pub const DESCENT: i32 = 4;

/// Every digit advances by the same width, so margin widths are easy to
/// compute by hand: 7px advances give 26px for 3 digits, 34px for 4.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance(pub f32);

impl FontSystem for FixedAdvance {
    fn measure_width(&self, _font: &FontHandle, text: &str, antialias: bool) -> Option<f32> {
        let advance = if antialias { self.0 } else { self.0.round() };
        Some(text.chars().count() as f32 * advance)
    }
}

/// Advance width that depends on the font size, 0.5px per point
#[derive(Debug, Clone, Copy)]
pub struct SizeProportional;

impl FontSystem for SizeProportional {
    fn measure_width(&self, font: &FontHandle, text: &str, _antialias: bool) -> Option<f32> {
        Some(text.chars().count() as f32 * font.size_pt() as f32 * 0.5)
    }
}

/// Advance width alternates between two values on every measurement, so
/// every paint pass disagrees with the previous one.
#[derive(Debug, Default)]
pub struct AlternatingAdvance {
    calls: Cell<u32>,
}

impl FontSystem for AlternatingAdvance {
    fn measure_width(&self, _font: &FontHandle, text: &str, _antialias: bool) -> Option<f32> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        let advance = if call % 2 == 0 { 7.0 } else { 9.0 };
        Some(text.chars().count() as f32 * advance)
    }
}

/// One drawing operation captured by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Fill(Rect, Color),
    Text {
        spec: FontSpec,
        x: i32,
        baseline_y: i32,
        text: String,
        color: Color,
    },
}

/// Canvas that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text operations only, in drawing order
    pub fn texts(&self) -> Vec<(String, i32, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Text {
                    text,
                    baseline_y,
                    color,
                    ..
                } => Some((text.clone(), *baseline_y, *color)),
                CanvasOp::Fill(..) => None,
            })
            .collect()
    }

    /// Label texts with surrounding padding removed
    pub fn numbers(&self) -> Vec<usize> {
        self.texts()
            .iter()
            .filter_map(|(text, _, _)| text.trim().parse().ok())
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(CanvasOp::Fill(rect, color));
    }

    fn draw_text(&mut self, font: &FontHandle, x: i32, baseline_y: i32, text: &str, color: Color) {
        self.ops.push(CanvasOp::Text {
            spec: font.spec().clone(),
            x,
            baseline_y,
            text: text.to_string(),
            color,
        });
    }
}

/// `n` lines of text ("line 1" .. "line n"), no trailing newline
pub fn numbered_text(n: usize) -> String {
    (1..=n)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn test_view(text: &str) -> EditorRef<TextView> {
    TextView::new(text)
        .with_metrics(TextMetrics::default())
        .into_shared()
}

pub fn wrapped_view(text: &str, wrap_columns: usize) -> EditorRef<TextView> {
    TextView::new(text)
        .with_wrap(Some(wrap_columns))
        .into_shared()
}

/// Options with the classic palette and integer advances
pub fn test_options() -> GutterOptions {
    GutterOptions {
        enabled: true,
        font: FontSpec::plain("Mono", 12),
        palette: GutterPalette::classic(),
        left_inset: 2,
        antialias: false,
    }
}

/// An enabled gutter over `editor` measuring with 7px digits
pub fn test_gutter<H: EditorHost>(editor: &EditorRef<H>) -> GutterWidget<H, FixedAdvance> {
    GutterWidget::with_options(Some(Rc::clone(editor)), FixedAdvance(7.0), test_options())
        .unwrap()
}

/// Clip covering the whole document of a text view
pub fn full_clip(editor: &EditorRef<TextView>, width: i32) -> Rect {
    Rect::new(0, 0, width, editor.borrow().host_height())
}

/// Baseline of the label for visual row `row`
pub fn baseline_for_row(row: i32) -> i32 {
    row * LINE_HEIGHT + LINE_HEIGHT - DESCENT
}

/// Host whose line index cannot resolve one line's start offset. By default
/// it reports a stale offset, as if the document changed between two queries
/// of the same paint pass.
pub struct FlakyHost {
    pub inner: TextView,
    pub poisoned_line: usize,
    pub failure: Option<GutterError>,
}

impl FlakyHost {
    pub fn new(text: &str, poisoned_line: usize) -> Self {
        Self {
            inner: TextView::new(text),
            poisoned_line,
            failure: None,
        }
    }

    /// Fail the poisoned line with `error` instead of a stale offset
    pub fn failing_with(mut self, error: GutterError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl LineIndexer for FlakyHost {
    fn line_index_for_offset(&self, offset: usize) -> Result<usize> {
        self.inner.line_index_for_offset(offset)
    }

    fn line_start_offset(&self, line_index: usize) -> Result<usize> {
        if line_index == self.poisoned_line {
            return Err(self.failure.clone().unwrap_or(GutterError::StaleOffset {
                offset: line_index,
                len: self.inner.len_chars(),
            }));
        }
        self.inner.line_start_offset(line_index)
    }
}

impl MetricsProvider for FlakyHost {
    fn point_to_offset(&self, x: i32, y: i32) -> usize {
        self.inner.point_to_offset(x, y)
    }

    fn offset_to_vertical_extent(&self, offset: usize) -> Result<VerticalExtent> {
        self.inner.offset_to_vertical_extent(offset)
    }

    fn row_end_offset(&self, offset: usize) -> Result<usize> {
        self.inner.row_end_offset(offset)
    }
}

impl EditorHost for FlakyHost {
    fn caret_offset(&self) -> usize {
        self.inner.caret_offset()
    }

    fn font_descent(&self) -> i32 {
        self.inner.font_descent()
    }

    fn host_height(&self) -> i32 {
        self.inner.host_height()
    }

    fn subscribe(&mut self, channel: Channel, notifier: Notifier) {
        self.inner.subscribe(channel, notifier);
    }
}
