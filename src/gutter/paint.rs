//! Paint pass: clip rectangle → visible rows → labels → width check

use crate::commands::Cmd;
use crate::error::Result;
use crate::font::FontSystem;
use crate::host::EditorHost;
use crate::view::{Canvas, Rect};

use super::{GutterWidget, LineLabel, VisibleRange, MIN_DIGITS};

/// Labels found in one pass and the widest of them. Never stored.
struct LabelPass {
    labels: Vec<LineLabel>,
    max_digits: usize,
    /// False if the host failed in a way that ended the pass early
    complete: bool,
}

impl<H: EditorHost, F: FontSystem> GutterWidget<H, F> {
    /// Paint the numbers for the rows intersecting `clip`.
    ///
    /// Rows whose offsets went stale are skipped with a warning; any other
    /// host error ends the pass and leaves the width alone. If the labels
    /// painted need a different width than the one in effect when the pass
    /// started, the width is updated, a repaint is scheduled and the new
    /// preferred size is returned as `Cmd::Resize`. After
    /// [`MAX_SELF_CORRECTIONS`](crate::schedule::MAX_SELF_CORRECTIONS)
    /// consecutive resizes the width only grows until the next document edit
    /// or caret move.
    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C, clip: Rect) -> Cmd {
        if !self.enabled {
            return Cmd::None;
        }
        self.refresh_font();

        let Some(pass) = self.layout_labels(clip) else {
            return Cmd::None;
        };
        let start_margin_width = self.margin_width;

        canvas.fill_rect(clip, self.palette.background);
        for label in &pass.labels {
            let color = if label.is_current_line {
                self.palette.current_line_number
            } else {
                self.palette.line_number
            };
            canvas.draw_text(&self.font, self.left_inset, label.baseline_y, &label.text, color);
        }
        if !pass.complete {
            return Cmd::None;
        }

        let wanted = self.calculate_margin_width(pass.max_digits.max(MIN_DIGITS));
        // Out of corrections: the width may only grow
        self.margin_width = if self.queue.corrections_exhausted() {
            wanted.max(start_margin_width)
        } else {
            wanted
        };
        if self.margin_width == start_margin_width {
            if wanted == start_margin_width {
                self.queue.settle();
            }
            return Cmd::None;
        }

        tracing::debug!(
            from = start_margin_width,
            to = self.margin_width,
            digits = pass.max_digits,
            "gutter width changed"
        );
        self.update_size();
        if self.queue.try_self_correct() {
            self.queue.schedule();
        } else {
            tracing::warn!(
                width = self.margin_width,
                "gutter width keeps changing between passes, not scheduling another repaint"
            );
        }
        Cmd::Resize(self.size)
    }

    /// Labels `render` would draw for `clip`, without drawing or resizing
    pub fn visible_labels(&self, clip: Rect) -> Vec<LineLabel> {
        if !self.enabled {
            return Vec::new();
        }
        self.layout_labels(clip)
            .map(|pass| pass.labels)
            .unwrap_or_default()
    }

    fn layout_labels(&self, clip: Rect) -> Option<LabelPass> {
        let Ok(editor) = self.editor.try_borrow() else {
            tracing::warn!("host editor is mutably borrowed, skipping gutter paint");
            return None;
        };
        let editor = &*editor;

        let range = VisibleRange::from_clip(editor, clip);
        let descent = editor.font_descent();
        let caret_line = match editor.line_index_for_offset(editor.caret_offset()) {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, "cannot resolve caret line, no row highlighted");
                None
            }
        };

        let mut pass = LabelPass {
            labels: Vec::new(),
            max_digits: 0,
            complete: true,
        };
        let mut offset = range.start_offset;
        while offset <= range.end_offset {
            match row_label(editor, offset, descent, caret_line) {
                Ok(Some(label)) => {
                    pass.max_digits = pass.max_digits.max(label.digits());
                    pass.labels.push(label);
                }
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(offset, error = %e, "skipping gutter row")
                }
                Err(e) => {
                    tracing::error!(
                        offset,
                        error = %e,
                        "host failed during gutter layout, ending pass"
                    );
                    pass.complete = false;
                    break;
                }
            }
            offset = next_row_start(editor, offset);
        }

        tracing::trace!(
            start = range.start_offset,
            end = range.end_offset,
            labels = pass.labels.len(),
            "gutter layout pass"
        );
        Some(pass)
    }
}

/// Label for the row starting at `offset`, or `None` for a wrapped
/// continuation row.
fn row_label<H: EditorHost + ?Sized>(
    editor: &H,
    offset: usize,
    descent: i32,
    caret_line: Option<usize>,
) -> Result<Option<LineLabel>> {
    let Some(line_index) = editor.line_start_index(offset)? else {
        return Ok(None);
    };
    let extent = editor.offset_to_vertical_extent(offset)?;
    Ok(Some(LineLabel::new(
        line_index + 1,
        extent.baseline(descent),
        caret_line == Some(line_index),
    )))
}

/// Start of the visual row after the one at `offset`; always past `offset`
fn next_row_start<H: EditorHost + ?Sized>(editor: &H, offset: usize) -> usize {
    let next = match editor.row_end_offset(offset) {
        Ok(row_end) => row_end + 1,
        Err(e) => {
            tracing::warn!(offset, error = %e, "cannot find row end, moving to next line");
            editor
                .line_index_for_offset(offset)
                .and_then(|line| editor.line_start_offset(line + 1))
                .unwrap_or(offset + 1)
        }
    };
    next.max(offset + 1)
}
