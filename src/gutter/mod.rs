//! The line-number gutter widget
//!
//! A side panel for a host text view: one right-aligned number per logical
//! line, drawn beside the first visual row of that line, with the caret's
//! line in a highlight color. The gutter keeps its own width in step with
//! the widest label it has painted.
//!
//! The widget never paints on its own. Host notifications go through the
//! [`RepaintQueue`]; the host calls [`GutterWidget::on_idle`] at the next idle
//! point and [`GutterWidget::render`] whenever it redraws the gutter.

mod label;
mod paint;
mod width;

pub use label::{format_line_number, LineLabel, VisibleRange, MIN_DIGITS};
pub use width::{calculate_margin_width, MARGIN_SCALE};

use std::rc::Rc;

use crate::commands::Cmd;
use crate::config::{platform_antialias, GutterConfig};
use crate::error::{GutterError, Result};
use crate::font::{FontHandle, FontSpec, FontSystem};
use crate::host::{EditorHost, EditorRef};
use crate::messages::Channel;
use crate::schedule::{Notifier, RepaintQueue, RepaintState};
use crate::theme::GutterPalette;
use crate::view::Size;

/// Settings a gutter is built from
#[derive(Debug, Clone, PartialEq)]
pub struct GutterOptions {
    pub enabled: bool,
    pub font: FontSpec,
    pub palette: GutterPalette,
    /// Distance of the labels from the gutter's left edge
    pub left_inset: i32,
    pub antialias: bool,
}

impl Default for GutterOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            font: FontSpec::default(),
            palette: GutterPalette::default(),
            left_inset: 2,
            antialias: platform_antialias(),
        }
    }
}

impl GutterOptions {
    pub fn from_config(config: &GutterConfig) -> Self {
        Self {
            enabled: config.enabled,
            font: FontSpec::sanitized(Some(config.font_family.as_str()), config.font_size),
            palette: config.theme().gutter,
            left_inset: config.left_inset,
            antialias: config.antialias(),
        }
    }
}

pub struct GutterWidget<H, F> {
    editor: EditorRef<H>,
    fonts: F,
    queue: Rc<RepaintQueue>,
    subscribed: bool,
    enabled: bool,
    margin_width: i32,
    /// Requested family and size
    font_spec: FontSpec,
    /// Handle for `font_spec`, replaced only when the request changes
    font: FontHandle,
    size: Size,
    palette: GutterPalette,
    left_inset: i32,
    antialias: bool,
}

impl<H: EditorHost, F: FontSystem> GutterWidget<H, F> {
    /// Build a gutter for `editor` with the default palette.
    ///
    /// An empty family or a size <= 1 falls back to the default monospace
    /// font at 14pt.
    pub fn create(
        editor: Option<EditorRef<H>>,
        fonts: F,
        enabled: bool,
        font_family: Option<&str>,
        font_size_pt: i32,
    ) -> Result<Self> {
        let options = GutterOptions {
            enabled,
            font: FontSpec::sanitized(font_family, font_size_pt),
            ..GutterOptions::default()
        };
        Self::with_options(editor, fonts, options)
    }

    /// Build a gutter from user configuration
    pub fn from_config(
        editor: Option<EditorRef<H>>,
        fonts: F,
        config: &GutterConfig,
    ) -> Result<Self> {
        Self::with_options(editor, fonts, GutterOptions::from_config(config))
    }

    pub fn with_options(
        editor: Option<EditorRef<H>>,
        fonts: F,
        options: GutterOptions,
    ) -> Result<Self> {
        let editor = editor.ok_or_else(|| {
            GutterError::InvalidArgument("a host editor is required".to_string())
        })?;

        let font = FontHandle::new(options.font.clone());
        let mut widget = Self {
            editor,
            fonts,
            queue: RepaintQueue::new(options.enabled),
            subscribed: false,
            enabled: options.enabled,
            margin_width: 0,
            font_spec: options.font,
            font,
            size: Size::default(),
            palette: options.palette,
            left_inset: options.left_inset,
            antialias: options.antialias,
        };

        if widget.enabled {
            widget.margin_width = widget.calculate_margin_width(MIN_DIGITS);
            widget.subscribe()?;
        }
        widget.update_size();

        tracing::debug!(
            enabled = widget.enabled,
            family = widget.font.family(),
            size_pt = widget.font.size_pt(),
            margin_width = widget.margin_width,
            "gutter created"
        );
        Ok(widget)
    }

    /// Register a notifier per channel with the host. Happens once; later
    /// enables re-activate the queue the existing notifiers feed.
    fn subscribe(&mut self) -> Result<()> {
        if self.subscribed {
            return Ok(());
        }
        let mut editor = self.editor.try_borrow_mut().map_err(|_| {
            GutterError::InvalidArgument("host editor is borrowed elsewhere".to_string())
        })?;
        for channel in Channel::ALL {
            editor.subscribe(channel, Notifier::new(channel, Rc::clone(&self.queue)));
        }
        self.subscribed = true;
        Ok(())
    }

    /// Change the label font. The handle is only replaced if family or size
    /// actually differ; the resulting width change is picked up by the next
    /// paint pass.
    pub fn set_font(&mut self, family: &str, size_pt: i32) {
        self.font_spec = FontSpec::sanitized(Some(family), size_pt);
        self.refresh_font();
        self.update_size();
        self.queue.schedule_resize();
    }

    /// Show or hide the numbers. Enabling resets the width to the
    /// `MIN_DIGITS` baseline; disabling collapses it to zero.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.enabled = enabled;
        self.refresh_font();
        if enabled {
            self.subscribe()?;
            self.queue.set_active(true);
            self.margin_width = self.calculate_margin_width(MIN_DIGITS);
        } else {
            self.queue.set_active(false);
            self.margin_width = 0;
        }
        self.update_size();
        self.queue.schedule_resize();
        tracing::debug!(enabled, margin_width = self.margin_width, "gutter toggled");
        Ok(())
    }

    /// Run deferred work at an idle point of the UI thread.
    ///
    /// Returns the pending resize and at most one redraw, however many
    /// notifications arrived since the last call.
    pub fn on_idle(&mut self) -> Cmd {
        let resize = if self.queue.take_resize() {
            self.update_size();
            Cmd::Resize(self.size)
        } else {
            Cmd::None
        };
        let redraw = if self.queue.take_repaint() {
            Cmd::Redraw
        } else {
            Cmd::None
        };
        Cmd::batch(vec![resize, redraw])
    }

    /// Width for `digits` digits in the current font
    pub fn calculate_margin_width(&self, digits: usize) -> i32 {
        calculate_margin_width(
            &self.fonts,
            Some(&self.font),
            self.font_spec.size_pt,
            digits,
            self.antialias,
        )
    }

    /// Replace the font handle if the requested family or size changed
    fn refresh_font(&mut self) -> bool {
        if self
            .font
            .matches(&self.font_spec.family, self.font_spec.size_pt)
        {
            return false;
        }
        self.font = FontHandle::new(self.font_spec.clone());
        tracing::debug!(
            family = self.font.family(),
            size_pt = self.font.size_pt(),
            "gutter font changed"
        );
        true
    }

    /// Preferred size follows the margin width and the host's height
    fn update_size(&mut self) {
        let height = match self.editor.try_borrow() {
            Ok(editor) => editor.host_height(),
            Err(_) => {
                tracing::debug!("host editor busy, keeping previous gutter height");
                self.size.height
            }
        };
        self.size = Size::new(self.margin_width, height);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn margin_width(&self) -> i32 {
        self.margin_width
    }

    pub fn font(&self) -> &FontHandle {
        &self.font
    }

    pub fn preferred_size(&self) -> Size {
        self.size
    }

    pub fn preferred_width(&self) -> i32 {
        self.size.width
    }

    pub fn preferred_height(&self) -> i32 {
        self.size.height
    }

    pub fn palette(&self) -> &GutterPalette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: GutterPalette) {
        if self.palette != palette {
            self.palette = palette;
            self.queue.schedule();
        }
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn repaint_state(&self) -> RepaintState {
        self.queue.state()
    }

    /// Number of repaint requests folded into an already pending repaint
    pub fn coalesced_repaints(&self) -> u64 {
        self.queue.coalesced_count()
    }

    pub fn editor(&self) -> &EditorRef<H> {
        &self.editor
    }

    pub fn fonts(&self) -> &F {
        &self.fonts
    }
}
