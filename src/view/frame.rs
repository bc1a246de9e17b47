//! Frame abstraction for drawing primitives
//!
//! Provides a simple, safe API for pixel buffer operations and the [`Canvas`]
//! implementation that draws gutter labels into it with fontdue glyphs.

use crate::font::{FontHandle, FontdueFonts, GlyphCache};
use crate::theme::Color;

use super::{Canvas, Rect};

/// Blend a foreground color onto a background color using alpha compositing.
///
/// Both colors are in ARGB format (0xAARRGGBB). Returns the blended color
/// with full opacity (alpha = 0xFF).
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let bg_r = ((bg >> 16) & 0xFF) as f32;
    let bg_g = ((bg >> 8) & 0xFF) as f32;
    let bg_b = (bg & 0xFF) as f32;

    let fg_r = ((fg >> 16) & 0xFF) as f32;
    let fg_g = ((fg >> 8) & 0xFF) as f32;
    let fg_b = (fg & 0xFF) as f32;

    let final_r = (bg_r * (1.0 - alpha) + fg_r * alpha) as u32;
    let final_g = (bg_g * (1.0 - alpha) + fg_g * alpha) as u32;
    let final_b = (bg_b * (1.0 - alpha) + fg_b * alpha) as u32;

    0xFF000000 | (final_r << 16) | (final_g << 8) | final_b
}

/// Clipping rectangle in buffer pixels (inclusive start, exclusive end).
#[derive(Clone, Copy, Debug)]
struct ClipRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

/// A frame buffer wrapper providing safe drawing primitives.
///
/// The buffer covers the view-space rectangle starting at `origin_y`, so a
/// gutter can render a scrolled clip region into a viewport-sized buffer.
/// Out-of-bounds operations are safely clipped.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    origin_y: i32,
    clip: Option<ClipRect>,
}

impl<'a> Frame<'a> {
    /// Create a new frame from a mutable pixel buffer
    ///
    /// If the buffer is smaller than width*height, dimensions are adjusted
    /// to match the actual buffer size to prevent out-of-bounds access.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let expected_size = width * height;
        let actual_size = buffer.len();

        let (width, height) = if actual_size < expected_size && width > 0 {
            (width, actual_size / width)
        } else {
            (width, height)
        };

        Self {
            buffer,
            width,
            height,
            origin_y: 0,
            clip: None,
        }
    }

    /// View-space y coordinate of the buffer's first row
    pub fn with_origin_y(mut self, origin_y: i32) -> Self {
        self.origin_y = origin_y;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn origin_y(&self) -> i32 {
        self.origin_y
    }

    /// Set a clipping rectangle in view coordinates. All subsequent drawing
    /// operations will be constrained to this region.
    pub fn set_clip(&mut self, rect: Rect) {
        let y = rect.y - self.origin_y;
        let x0 = (rect.x.max(0) as usize).min(self.width);
        let y0 = (y.max(0) as usize).min(self.height);
        let x1 = (rect.right().max(0) as usize).min(self.width);
        let y1 = ((y + rect.height).max(0) as usize).min(self.height);
        self.clip = Some(ClipRect { x0, y0, x1, y1 });
    }

    /// Remove the clipping rectangle, restoring full-frame drawing.
    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    #[inline]
    fn max_x(&self) -> usize {
        self.clip.map_or(self.width, |c| c.x1)
    }

    #[inline]
    fn max_y(&self) -> usize {
        self.clip.map_or(self.height, |c| c.y1)
    }

    #[inline]
    fn min_x(&self) -> usize {
        self.clip.map_or(0, |c| c.x0)
    }

    #[inline]
    fn min_y(&self) -> usize {
        self.clip.map_or(0, |c| c.y0)
    }

    /// Clear the entire buffer with a solid color
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle (view coordinates) with a solid color
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let y = rect.y - self.origin_y;
        let x0 = (rect.x.max(0) as usize).max(self.min_x());
        let y0 = (y.max(0) as usize).max(self.min_y());
        let x1 = (rect.right().max(0) as usize).min(self.max_x());
        let y1 = ((y + rect.height).max(0) as usize).min(self.max_y());

        for py in y0..y1 {
            let row_start = py * self.width;
            for px in x0..x1 {
                self.buffer[row_start + px] = color;
            }
        }
    }

    /// Set a single pixel in buffer coordinates (bounds-checked, respects clip)
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x >= self.min_x() && x < self.max_x() && y >= self.min_y() && y < self.max_y() {
            self.buffer[y * self.width + x] = color;
        }
    }

    /// Get a single pixel in buffer coordinates (returns 0 if out of bounds)
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x]
        } else {
            0
        }
    }

    /// Blend a pixel with alpha (ARGB format, alpha in high byte)
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.min_x() || x >= self.max_x() || y < self.min_y() || y >= self.max_y() {
            return;
        }

        let idx = y * self.width + x;
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        if alpha >= 1.0 {
            self.buffer[idx] = color | 0xFF000000;
            return;
        }

        self.buffer[idx] = blend_colors(self.buffer[idx], color, alpha);
    }
}

/// Canvas drawing gutter labels into a [`Frame`] with fontdue glyphs.
///
/// With antialiasing off, glyph coverage is thresholded to fully on/off
/// pixels, matching the integer advances `FontdueFonts` measures with.
pub struct FramePainter<'a> {
    frame: Frame<'a>,
    fonts: &'a FontdueFonts,
    glyph_cache: &'a mut GlyphCache,
    antialias: bool,
}

impl<'a> FramePainter<'a> {
    pub fn new(
        frame: Frame<'a>,
        fonts: &'a FontdueFonts,
        glyph_cache: &'a mut GlyphCache,
        antialias: bool,
    ) -> Self {
        Self {
            frame,
            fonts,
            glyph_cache,
            antialias,
        }
    }

    pub fn frame(&self) -> &Frame<'a> {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame<'a> {
        &mut self.frame
    }
}

impl Canvas for FramePainter<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.frame.fill_rect(rect, color.to_argb_u32());
    }

    fn draw_text(&mut self, font: &FontHandle, x: i32, baseline_y: i32, text: &str, color: Color) {
        let color = color.to_argb_u32() | 0xFF000000;
        let baseline = (baseline_y - self.frame.origin_y) as f32;
        let mut current_x = x as f32;

        for ch in text.chars() {
            let glyph = self.fonts.rasterize(&mut *self.glyph_cache, font, ch);
            let Some((metrics, bitmap)) = glyph else {
                tracing::debug!(family = font.family(), "no font face available, label skipped");
                return;
            };

            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

            for bitmap_y in 0..metrics.height {
                for bitmap_x in 0..metrics.width {
                    let Some(&coverage) = bitmap.get(bitmap_y * metrics.width + bitmap_x) else {
                        continue;
                    };
                    let alpha = if self.antialias {
                        coverage
                    } else if coverage >= 128 {
                        0xFF
                    } else {
                        0
                    };
                    if alpha == 0 {
                        continue;
                    }

                    let px = current_x as isize + bitmap_x as isize + metrics.xmin as isize;
                    let py = (glyph_top + bitmap_y as f32) as isize;
                    if px < 0 || py < 0 {
                        continue;
                    }
                    let blended = (color & 0x00FF_FFFF) | ((alpha as u32) << 24);
                    self.frame.blend_pixel(px as usize, py as usize, blended);
                }
            }

            current_x += if self.antialias {
                metrics.advance_width
            } else {
                metrics.advance_width.round()
            };
        }
    }
}
