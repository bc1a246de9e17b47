//! View module - drawing surfaces and geometry
//!
//! The gutter draws through the [`Canvas`] trait so it can paint into a
//! pixel [`Frame`] (via [`FramePainter`]) or any other surface a host uses.

pub mod frame;
pub mod geometry;

pub use frame::{blend_colors, Frame, FramePainter};
pub use geometry::{Rect, Size, VerticalExtent};

use crate::font::FontHandle;
use crate::theme::Color;

/// A drawing surface provided by the host for one paint pass
pub trait Canvas {
    /// Fill a rectangle (view coordinates) with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `text` with its baseline at `baseline_y`, starting at `x`
    fn draw_text(&mut self, font: &FontHandle, x: i32, baseline_y: i32, text: &str, color: Color);
}
