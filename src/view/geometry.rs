//! Geometry primitives shared by the gutter, the host traits and the frame
//!
//! All coordinates are in pixels in the text view's coordinate space: y = 0
//! is the top of the first row of the document, not the top of the viewport.

use serde::Serialize;

/// An axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection of two rectangles (empty rect at origin if disjoint)
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            Rect::default()
        } else {
            Rect::new(x0, y0, x1 - x0, y1 - y0)
        }
    }
}

/// Preferred size of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Vertical placement of the row holding a document offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalExtent {
    pub top: i32,
    pub height: i32,
}

impl VerticalExtent {
    /// Baseline for text whose font has the given descent
    #[inline]
    pub fn baseline(&self, descent: i32) -> i32 {
        self.top + self.height - descent
    }
}
