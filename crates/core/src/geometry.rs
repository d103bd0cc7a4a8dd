//! Integer page geometry.
//!
//! Rectangles use image coordinates (origin at the top-left corner, y growing
//! downwards) and half-open extents: a rectangle covers `[x, x + width)`
//! horizontally and `[y, y + height)` vertically.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with integer pixel coordinates.
///
/// A zero width or height is valid and denotes a point or a segment; such a
/// rectangle never intersects anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    /// Zero-sized rectangle located at `(x, y)`.
    pub const fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }

    /// Returns a copy grown by `dx` on the left and right and by `dy` on the
    /// top and bottom.
    ///
    /// Coordinates saturate at the `i32` bounds.
    pub fn grown(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_sub(dx),
            y: self.y.saturating_sub(dy),
            width: self.width.saturating_add(dx.saturating_mul(2)),
            height: self.height.saturating_add(dy.saturating_mul(2)),
        }
    }

    /// True when the rectangle covers no pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when either extent is negative.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Half-open intersection test. Empty rectangles never intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        i64::from(self.x) < other.right()
            && i64::from(other.x) < self.right()
            && i64::from(self.y) < other.bottom()
            && i64::from(other.y) < self.bottom()
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[x={},y={},w={},h={}]",
            self.x, self.y, self.width, self.height
        )
    }
}
