//! Abscissa-sorted rectangle index.
//!
//! Rectangles are kept sorted on their `x` value. A candidate is located by
//! binary search and only the neighbours whose abscissa lies within
//! `[rect.x - max_width + 1, rect.x + rect.width - 1]` are tested for
//! intersection: any rectangle outside that window cannot overlap the
//! candidate horizontally, given that no rectangle is wider than `max_width`.

use crate::geometry::Rect;

/// Result of one windowed collision scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Scan {
    /// Position of the first colliding rectangle, if any.
    hit: Option<usize>,
    /// Number of rectangles tested.
    visited: usize,
}

/// A list of rectangles kept sorted on abscissa.
#[derive(Clone, Debug, Default)]
pub struct AbscissaIndex {
    boxes: Vec<Rect>,
    max_width: i32,
}

impl AbscissaIndex {
    /// Builds the index from unsorted rectangles.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut boxes: Vec<Rect> = rects.into_iter().collect();
        boxes.sort_by_key(|r| r.x);
        let max_width = boxes.iter().map(|r| r.width).max().unwrap_or(0).max(0);
        Self { boxes, max_width }
    }

    /// Theoretical insertion index of `rect` in the sorted list.
    ///
    /// Ties on `x` resolve to the first rectangle of the tie run.
    #[inline]
    pub fn insertion_index(&self, rect: &Rect) -> usize {
        self.boxes.partition_point(|r| r.x < rect.x)
    }

    /// Tells whether `rect` would intersect any indexed rectangle, scanning
    /// only the abscissa window allowed by `max_width`.
    pub fn would_collide(&self, rect: &Rect, max_width: i32) -> bool {
        self.scan(rect, max_width).hit.is_some()
    }

    fn scan(&self, rect: &Rect, max_width: i32) -> Scan {
        let x_max = rect.right() - 1;
        let x_min = i64::from(rect.x) - i64::from(max_width) + 1;
        let index = self.insertion_index(rect);
        let mut visited = 0;

        // Check for collisions on right
        for (i, r) in self.boxes.iter().enumerate().skip(index) {
            if i64::from(r.x) > x_max {
                break;
            }
            visited += 1;
            if r.intersects(rect) {
                return Scan {
                    hit: Some(i),
                    visited,
                };
            }
        }

        // Check for collisions on left
        for (i, r) in self.boxes[..index].iter().enumerate().rev() {
            if i64::from(r.x) < x_min {
                break;
            }
            visited += 1;
            if r.intersects(rect) {
                return Scan {
                    hit: Some(i),
                    visited,
                };
            }
        }

        Scan { hit: None, visited }
    }

    /// Inserts `rect` at its sorted position.
    pub fn insert(&mut self, rect: Rect) {
        let index = self.insertion_index(&rect);
        self.boxes.insert(index, rect);
        self.max_width = self.max_width.max(rect.width);
    }

    /// Inserts `rect` unless it collides with an indexed rectangle.
    pub fn try_insert(&mut self, rect: Rect, max_width: i32) -> bool {
        if self.would_collide(&rect, max_width) {
            return false;
        }
        self.insert(rect);
        true
    }

    /// Largest width among indexed rectangles (0 when empty).
    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.boxes.iter()
    }

    /// True when abscissas are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.boxes.windows(2).all(|w| w[0].x <= w[1].x)
    }
}
