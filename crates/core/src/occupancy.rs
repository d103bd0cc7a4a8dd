//! Rows of a sheet covered by at least one valid symbol.

use crate::symbol::{IgnorePolicy, SymbolInfo};

/// Table of booleans indexed by ordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyMask {
    rows: Vec<bool>,
}

impl OccupancyMask {
    /// Marks the vertical span of every non-ignored symbol, clipped to
    /// `[0, height)`.
    pub fn build<'a, I, P>(symbols: I, policy: &P, height: u32) -> Self
    where
        I: IntoIterator<Item = &'a SymbolInfo>,
        P: IgnorePolicy + ?Sized,
    {
        let height = height as usize;
        let mut rows = vec![false; height];

        for symbol in symbols {
            if policy.is_ignored(&symbol.shape) {
                continue;
            }
            let r = symbol.bounds;
            let start = i64::from(r.y).clamp(0, height as i64) as usize;
            let end = r.bottom().clamp(0, height as i64) as usize;
            if start < end {
                rows[start..end].fill(true);
            }
        }

        Self { rows }
    }

    /// O(1) lookup; rows outside the canvas are never occupied.
    #[inline]
    pub fn is_occupied(&self, y: i64) -> bool {
        usize::try_from(y)
            .ok()
            .and_then(|y| self.rows.get(y).copied())
            .unwrap_or(false)
    }

    /// Number of occupied rows.
    pub fn occupied_rows(&self) -> usize {
        self.rows.iter().filter(|&&b| b).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
