//! Annotated symbols of a sheet and the shape ignore policy.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NonesError, Result};
use crate::geometry::Rect;

/// Shape name given to synthesized negative symbols.
pub const NONE_SHAPE: &str = "none";

/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 1 << 16;

/// One labeled region of a sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Shape name, as understood by the classifier.
    pub shape: String,
    /// Staff interline (pixels) of the staff the symbol belongs to.
    #[serde(default)]
    pub interline: f64,
    pub bounds: Rect,
}

impl SymbolInfo {
    pub fn new(shape: impl Into<String>, interline: f64, bounds: Rect) -> Self {
        Self {
            shape: shape.into(),
            interline,
            bounds,
        }
    }

    /// A synthesized negative located at `(x, y)`.
    pub fn none(interline: f64, x: i32, y: i32) -> Self {
        Self::new(NONE_SHAPE, interline, Rect::point(x, y))
    }

    pub fn is_none(&self) -> bool {
        self.shape == NONE_SHAPE
    }
}

/// Annotations of one sheet: canvas dimensions and its symbols.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetAnnotations {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

impl SheetAnnotations {
    pub fn new(width: u32, height: u32, symbols: Vec<SymbolInfo>) -> Self {
        Self {
            width,
            height,
            symbols,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads annotations from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Checks the canvas size and that no symbol carries a negative extent.
    pub fn validate(&self) -> Result<()> {
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(NonesError::CanvasTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_CANVAS_SIDE,
            });
        }
        for (index, symbol) in self.symbols.iter().enumerate() {
            if symbol.bounds.is_malformed() {
                return Err(NonesError::MalformedBounds {
                    index,
                    shape: symbol.shape.clone(),
                    bounds: symbol.bounds,
                });
            }
        }
        Ok(())
    }
}

/// Decides which shapes take no part in occupancy and collision checks.
pub trait IgnorePolicy {
    fn is_ignored(&self, shape: &str) -> bool;
}

/// Policy that ignores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIgnore;

impl IgnorePolicy for NoIgnore {
    fn is_ignored(&self, _shape: &str) -> bool {
        false
    }
}

impl<F> IgnorePolicy for F
where
    F: Fn(&str) -> bool,
{
    fn is_ignored(&self, shape: &str) -> bool {
        self(shape)
    }
}

/// A fixed set of ignored shape names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnoredShapes {
    shapes: HashSet<String>,
}

impl<S: Into<String>> FromIterator<S> for IgnoredShapes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IgnorePolicy for IgnoredShapes {
    fn is_ignored(&self, shape: &str) -> bool {
        self.shapes.contains(shape)
    }
}
