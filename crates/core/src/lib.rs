//! nonesynth - synthesis of "none" symbols for OMR classifier training.
//!
//! Given the annotated symbols of a sheet, inserts negative samples at random
//! locations that lie on rows used by real symbols and keep a margin away
//! from every other symbol.

pub mod calibrate;
pub mod error;
pub mod geometry;
pub mod index;
pub mod occupancy;
pub mod params;
pub mod sampler;
pub mod symbol;

pub use calibrate::{CalibrationError, Margins, calibrate};
pub use error::{NonesError, Result};
pub use geometry::Rect;
pub use index::AbscissaIndex;
pub use occupancy::OccupancyMask;
pub use params::{NonesConfig, NonesParams};
pub use sampler::{NonesBuilder, Placement, PlacementStatus, augment};
pub use symbol::{
    IgnorePolicy, IgnoredShapes, MAX_CANVAS_SIDE, NONE_SHAPE, NoIgnore, SheetAnnotations, SymbolInfo,
};
