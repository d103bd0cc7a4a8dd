//! Error types for none-symbol synthesis.

use thiserror::Error;

use crate::geometry::Rect;

/// Primary error type for the placement library.
///
/// Conditions a page can recover from (mixed interlines, exhausted attempt
/// budget) are reported through [`crate::sampler::PlacementStatus`] instead.
#[derive(Error, Debug)]
pub enum NonesError {
    #[error("symbol #{index} ({shape}) has malformed bounds {bounds}")]
    MalformedBounds {
        index: usize,
        shape: String,
        bounds: Rect,
    },

    #[error("canvas {width}x{height} exceeds the {max} pixel limit")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for NonesError.
pub type Result<T> = std::result::Result<T, NonesError>;
