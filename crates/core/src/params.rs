//! Placement parameters and their TOML configuration file.

use std::path::Path;

use serde::Deserialize;

use crate::error::{NonesError, Result};
use crate::symbol::IgnoredShapes;

/// Parameters for none-symbol placement.
///
/// Margins are expressed at the classifier's reference scale and rescaled to
/// each sheet's interline before use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NonesParams {
    /// Interline value the classifier normalizes every symbol to.
    pub reference_interline: f64,

    /// Abscissa margin around a none location, at reference scale.
    pub x_margin: f64,

    /// Ordinate margin around a none location, at reference scale.
    pub y_margin: f64,

    /// Number of none symbols wanted per valid symbol of the sheet.
    pub none_ratio: f64,

    /// Random draws allowed per requested none symbol.
    pub attempts_per_target: usize,
}

impl Default for NonesParams {
    fn default() -> Self {
        Self {
            reference_interline: 10.0,
            x_margin: 5.0,
            y_margin: 5.0,
            none_ratio: 1.0,
            attempts_per_target: 10,
        }
    }
}

impl NonesParams {
    /// Checks that the parameters describe a usable placement.
    pub fn validate(&self) -> Result<()> {
        if !(self.reference_interline.is_finite() && self.reference_interline > 0.0) {
            return Err(NonesError::InvalidParams(format!(
                "reference_interline should be a positive number, got {}",
                self.reference_interline
            )));
        }
        for (name, value) in [
            ("x_margin", self.x_margin),
            ("y_margin", self.y_margin),
            ("none_ratio", self.none_ratio),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(NonesError::InvalidParams(format!(
                    "{name} should be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Contents of a configuration file.
///
/// ```toml
/// reference_interline = 10.0
/// x_margin = 5.0
/// none_ratio = 0.5
/// ignored_shapes = ["brace", "staffLine"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NonesConfig {
    #[serde(flatten)]
    pub params: NonesParams,
    #[serde(default)]
    pub ignored_shapes: Vec<String>,
}

impl NonesConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.params.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn ignore_policy(&self) -> IgnoredShapes {
        self.ignored_shapes.iter().cloned().collect()
    }
}
