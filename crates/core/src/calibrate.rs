//! Sheet scale calibration.
//!
//! All symbols of a sheet must share a single interline value so that the
//! reference margins can be converted to sheet pixels.

use thiserror::Error;

use crate::params::NonesParams;
use crate::symbol::SymbolInfo;

/// Rounds half-way values to the nearest even integer.
#[inline]
pub fn round_half_even(v: f64) -> i32 {
    v.round_ties_even() as i32
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("several interline values on one sheet: {first} and {other}")]
    MixedInterlines { first: i32, other: i32 },

    #[error("margins {x}x{y} do not fit in the {width}x{height} canvas")]
    OversizedMargins {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
}

/// Returns the single rounded interline shared by all symbols.
///
/// Ignored symbols are taken into account as well. Symbols without a positive
/// interline are skipped; `Ok(None)` means no symbol provided one.
pub fn calibrate<'a, I>(symbols: I) -> Result<Option<i32>, CalibrationError>
where
    I: IntoIterator<Item = &'a SymbolInfo>,
{
    let mut unit: Option<i32> = None;

    for symbol in symbols {
        if symbol.interline <= 0.0 {
            continue;
        }
        let rounded = round_half_even(symbol.interline);
        match unit {
            None => unit = Some(rounded),
            Some(first) if first != rounded => {
                return Err(CalibrationError::MixedInterlines {
                    first,
                    other: rounded,
                });
            }
            Some(_) => {}
        }
    }

    Ok(unit)
}

/// Pixel margins around a none location, at sheet scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Margins {
    pub x: i32,
    pub y: i32,
}

impl Margins {
    /// Scales the reference margins of `params` to a sheet of interline `unit`.
    ///
    /// Without a unit the ratio defaults to 1. Scaled margins must lie within
    /// `[0, width]` and `[0, height]`.
    pub fn resolve(
        params: &NonesParams,
        unit: Option<i32>,
        width: u32,
        height: u32,
    ) -> Result<Self, CalibrationError> {
        let ratio = match unit {
            Some(u) if u > 0 => params.reference_interline / f64::from(u),
            _ => 1.0,
        };
        let x = (params.x_margin / ratio).round_ties_even();
        let y = (params.y_margin / ratio).round_ties_even();

        // NaN fails both range checks
        if !((0.0..=f64::from(width)).contains(&x) && (0.0..=f64::from(height)).contains(&y)) {
            return Err(CalibrationError::OversizedMargins {
                x: x as i64,
                y: y as i64,
                width,
                height,
            });
        }
        Ok(Self {
            x: x as i32,
            y: y as i32,
        })
    }
}
