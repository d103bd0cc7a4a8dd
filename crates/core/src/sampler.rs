//! Random placement of none symbols within a sheet.
//!
//! None symbols are tried at random locations, provided that the ordinate of
//! the location lies within the vertical range of some valid symbol and that
//! the margin-padded location does not intersect another symbol rectangle
//! (valid symbols plus the none rectangles already inserted).

use rand::Rng;
use tracing::{debug, info};

use crate::calibrate::{CalibrationError, Margins, calibrate, round_half_even};
use crate::error::Result;
use crate::geometry::Rect;
use crate::index::AbscissaIndex;
use crate::occupancy::OccupancyMask;
use crate::params::NonesParams;
use crate::symbol::{IgnorePolicy, SheetAnnotations, SymbolInfo};

/// How a placement run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementStatus {
    /// The requested count was reached.
    Complete,
    /// The attempt budget ran out first (sheet too dense or too small).
    Partial,
    /// The sheet mixes several interline values; nothing was placed.
    MixedInterlines { first: i32, other: i32 },
    /// The scaled margins exceed the canvas; nothing was placed.
    OversizedMargins { x: i64, y: i64 },
}

/// Outcome of [`NonesBuilder::insert_nones`].
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Created none symbols, each with zero-sized bounds.
    pub symbols: Vec<SymbolInfo>,
    /// Number of none symbols asked for.
    pub requested: usize,
    /// Random locations drawn.
    pub attempts: usize,
    /// Sheet interline unit, if any symbol provided one.
    pub unit: Option<i32>,
    /// Margins used around each none location.
    pub margins: Margins,
    pub status: PlacementStatus,
}

impl Placement {
    fn rejected(requested: usize, unit: Option<i32>, err: CalibrationError) -> Self {
        let status = match err {
            CalibrationError::MixedInterlines { first, other } => {
                PlacementStatus::MixedInterlines { first, other }
            }
            CalibrationError::OversizedMargins { x, y, .. } => {
                PlacementStatus::OversizedMargins { x, y }
            }
        };
        Self {
            symbols: Vec::new(),
            requested,
            attempts: 0,
            unit,
            margins: Margins { x: 0, y: 0 },
            status,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == PlacementStatus::Complete
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The padded rectangles that were inserted in the index.
    pub fn padded_bounds(&self) -> impl Iterator<Item = Rect> + '_ {
        let Margins { x, y } = self.margins;
        self.symbols.iter().map(move |s| s.bounds.grown(x, y))
    }
}

/// Generates none-shape symbols within one sheet.
pub struct NonesBuilder<'a, P: IgnorePolicy + ?Sized> {
    sheet: &'a SheetAnnotations,
    policy: &'a P,
    params: &'a NonesParams,
}

impl<'a, P: IgnorePolicy + ?Sized> NonesBuilder<'a, P> {
    /// Creates a builder, rejecting oversized canvases, symbols with negative
    /// extents and out-of-range parameters.
    pub fn new(sheet: &'a SheetAnnotations, policy: &'a P, params: &'a NonesParams) -> Result<Self> {
        sheet.validate()?;
        params.validate()?;
        Ok(Self {
            sheet,
            policy,
            params,
        })
    }

    fn valid_symbols(&self) -> impl Iterator<Item = &'a SymbolInfo> + '_ {
        self.sheet
            .symbols
            .iter()
            .filter(|s| !self.policy.is_ignored(&s.shape))
    }

    /// Count of none symbols to insert according to the configured ratio.
    pub fn default_target(&self) -> usize {
        let valid = self.valid_symbols().count();
        round_half_even(self.params.none_ratio * valid as f64).max(0) as usize
    }

    /// Tries to insert `target` none symbols at random locations.
    ///
    /// Exhausting the attempt budget is not an error: the placement then
    /// holds fewer symbols and reports [`PlacementStatus::Partial`].
    pub fn insert_nones<R: Rng + ?Sized>(&self, target: usize, rng: &mut R) -> Placement {
        let unit = match calibrate(&self.sheet.symbols) {
            Ok(unit) => unit,
            Err(err) => {
                info!("{err}, no none symbol can be inserted");
                return Placement::rejected(target, None, err);
            }
        };
        let (width, height) = (self.sheet.width, self.sheet.height);

        // Adjust margin to sheet interline value
        let margins = match Margins::resolve(self.params, unit, width, height) {
            Ok(margins) => margins,
            Err(err) => {
                info!("{err}, no none symbol can be inserted");
                return Placement::rejected(target, unit, err);
            }
        };
        let interline = unit.map_or(0.0, f64::from);

        let mut index = AbscissaIndex::from_rects(self.valid_symbols().map(|s| s.bounds));
        let max_width = index.max_width().max(margins.x.saturating_mul(2));

        let occupied = OccupancyMask::build(&self.sheet.symbols, self.policy, height);
        debug!(
            "sheet {}x{}: {} boxes, {} occupied rows, margins {:?}",
            width,
            height,
            index.len(),
            occupied.occupied_rows(),
            margins
        );

        let mut symbols = Vec::with_capacity(target);
        let mut attempts = 0;

        if width > 0 && height > 0 {
            let budget = self.params.attempts_per_target.saturating_mul(target);
            while attempts < budget && symbols.len() < target {
                attempts += 1;

                // Make sure we pick a y within some valid symbol vertical range
                let y = rng.gen_range(0..height);
                if !occupied.is_occupied(i64::from(y)) {
                    continue;
                }
                let x = rng.gen_range(0..width);
                let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                    continue;
                };

                let rect = Rect::point(x, y).grown(margins.x, margins.y);
                if index.try_insert(rect, max_width) {
                    debug!("Added none at {}", rect);
                    symbols.push(SymbolInfo::none(interline, x, y));
                }
            }
        }

        let status = if symbols.len() >= target {
            PlacementStatus::Complete
        } else {
            debug!(
                "Placed {} of {} none symbols in {} attempts",
                symbols.len(),
                target,
                attempts
            );
            PlacementStatus::Partial
        };

        Placement {
            symbols,
            requested: target,
            attempts,
            unit,
            margins,
            status,
        }
    }
}

/// Returns a copy of `sheet` with none symbols appended after the real ones.
///
/// Without an explicit `target`, the number of none symbols is derived from
/// `params.none_ratio`.
pub fn augment<P, R>(
    sheet: &SheetAnnotations,
    policy: &P,
    params: &NonesParams,
    target: Option<usize>,
    rng: &mut R,
) -> Result<(SheetAnnotations, Placement)>
where
    P: IgnorePolicy + ?Sized,
    R: Rng + ?Sized,
{
    let builder = NonesBuilder::new(sheet, policy, params)?;
    let target = target.unwrap_or_else(|| builder.default_target());
    let placement = builder.insert_nones(target, rng);

    let mut augmented = sheet.clone();
    augmented.symbols.extend(placement.symbols.iter().cloned());
    Ok((augmented, placement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NonesError;
    use crate::symbol::{IgnoredShapes, NoIgnore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn staff_sheet() -> SheetAnnotations {
        SheetAnnotations::new(
            1000,
            100,
            vec![
                SymbolInfo::new("clefG", 10.0, Rect::new(10, 0, 20, 100)),
                SymbolInfo::new("noteheadBlack", 10.0, Rect::new(500, 40, 12, 10)),
                SymbolInfo::new("noteheadBlack", 10.2, Rect::new(700, 50, 12, 10)),
                SymbolInfo::new("brace", 10.0, Rect::new(0, 0, 5, 100)),
            ],
        )
    }

    #[test]
    fn test_insert_nones_complete() {
        let sheet = staff_sheet();
        let params = NonesParams::default();
        let policy: IgnoredShapes = ["brace"].into_iter().collect();
        let builder = NonesBuilder::new(&sheet, &policy, &params).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let placement = builder.insert_nones(5, &mut rng);
        assert_eq!(placement.status, PlacementStatus::Complete);
        assert_eq!(placement.len(), 5);
        assert_eq!(placement.unit, Some(10));
        assert_eq!(placement.margins, Margins { x: 5, y: 5 });
        assert!(placement.attempts <= 50);
        for s in &placement.symbols {
            assert!(s.is_none());
            assert_eq!(s.interline, 10.0);
            assert!((0..100).contains(&s.bounds.y));
            assert_eq!(s.bounds.width, 0);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let sheet = staff_sheet();
        let params = NonesParams::default();
        let builder = NonesBuilder::new(&sheet, &NoIgnore, &params).unwrap();

        let a = builder.insert_nones(8, &mut StdRng::seed_from_u64(42));
        let b = builder.insert_nones(8, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_target() {
        let sheet = staff_sheet();
        let params = NonesParams::default();
        let builder = NonesBuilder::new(&sheet, &NoIgnore, &params).unwrap();

        let placement = builder.insert_nones(0, &mut StdRng::seed_from_u64(1));
        assert!(placement.is_complete());
        assert!(placement.is_empty());
        assert_eq!(placement.attempts, 0);
    }

    #[test]
    fn test_mixed_interlines_rejected() {
        let mut sheet = staff_sheet();
        sheet
            .symbols
            .push(SymbolInfo::new("clefF", 20.0, Rect::new(300, 40, 20, 30)));
        let params = NonesParams::default();
        let builder = NonesBuilder::new(&sheet, &NoIgnore, &params).unwrap();

        let placement = builder.insert_nones(10, &mut StdRng::seed_from_u64(3));
        assert!(placement.is_empty());
        assert_eq!(
            placement.status,
            PlacementStatus::MixedInterlines {
                first: 10,
                other: 20
            }
        );
    }

    #[test]
    fn test_empty_canvas_is_partial() {
        let sheet = SheetAnnotations::new(0, 0, Vec::new());
        let params = NonesParams {
            x_margin: 0.0,
            y_margin: 0.0,
            ..NonesParams::default()
        };
        let builder = NonesBuilder::new(&sheet, &NoIgnore, &params).unwrap();

        let placement = builder.insert_nones(3, &mut StdRng::seed_from_u64(3));
        assert_eq!(placement.status, PlacementStatus::Partial);
        assert_eq!(placement.unit, None);
        assert!(placement.is_empty());
    }

    #[test]
    fn test_margins_wider_than_canvas() {
        let sheet = SheetAnnotations::new(0, 0, Vec::new());
        let params = NonesParams::default();
        let builder = NonesBuilder::new(&sheet, &NoIgnore, &params).unwrap();

        let placement = builder.insert_nones(3, &mut StdRng::seed_from_u64(3));
        assert_eq!(placement.status, PlacementStatus::OversizedMargins { x: 5, y: 5 });
        assert_eq!(placement.attempts, 0);
        assert!(placement.is_empty());
    }

    #[test]
    fn test_huge_interline_places_nothing() {
        let sheet = SheetAnnotations::new(
            100,
            100,
            vec![SymbolInfo::new("clefG", 1e12, Rect::new(0, 0, 100, 100))],
        );
        let params = NonesParams::default();
        let builder = NonesBuilder::new(&sheet, &NoIgnore, &params).unwrap();

        let placement = builder.insert_nones(4, &mut StdRng::seed_from_u64(9));
        assert!(matches!(
            placement.status,
            PlacementStatus::OversizedMargins { .. }
        ));
        assert_eq!(placement.unit, Some(i32::MAX));
        assert!(placement.is_empty());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let sheet = staff_sheet();
        let params = NonesParams {
            x_margin: -10.0,
            ..NonesParams::default()
        };
        let err = NonesBuilder::new(&sheet, &NoIgnore, &params)
            .err()
            .unwrap();
        assert!(matches!(err, NonesError::InvalidParams(_)));

        let params = NonesParams {
            reference_interline: 0.0,
            ..NonesParams::default()
        };
        assert!(NonesBuilder::new(&sheet, &NoIgnore, &params).is_err());
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let sheet = SheetAnnotations::new(10, u32::MAX, Vec::new());
        let params = NonesParams::default();
        let err = NonesBuilder::new(&sheet, &NoIgnore, &params)
            .err()
            .unwrap();
        assert!(matches!(err, NonesError::CanvasTooLarge { .. }));
    }

    #[test]
    fn test_malformed_bounds_rejected() {
        let sheet = SheetAnnotations::new(
            10,
            10,
            vec![SymbolInfo::new("x", 10.0, Rect::new(0, 0, -2, 3))],
        );
        let params = NonesParams::default();
        let err = NonesBuilder::new(&sheet, &NoIgnore, &params)
            .err()
            .unwrap();
        assert!(matches!(err, NonesError::MalformedBounds { index: 0, .. }));
    }

    #[test]
    fn test_default_target_uses_ratio() {
        let sheet = staff_sheet();
        let policy: IgnoredShapes = ["brace"].into_iter().collect();
        let params = NonesParams {
            none_ratio: 0.5,
            ..NonesParams::default()
        };
        let builder = NonesBuilder::new(&sheet, &policy, &params).unwrap();
        // 3 valid symbols * 0.5 = 1.5
        assert_eq!(builder.default_target(), 2);
    }

    #[test]
    fn test_augment_appends_nones() {
        let sheet = staff_sheet();
        let params = NonesParams::default();
        let policy: IgnoredShapes = ["brace"].into_iter().collect();

        let (augmented, placement) =
            augment(&sheet, &policy, &params, None, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(placement.requested, 3);
        assert_eq!(
            augmented.symbols.len(),
            sheet.symbols.len() + placement.len()
        );
        assert_eq!(augmented.symbols[..sheet.symbols.len()], sheet.symbols[..]);
        assert!(
            augmented.symbols[sheet.symbols.len()..]
                .iter()
                .all(SymbolInfo::is_none)
        );
    }

    #[test]
    fn test_augment_with_explicit_target() {
        let sheet = staff_sheet();
        let params = NonesParams::default();

        let (augmented, placement) =
            augment(&sheet, &NoIgnore, &params, Some(2), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(placement.requested, 2);
        assert_eq!(augmented.symbols.len(), sheet.symbols.len() + placement.len());
    }
}
