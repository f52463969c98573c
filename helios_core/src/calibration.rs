//! Piecewise-linear calibration tables.
//!
//! A `CalibrationPointCollection` maps a telemetry value to a rendering value
//! (needle degrees, pixel offset) through an ordered list of breakpoints.
//! Between breakpoints the curve is linear; outside the configured range the
//! slope of the nearest segment continues unless the table opts into
//! `ExtrapolationPolicy::Clamp`.

use crate::builder::CalibrationTableBuilder;
use crate::error::CalibrationError;
use crate::util::{round_to_i64, two_point_line};

/// One exact (input, output) breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    input: f64,
    output: f64,
}

impl CalibrationPoint {
    #[inline]
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }

    #[inline]
    pub const fn input(&self) -> f64 {
        self.input
    }

    #[inline]
    pub const fn output(&self) -> f64 {
        self.output
    }

    fn ensure_finite(self) -> Result<Self, CalibrationError> {
        if self.input.is_finite() && self.output.is_finite() {
            Ok(self)
        } else {
            Err(CalibrationError::NonFinite {
                input: self.input,
                output: self.output,
            })
        }
    }
}

impl From<(f64, f64)> for CalibrationPoint {
    fn from((input, output): (f64, f64)) -> Self {
        Self::new(input, output)
    }
}

/// Rise and run of a segment must both be finite, otherwise interpolation
/// inside it overflows.
fn ensure_span(lo: CalibrationPoint, hi: CalibrationPoint) -> Result<(), CalibrationError> {
    if (hi.input - lo.input).is_finite() && (hi.output - lo.output).is_finite() {
        Ok(())
    } else {
        Err(CalibrationError::SpanOverflow {
            from: lo.input,
            to: hi.input,
        })
    }
}

/// Behaviour for inputs beyond the first/last breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtrapolationPolicy {
    /// Continue the slope of the outermost segment.
    #[default]
    Extend,
    /// Hold the outermost output.
    Clamp,
}

/// Ordered breakpoint table.
///
/// Invariants upheld by every constructor and by `add`:
/// - at least two points;
/// - inputs strictly ascending (no duplicates);
/// - every input and output is finite;
/// - each segment's rise and run are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationPointCollection {
    points: Vec<CalibrationPoint>,
    extrapolation: ExtrapolationPolicy,
}

#[allow(clippy::len_without_is_empty)]
impl CalibrationPointCollection {
    /// Create a table anchored by its two boundary points.
    ///
    /// Fails when any value is not finite or when `min_input >= max_input`.
    pub fn new(
        min_input: f64,
        min_output: f64,
        max_input: f64,
        max_output: f64,
    ) -> Result<Self, CalibrationError> {
        let min = CalibrationPoint::new(min_input, min_output).ensure_finite()?;
        let max = CalibrationPoint::new(max_input, max_output).ensure_finite()?;
        if min_input >= max_input {
            return Err(CalibrationError::InvertedBoundary {
                min_input,
                max_input,
            });
        }
        ensure_span(min, max)?;
        Ok(Self {
            points: vec![min, max],
            extrapolation: ExtrapolationPolicy::Extend,
        })
    }

    /// Start a builder for a table with the given boundaries.
    pub fn builder(
        min_input: f64,
        min_output: f64,
        max_input: f64,
        max_output: f64,
    ) -> CalibrationTableBuilder {
        CalibrationTableBuilder::new(
            CalibrationPoint::new(min_input, min_output),
            CalibrationPoint::new(max_input, max_output),
        )
    }

    /// Build a table from an arbitrary breakpoint list. The smallest and
    /// largest inputs become the boundaries.
    pub fn from_points<I, P>(points: I) -> Result<Self, CalibrationError>
    where
        I: IntoIterator<Item = P>,
        P: Into<CalibrationPoint>,
    {
        let mut pts = points
            .into_iter()
            .map(|p| Into::<CalibrationPoint>::into(p).ensure_finite())
            .collect::<Result<Vec<_>, _>>()?;
        if pts.len() < 2 {
            return Err(CalibrationError::TooFewPoints(pts.len()));
        }
        pts.sort_by(|a, b| a.input.total_cmp(&b.input));
        if let Some(w) = pts.windows(2).find(|w| w[0].input == w[1].input) {
            return Err(CalibrationError::DuplicateInput { input: w[0].input });
        }
        for w in pts.windows(2) {
            ensure_span(w[0], w[1])?;
        }
        Ok(Self {
            points: pts,
            extrapolation: ExtrapolationPolicy::Extend,
        })
    }

    /// Insert a breakpoint in sorted position, subdividing the segment that
    /// contains it. Inputs outside the current range become the new ends.
    ///
    /// Rejects a point whose input already exists in the table.
    pub fn add(&mut self, point: CalibrationPoint) -> Result<(), CalibrationError> {
        let point = point.ensure_finite()?;
        let idx = self.points.partition_point(|p| p.input < point.input);
        if self
            .points
            .get(idx)
            .is_some_and(|p| p.input == point.input)
        {
            return Err(CalibrationError::DuplicateInput { input: point.input });
        }
        if let Some(lo) = idx.checked_sub(1).and_then(|i| self.points.get(i)) {
            ensure_span(*lo, point)?;
        }
        if let Some(hi) = self.points.get(idx) {
            ensure_span(point, *hi)?;
        }
        self.points.insert(idx, point);
        Ok(())
    }

    pub fn set_extrapolation(&mut self, policy: ExtrapolationPolicy) {
        self.extrapolation = policy;
    }

    #[must_use]
    pub fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    pub fn extrapolation(&self) -> ExtrapolationPolicy {
        self.extrapolation
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Number of breakpoints beyond the two boundaries.
    pub fn interior_len(&self) -> usize {
        self.points.len() - 2
    }

    pub fn min_point(&self) -> CalibrationPoint {
        self.points[0]
    }

    pub fn max_point(&self) -> CalibrationPoint {
        self.points[self.points.len() - 1]
    }

    pub fn min_input(&self) -> f64 {
        self.min_point().input
    }

    pub fn max_input(&self) -> f64 {
        self.max_point().input
    }

    /// Map `x` through the table.
    ///
    /// Pure: the result depends only on the current points, the policy and
    /// `x`. NaN in gives NaN out.
    pub fn interpolate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let n = self.points.len();
        let first = self.points[0];
        let last = self.points[n - 1];

        if x <= first.input {
            return match self.extrapolation {
                ExtrapolationPolicy::Clamp => first.output,
                ExtrapolationPolicy::Extend => two_point_line(first, self.points[1], x),
            };
        }
        if x >= last.input {
            return match self.extrapolation {
                ExtrapolationPolicy::Clamp => last.output,
                ExtrapolationPolicy::Extend => two_point_line(self.points[n - 2], last, x),
            };
        }

        // first.input < x < last.input, so 1 <= hi <= n - 1
        let hi = self.points.partition_point(|p| p.input < x);
        two_point_line(self.points[hi - 1], self.points[hi], x)
    }

    /// `interpolate` rounded half away from zero, for integer consumers such
    /// as drum-counter digits. NaN maps to 0; out-of-range values saturate.
    pub fn interpolate_rounded(&self, x: f64) -> i64 {
        round_to_i64(self.interpolate(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airspeed() -> CalibrationPointCollection {
        CalibrationPointCollection::new(0.0, 0.0, 250.0, 360.0).unwrap()
    }

    #[test]
    fn boundary_only_hits_anchors() {
        let c = airspeed();
        assert_eq!(c.interpolate(0.0), 0.0);
        assert_eq!(c.interpolate(250.0), 360.0);
        assert_eq!(c.interpolate(125.0), 180.0);
        assert_eq!(c.interior_len(), 0);
    }

    #[test]
    fn boundary_only_extrapolates_below() {
        let c = airspeed();
        assert!((c.interpolate(-10.0) - -14.4).abs() < 1e-9);
    }

    #[test]
    fn add_keeps_order_and_rejects_duplicates() {
        let mut c = airspeed();
        c.add(CalibrationPoint::new(200.0, 300.0)).unwrap();
        c.add(CalibrationPoint::new(50.0, 40.0)).unwrap();
        let inputs: Vec<f64> = c.points().iter().map(|p| p.input()).collect();
        assert_eq!(inputs, vec![0.0, 50.0, 200.0, 250.0]);

        let err = c.add(CalibrationPoint::new(50.0, 99.0)).unwrap_err();
        assert_eq!(err, CalibrationError::DuplicateInput { input: 50.0 });
        let err = c.add(CalibrationPoint::new(250.0, 1.0)).unwrap_err();
        assert_eq!(err, CalibrationError::DuplicateInput { input: 250.0 });
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn add_outside_range_extends_table() {
        let mut c = airspeed();
        c.add(CalibrationPoint::new(-50.0, -10.0)).unwrap();
        assert_eq!(c.min_input(), -50.0);
        assert_eq!(c.interpolate(-50.0), -10.0);
        assert_eq!(c.interpolate(-25.0), -5.0);
    }

    #[test]
    fn inverted_and_degenerate_boundaries_fail() {
        assert!(matches!(
            CalibrationPointCollection::new(10.0, 0.0, 10.0, 1.0),
            Err(CalibrationError::InvertedBoundary { .. })
        ));
        assert!(matches!(
            CalibrationPointCollection::new(10.0, 0.0, -10.0, 1.0),
            Err(CalibrationError::InvertedBoundary { .. })
        ));
        assert!(matches!(
            CalibrationPointCollection::new(f64::NAN, 0.0, 10.0, 1.0),
            Err(CalibrationError::NonFinite { .. })
        ));
    }

    #[test]
    fn non_finite_points_rejected() {
        let mut c = airspeed();
        assert!(matches!(
            c.add(CalibrationPoint::new(10.0, f64::INFINITY)),
            Err(CalibrationError::NonFinite { .. })
        ));
    }

    #[test]
    fn from_points_sorts_and_validates() {
        let c = CalibrationPointCollection::from_points([(10.0, 1.0), (0.0, 0.0), (5.0, 0.2)])
            .unwrap();
        assert_eq!(c.min_point(), CalibrationPoint::new(0.0, 0.0));
        assert_eq!(c.max_point(), CalibrationPoint::new(10.0, 1.0));
        assert_eq!(c.interpolate(5.0), 0.2);

        assert_eq!(
            CalibrationPointCollection::from_points([(1.0, 1.0)]).unwrap_err(),
            CalibrationError::TooFewPoints(1)
        );
        assert_eq!(
            CalibrationPointCollection::from_points([(1.0, 1.0), (1.0, 2.0)]).unwrap_err(),
            CalibrationError::DuplicateInput { input: 1.0 }
        );
    }

    #[test]
    fn overflowing_segments_rejected() {
        assert_eq!(
            CalibrationPointCollection::new(0.0, -1e308, 1.0, 1e308).unwrap_err(),
            CalibrationError::SpanOverflow { from: 0.0, to: 1.0 }
        );
        assert!(matches!(
            CalibrationPointCollection::new(-1e308, 0.0, 1e308, 1.0),
            Err(CalibrationError::SpanOverflow { .. })
        ));
        assert!(matches!(
            CalibrationPointCollection::from_points([(0.0, 1e308), (1.0, -1e308)]),
            Err(CalibrationError::SpanOverflow { .. })
        ));

        let mut c = CalibrationPointCollection::new(0.0, -1e308, 1.0, -1e308).unwrap();
        assert_eq!(
            c.add(CalibrationPoint::new(0.5, 1e308)).unwrap_err(),
            CalibrationError::SpanOverflow { from: 0.0, to: 0.5 }
        );
        assert_eq!(
            c.add(CalibrationPoint::new(2.0, 1e308)).unwrap_err(),
            CalibrationError::SpanOverflow { from: 1.0, to: 2.0 }
        );
        assert_eq!(
            c.add(CalibrationPoint::new(-1.0, 1e308)).unwrap_err(),
            CalibrationError::SpanOverflow { from: -1.0, to: 0.0 }
        );
        assert_eq!(c.len(), 2);

        let wide = CalibrationPointCollection::new(0.0, -8e307, 1.0, 8e307).unwrap();
        assert_eq!(wide.interpolate(0.5), 0.0);
    }

    #[test]
    fn clamp_holds_end_outputs() {
        let c = airspeed().with_extrapolation(ExtrapolationPolicy::Clamp);
        assert_eq!(c.interpolate(-10.0), 0.0);
        assert_eq!(c.interpolate(1000.0), 360.0);
        assert_eq!(c.interpolate(125.0), 180.0);
    }

    #[test]
    fn nan_and_infinite_inputs() {
        let c = airspeed();
        assert!(c.interpolate(f64::NAN).is_nan());
        assert_eq!(c.interpolate(f64::INFINITY), f64::INFINITY);
        assert_eq!(c.interpolate(f64::NEG_INFINITY), f64::NEG_INFINITY);

        let flat = CalibrationPointCollection::new(0.0, 5.0, 1.0, 5.0).unwrap();
        assert_eq!(flat.interpolate(f64::INFINITY), 5.0);
    }

    #[test]
    fn rounded_output() {
        let c = CalibrationPointCollection::new(0.0, 0.0, 10.0, 1.0).unwrap();
        assert_eq!(c.interpolate_rounded(5.0), 1);
        assert_eq!(c.interpolate_rounded(4.0), 0);
        assert_eq!(c.interpolate_rounded(-5.0), -1);
        assert_eq!(c.interpolate_rounded(f64::NAN), 0);
        assert_eq!(c.interpolate_rounded(f64::INFINITY), i64::MAX);
    }
}
