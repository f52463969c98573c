//! Numeric helpers shared by the calibration engine.

use crate::calibration::CalibrationPoint;

/// Two-point line through `lo` and `hi`, evaluated at `x`.
///
/// - Returns the anchor output exactly when `x` equals an anchor input.
/// - A flat segment returns `lo.output()` for every `x`, including ±∞.
/// - Does not clamp: `x` outside `[lo.input, hi.input]` extrapolates.
#[inline]
pub fn two_point_line(lo: CalibrationPoint, hi: CalibrationPoint, x: f64) -> f64 {
    if x == lo.input() {
        return lo.output();
    }
    if x == hi.input() {
        return hi.output();
    }
    let rise = hi.output() - lo.output();
    if rise == 0.0 {
        return lo.output();
    }
    lo.output() + (x - lo.input()) * rise / (hi.input() - lo.input())
}

/// Round to nearest (ties away from zero) and saturate into `i64`.
/// NaN maps to 0.
#[inline]
pub fn round_to_i64(y: f64) -> i64 {
    if y.is_nan() {
        return 0;
    }
    // `as` saturates at the i64 range for out-of-range floats
    y.round() as i64
}
