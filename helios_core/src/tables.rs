//! Built-in calibration tables for stock instruments.
//!
//! Each constructor is a plain `fn` so it can be registered in a
//! `GaugeFactory` by name.

use crate::calibration::CalibrationPointCollection;
use crate::error::CalibrationError;

/// Airspeed indicator: 0..250 kt over a full needle turn, linear.
pub fn airspeed_indicator() -> Result<CalibrationPointCollection, CalibrationError> {
    CalibrationPointCollection::builder(0.0, 0.0, 250.0, 360.0)
        .named("airspeed_indicator")
        .build()
}

/// Rotor RPM in percent; compressed scale above 88 %.
pub fn rotor_rpm() -> Result<CalibrationPointCollection, CalibrationError> {
    CalibrationPointCollection::builder(0.0, 0.0, 110.0, 346.5)
        .named("rotor_rpm")
        .points([(33.0, 110.0), (55.0, 182.0), (88.0, 287.0), (99.0, 312.0)])
        .build()
}

/// Trim indicator with a dead zone below -5.
pub fn trim_indicator() -> Result<CalibrationPointCollection, CalibrationError> {
    CalibrationPointCollection::builder(-10.0, 0.0, 10.0, 337.5)
        .named("trim_indicator")
        .point(-5.0, 0.0)
        .build()
}

/// Vertical velocity in ft/min; non-linear, symmetric about zero.
pub fn vertical_velocity() -> Result<CalibrationPointCollection, CalibrationError> {
    CalibrationPointCollection::builder(-6000.0, -169.0, 6000.0, 169.0)
        .named("vertical_velocity")
        .points([
            (-4000.0, -140.0),
            (-2000.0, -100.0),
            (-1000.0, -57.0),
            (0.0, 0.0),
            (1000.0, 57.0),
            (2000.0, 100.0),
            (4000.0, 140.0),
        ])
        .build()
}
