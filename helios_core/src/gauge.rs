//! Gauge-side consumers of calibration tables.

use crate::calibration::CalibrationPointCollection;

/// What the interpolated value drives on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeedleKind {
    /// Rotation in degrees.
    #[default]
    Rotation,
    /// Translation in pixels.
    Offset,
}

/// A single moving element bound to one calibration table.
#[derive(Debug, Clone)]
pub struct Needle {
    kind: NeedleKind,
    calibration: CalibrationPointCollection,
    value: f64,
    output: f64,
}

impl Needle {
    /// The needle starts at a telemetry value of zero.
    pub fn new(kind: NeedleKind, calibration: CalibrationPointCollection) -> Self {
        let output = calibration.interpolate(0.0);
        Self {
            kind,
            calibration,
            value: 0.0,
            output,
        }
    }

    /// Store a new telemetry value and return the rendering value.
    ///
    /// Non-finite telemetry is ignored and the previous position is kept.
    pub fn set_value(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            tracing::warn!(value, "ignoring non-finite telemetry value");
            return self.output;
        }
        self.value = value;
        self.output = self.calibration.interpolate(value);
        self.output
    }

    pub fn kind(&self) -> NeedleKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn calibration(&self) -> &CalibrationPointCollection {
        &self.calibration
    }
}

/// A gauge owning one or more named needles (e.g. a pointer plus an off flag).
#[derive(Debug, Clone)]
pub struct Gauge {
    id: String,
    needles: Vec<(String, Needle)>,
}

impl Gauge {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            needles: Vec::new(),
        }
    }

    /// Attach a needle; a later needle with the same name replaces the earlier one.
    #[must_use]
    pub fn with_needle(mut self, name: impl Into<String>, needle: Needle) -> Self {
        let name = name.into();
        match self.needles.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = needle,
            None => self.needles.push((name, needle)),
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn needle(&self, name: &str) -> Option<&Needle> {
        self.needles.iter().find(|(n, _)| n == name).map(|(_, nd)| nd)
    }

    /// Drive the named needle; `None` if the gauge has no such needle.
    pub fn set_value(&mut self, name: &str, value: f64) -> Option<f64> {
        self.needles
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, nd)| nd.set_value(value))
    }

    pub fn needles(&self) -> impl Iterator<Item = (&str, &Needle)> {
        self.needles.iter().map(|(n, nd)| (n.as_str(), nd))
    }
}
