//! Data-driven construction of calibration tables.
//!
//! Gauges describe their curve as a literal breakpoint list; the builder
//! turns that into a validated `CalibrationPointCollection`. Every authoring
//! error surfaces from `build()`, never from `interpolate`.

use crate::calibration::{CalibrationPoint, CalibrationPointCollection, ExtrapolationPolicy};
use crate::error::CalibrationError;

#[derive(Debug, Clone)]
pub struct CalibrationTableBuilder {
    name: Option<String>,
    min: CalibrationPoint,
    max: CalibrationPoint,
    points: Vec<CalibrationPoint>,
    extrapolation: ExtrapolationPolicy,
}

impl CalibrationTableBuilder {
    pub fn new(min: CalibrationPoint, max: CalibrationPoint) -> Self {
        Self {
            name: None,
            min,
            max,
            points: Vec::new(),
            extrapolation: ExtrapolationPolicy::default(),
        }
    }

    /// Label used in diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn point(mut self, input: f64, output: f64) -> Self {
        self.points.push(CalibrationPoint::new(input, output));
        self
    }

    #[must_use]
    pub fn points<I, P>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<CalibrationPoint>,
    {
        self.points.extend(points.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.extrapolation = policy;
        self
    }

    pub fn build(self) -> Result<CalibrationPointCollection, CalibrationError> {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        let mut table = CalibrationPointCollection::new(
            self.min.input(),
            self.min.output(),
            self.max.input(),
            self.max.output(),
        )
        .inspect_err(|e| tracing::debug!(table = name, error = %e, "rejected boundaries"))?;
        for p in self.points {
            table
                .add(p)
                .inspect_err(|e| tracing::debug!(table = name, error = %e, "rejected point"))?;
        }
        table.set_extrapolation(self.extrapolation);
        tracing::debug!(
            table = name,
            points = table.len(),
            min_input = table.min_input(),
            max_input = table.max_input(),
            extrapolation = ?table.extrapolation(),
            "calibration table built"
        );
        Ok(table)
    }
}
