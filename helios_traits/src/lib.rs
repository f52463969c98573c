//! Seams between the calibration engine and its collaborators.
//!
//! The telemetry layer produces `TelemetrySample`s; the visual renderer
//! consumes `GaugeUpdate`s. Neither side is implemented in this workspace
//! beyond simple test doubles.

pub mod sample;

pub use sample::{GaugeUpdate, TelemetrySample};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub trait TelemetrySource {
    /// Next decoded telemetry value, or `None` once the source is exhausted.
    fn next_sample(&mut self) -> Result<Option<TelemetrySample>, BoxError>;
}

pub trait RenderSink {
    fn apply(&mut self, update: &GaugeUpdate) -> Result<(), BoxError>;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn next_sample(&mut self) -> Result<Option<TelemetrySample>, BoxError> {
        (**self).next_sample()
    }
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn apply(&mut self, update: &GaugeUpdate) -> Result<(), BoxError> {
        (**self).apply(update)
    }
}

/// Collects every update; handy for tests and the CLI.
impl RenderSink for Vec<GaugeUpdate> {
    fn apply(&mut self, update: &GaugeUpdate) -> Result<(), BoxError> {
        self.push(update.clone());
        Ok(())
    }
}
