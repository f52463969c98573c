/// One numeric reading keyed by the simulator's (device, element) names.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub device: String,
    pub element: String,
    pub value: f64,
}

impl TelemetrySample {
    pub fn new(device: impl Into<String>, element: impl Into<String>, value: f64) -> Self {
        Self {
            device: device.into(),
            element: element.into(),
            value,
        }
    }
}

/// A rendering value ready for the visual tree.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeUpdate {
    /// Gauge identifier from the profile.
    pub gauge: String,
    /// Raw telemetry value that produced this update.
    pub value: f64,
    /// Interpolated rotation (degrees) or offset (pixels).
    pub output: f64,
}
