use thiserror::Error;

/// Authoring mistakes in a calibration table. Raised at construction time so
/// a bad table never reaches the render loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("calibration point ({input}, {output}) is not finite")]
    NonFinite { input: f64, output: f64 },
    #[error(
        "boundary minimum input {min_input} must be strictly less than maximum input {max_input}"
    )]
    InvertedBoundary { min_input: f64, max_input: f64 },
    #[error("duplicate calibration input {input}")]
    DuplicateInput { input: f64 },
    #[error("calibration table requires at least two points, got {0}")]
    TooFewPoints(usize),
    #[error("segment from input {from} to {to} spans more than f64 can represent")]
    SpanOverflow { from: f64, to: f64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("calibration table '{0}' is already registered")]
    DuplicateTable(String),
    #[error("unknown calibration table '{0}'")]
    UnknownTable(String),
    #[error("gauge '{0}' is already bound")]
    DuplicateGauge(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
