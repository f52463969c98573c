#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Calibration engine for Helios gauges (renderer-agnostic).
//!
//! Maps telemetry values to rendering values through piecewise-linear
//! breakpoint tables. Rendering and telemetry ingestion go through the
//! `helios_traits::RenderSink` and `helios_traits::TelemetrySource` seams.
//!
//! ## Architecture
//!
//! - **Calibration**: breakpoint tables and interpolation (`calibration` module)
//! - **Builder**: validated construction from literal breakpoint lists (`builder`)
//! - **Gauges**: needles owning their tables (`gauge`)
//! - **Registry**: named tables, telemetry bindings, built-in factories (`registry`)
//! - **Telemetry**: channel handoff and dispatch to the renderer (`telemetry`)
//!
//! ## Extrapolation
//!
//! Outside the configured range the outermost slope continues. Gauges that
//! need a flat end add an explicit breakpoint repeating the adjacent output,
//! or opt into `ExtrapolationPolicy::Clamp`.

pub mod builder;
pub mod calibration;
pub mod error;
pub mod gauge;
pub mod mocks;
pub mod registry;
pub mod tables;
pub mod telemetry;
pub mod util;

pub use builder::CalibrationTableBuilder;
pub use calibration::{CalibrationPoint, CalibrationPointCollection, ExtrapolationPolicy};
pub use error::{CalibrationError, RegistryError};
pub use gauge::{Gauge, Needle, NeedleKind};
pub use helios_traits::{GaugeUpdate, RenderSink, TelemetrySample, TelemetrySource};
pub use registry::{GaugeBinding, GaugeBindings, GaugeFactory, TableRegistry};
pub use telemetry::{DispatchStats, Dispatcher, TelemetryPump};
