//! Human-readable error descriptions and structured JSON error formatting.

use std::fmt;
use std::path::PathBuf;

/// Context attached to errors raised while reading or validating a profile.
#[derive(Debug)]
pub struct ProfileContext(pub PathBuf);

impl fmt::Display for ProfileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loading profile {}", self.0.display())
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use helios_core::error::{CalibrationError, RegistryError};

    // Typed matches first
    if let Some(ce) = err.downcast_ref::<CalibrationError>() {
        let detail = match ce {
            CalibrationError::NonFinite { .. } => {
                "Likely causes: NaN or infinite number in a breakpoint.\nHow to fix: Replace it with a finite value."
            }
            CalibrationError::InvertedBoundary { .. } => {
                "Likely causes: min and max swapped, or equal boundary inputs.\nHow to fix: Make min input strictly smaller than max input."
            }
            CalibrationError::DuplicateInput { .. } => {
                "Likely causes: Two breakpoints (or a breakpoint and a boundary) share an input.\nHow to fix: Remove one; use a nearby input with the same output to flatten the curve."
            }
            CalibrationError::TooFewPoints(_) => {
                "Likely causes: Table has fewer than two breakpoints.\nHow to fix: Provide at least min and max."
            }
            CalibrationError::SpanOverflow { .. } => {
                "Likely causes: Neighbouring breakpoints near the f64 limits.\nHow to fix: Rescale the table into a smaller unit."
            }
        };
        return format!("What happened: Invalid calibration table ({err:#}).\n{detail}");
    }

    if let Some(re) = err.downcast_ref::<RegistryError>() {
        return match re {
            RegistryError::UnknownTable(name) => format!(
                "What happened: No calibration table named '{name}'.\nLikely causes: Typo in --table or the table is missing from the profile.\nHow to fix: Run `helios check` to list tables, or `helios builtin list` for stock ones."
            ),
            RegistryError::DuplicateTable(name) => format!(
                "What happened: Table '{name}' is defined twice.\nHow to fix: Rename or remove one [[table]] entry."
            ),
            RegistryError::DuplicateGauge(id) => format!(
                "What happened: Gauge '{id}' is bound twice.\nHow to fix: Give each [[gauge]] a unique id."
            ),
        };
    }

    if let Some(ctx) = err.downcast_ref::<ProfileContext>() {
        let cause = err
            .chain()
            .skip(1)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");
        return format!(
            "What happened: Could not load profile {}.\nCause: {cause}\nHow to fix: Check the path given to --profile and fix the reported key.",
            ctx.0.display()
        );
    }

    // String-based heuristics for errors coming from input files
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("calibration csv must have headers") {
        return "Invalid headers in calibration CSV. Expected 'input,output'.".to_string();
    }
    if lower.contains("open telemetry input") {
        return format!("What happened: {msg}.\nHow to fix: Check the --input path.");
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for calibration errors, 4 for profile/registry errors, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use helios_core::error::{CalibrationError, RegistryError};
    if err.downcast_ref::<CalibrationError>().is_some() {
        return 3;
    }
    if err.downcast_ref::<ProfileContext>().is_some()
        || err.downcast_ref::<RegistryError>().is_some()
    {
        return 4;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = match exit_code_for_error(err) {
        3 => "Calibration",
        4 => "Profile",
        _ => "Error",
    };
    json!({ "reason": reason, "code": exit_code_for_error(err), "message": humanize(err) })
        .to_string()
}
