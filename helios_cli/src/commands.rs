//! Command implementations. Results go to stdout, logs to stderr.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use eyre::{Result, WrapErr};
use helios_config::Profile;
use helios_core::{
    CalibrationPointCollection, Dispatcher, GaugeBindings, GaugeFactory, RegistryError,
    TableRegistry, TelemetryPump,
};
use serde_json::json;

use crate::error_fmt::ProfileContext;
use crate::replay::{CsvTelemetrySource, StdoutSink};

fn base_dir(profile_path: &Path) -> &Path {
    profile_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Build tables and bindings; failures (including referenced CSV files) are
/// reported against the profile.
fn build_registry(
    profile: &Profile,
    profile_path: &Path,
) -> Result<(TableRegistry, GaugeBindings)> {
    profile
        .build_registry(base_dir(profile_path))
        .wrap_err_with(|| ProfileContext(profile_path.to_path_buf()))
}

fn table<'a>(registry: &'a TableRegistry, name: &str) -> Result<&'a CalibrationPointCollection> {
    registry
        .get(name)
        .ok_or_else(|| RegistryError::UnknownTable(name.to_string()).into())
}

fn extrapolation_name(t: &CalibrationPointCollection) -> &'static str {
    match t.extrapolation() {
        helios_core::ExtrapolationPolicy::Extend => "extend",
        helios_core::ExtrapolationPolicy::Clamp => "clamp",
    }
}

pub fn check(profile: &Profile, profile_path: &Path, json: bool) -> Result<()> {
    let (registry, bindings) = build_registry(profile, profile_path)?;
    tracing::info!(
        tables = registry.len(),
        gauges = bindings.len(),
        "profile OK"
    );
    if json {
        let tables: Vec<_> = registry
            .iter()
            .map(|(name, t)| {
                json!({
                    "name": name,
                    "points": t.len(),
                    "min_input": t.min_input(),
                    "max_input": t.max_input(),
                    "extrapolation": extrapolation_name(t),
                })
            })
            .collect();
        println!(
            "{}",
            json!({ "tables": tables, "gauges": bindings.len() })
        );
    } else {
        for (name, t) in registry.iter() {
            println!(
                "{name}: {} points, input [{}, {}], {}",
                t.len(),
                t.min_input(),
                t.max_input(),
                extrapolation_name(t)
            );
        }
        println!(
            "profile OK: {} tables, {} gauges",
            registry.len(),
            bindings.len()
        );
    }
    Ok(())
}

fn print_values(name: &str, t: &CalibrationPointCollection, values: &[f64], json: bool) {
    if json {
        let rows: Vec<_> = values
            .iter()
            .map(|&x| json!({ "input": x, "output": t.interpolate(x) }))
            .collect();
        println!("{}", json!({ "table": name, "values": rows }));
    } else {
        for &x in values {
            println!("{name}({x}) = {:.4}", t.interpolate(x));
        }
    }
}

pub fn eval(
    profile: &Profile,
    profile_path: &Path,
    name: &str,
    values: &[f64],
    json: bool,
) -> Result<()> {
    let (registry, _) = build_registry(profile, profile_path)?;
    let t = table(&registry, name)?;
    print_values(name, t, values, json);
    Ok(())
}

pub fn sweep(
    profile: &Profile,
    profile_path: &Path,
    name: &str,
    from: f64,
    to: f64,
    steps: usize,
    json: bool,
) -> Result<()> {
    if steps < 2 {
        eyre::bail!("--steps must be >= 2");
    }
    if !(from.is_finite() && to.is_finite()) {
        eyre::bail!("--from and --to must be finite");
    }
    let (registry, _) = build_registry(profile, profile_path)?;
    let t = table(&registry, name)?;
    let last = (steps - 1) as f64;
    let xs: Vec<f64> = (0..steps)
        .map(|i| from + (to - from) * (i as f64) / last)
        .collect();
    print_values(name, t, &xs, json);
    Ok(())
}

pub fn replay(
    profile: &Profile,
    profile_path: &Path,
    input: Option<&Path>,
    json: bool,
) -> Result<()> {
    let (registry, bindings) = build_registry(profile, profile_path)?;
    let reader: Box<dyn Read + Send> = match input {
        Some(p) => Box::new(
            File::open(p).wrap_err_with(|| format!("open telemetry input {}", p.display()))?,
        ),
        None => Box::new(std::io::stdin()),
    };
    let pump = TelemetryPump::spawn(
        CsvTelemetrySource::new(reader),
        profile.telemetry.channel_capacity,
    );
    let mut dispatcher = Dispatcher::new(registry, bindings, StdoutSink { json })?;
    let stats = dispatcher.run(&pump)?;
    tracing::info!(
        samples = stats.samples,
        updates = stats.updates,
        unbound = stats.unbound,
        dropped = stats.dropped,
        "replay complete"
    );
    Ok(())
}

pub fn builtin(name: &str, values: &[f64], json: bool) -> Result<()> {
    let factory = GaugeFactory::with_builtins();
    if name == "list" {
        for n in factory.names() {
            println!("{n}");
        }
        return Ok(());
    }
    let t = factory.create(name)?;
    print_values(name, &t, values, json);
    Ok(())
}
