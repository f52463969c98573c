#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Gauge profile schema and calibration table loading.
//!
//! - `Profile` and sub-structs are deserialized from TOML and validated.
//! - Breakpoint CSV loader enforces headers and reports the offending line.
//! - `Profile::build_registry` turns a validated profile into the core
//!   `TableRegistry` and `GaugeBindings`.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use helios_core::{
    CalibrationPoint, CalibrationPointCollection, ExtrapolationPolicy, GaugeBindings,
    GaugeFactory, TableRegistry,
};
use serde::Deserialize;
use serde::de::Deserializer;

/// Breakpoint CSV schema.
///
/// Expected headers:
/// input,output
///
/// Example:
/// input,output
/// 0.0,0.0
/// 33.0,110.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CalibrationRow {
    pub input: f64,
    pub output: f64,
}

impl From<CalibrationRow> for CalibrationPoint {
    fn from(r: CalibrationRow) -> Self {
        Self::new(r.input, r.output)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryCfg {
    /// Samples buffered between the ingestion thread and the render loop
    pub channel_capacity: usize,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    #[default]
    Extend,
    Clamp,
}

impl From<Extrapolation> for ExtrapolationPolicy {
    fn from(e: Extrapolation) -> Self {
        match e {
            Extrapolation::Extend => Self::Extend,
            Extrapolation::Clamp => Self::Clamp,
        }
    }
}

/// One calibration table. Either `min`/`max` (plus optional `points`/`csv`)
/// or `builtin` naming a stock table.
#[derive(Debug, Deserialize)]
pub struct TableCfg {
    pub name: String,
    #[serde(default, deserialize_with = "de_point_opt")]
    pub min: Option<(f64, f64)>,
    #[serde(default, deserialize_with = "de_point_opt")]
    pub max: Option<(f64, f64)>,
    /// Accepts either:
    /// - array of tuples: [[33.0, 110.0], [55.0, 182.0]]
    /// - array of tables: [{ input = 33.0, output = 110.0 }, ...]
    #[serde(default, deserialize_with = "de_points")]
    pub points: Vec<(f64, f64)>,
    #[serde(default)]
    pub extrapolation: Extrapolation,
    /// Extra breakpoints from a CSV file, relative to the profile directory
    #[serde(default)]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub builtin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GaugeCfg {
    pub id: String,
    pub table: String,
    pub device: String,
    pub element: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Profile {
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub telemetry: TelemetryCfg,
    #[serde(default, rename = "table")]
    pub tables: Vec<TableCfg>,
    #[serde(default, rename = "gauge")]
    pub gauges: Vec<GaugeCfg>,
}

pub fn load_toml(s: &str) -> Result<Profile, toml::de::Error> {
    toml::from_str::<Profile>(s)
}

/// Read, parse and validate a profile file.
pub fn load_profile(path: &Path) -> eyre::Result<Profile> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read profile {:?}: {}", path, e))?;
    let profile =
        load_toml(&text).map_err(|e| eyre::eyre!("invalid profile TOML {:?}: {}", path, e))?;
    profile.validate()?;
    Ok(profile)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointToml {
    Tuple((f64, f64)),
    Table { input: f64, output: f64 },
}

impl From<PointToml> for (f64, f64) {
    fn from(p: PointToml) -> Self {
        match p {
            PointToml::Tuple(t) => t,
            PointToml::Table { input, output } => (input, output),
        }
    }
}

fn de_point_opt<'de, D>(deserializer: D) -> Result<Option<(f64, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<PointToml> = Option::deserialize(deserializer)?;
    Ok(opt.map(Into::into))
}

fn de_points<'de, D>(deserializer: D) -> Result<Vec<(f64, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Vec<PointToml>> = Option::deserialize(deserializer)?;
    Ok(opt
        .unwrap_or_default()
        .into_iter()
        .map(Into::into)
        .collect())
}

pub fn load_points_csv(path: &Path) -> eyre::Result<Vec<CalibrationPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open calibration CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["input", "output"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "calibration CSV must have headers 'input,output', got: {}",
            actual.join(",")
        );
    }

    // Line numbers come from the record position; blank lines are skipped
    let mut points = Vec::new();
    let mut record = csv::StringRecord::new();
    while rdr
        .read_record(&mut record)
        .map_err(|e| eyre::eyre!("read calibration CSV {:?}: {}", path, e))?
    {
        let line = record.position().map_or(0, csv::Position::line);
        match record.deserialize::<CalibrationRow>(Some(&headers)) {
            Ok(row) => points.push(row.into()),
            Err(e) => {
                eyre::bail!("invalid CSV row at line {line}: {e}");
            }
        }
    }
    Ok(points)
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const ROTATIONS: [&str; 3] = ["never", "daily", "hourly"];

impl TableCfg {
    /// Build the core table, reading `csv` relative to `base_dir`.
    pub fn build(&self, base_dir: &Path) -> eyre::Result<CalibrationPointCollection> {
        if let Some(builtin) = &self.builtin {
            return Ok(GaugeFactory::with_builtins()
                .create(builtin)?
                .with_extrapolation(self.extrapolation.into()));
        }
        let (Some(min), Some(max)) = (self.min, self.max) else {
            eyre::bail!("table '{}' needs both min and max", self.name);
        };
        let mut builder = CalibrationPointCollection::builder(min.0, min.1, max.0, max.1)
            .named(self.name.as_str())
            .points(self.points.iter().copied())
            .extrapolation(self.extrapolation.into());
        if let Some(csv) = &self.csv {
            let path = base_dir.join(csv);
            builder = builder.points(load_points_csv(&path)?);
        }
        Ok(builder.build()?)
    }
}

impl Profile {
    pub fn validate(&self) -> eyre::Result<()> {
        // Logging
        if let Some(level) = &self.logging.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace, got '{level}'");
        }
        if let Some(rot) = &self.logging.rotation
            && !ROTATIONS.contains(&rot.to_ascii_lowercase().as_str())
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
        }

        // Telemetry
        if self.telemetry.channel_capacity == 0 {
            eyre::bail!("telemetry.channel_capacity must be >= 1");
        }

        // Tables
        let factory = GaugeFactory::with_builtins();
        let mut names = HashSet::new();
        for t in &self.tables {
            if t.name.trim().is_empty() {
                eyre::bail!("table.name must not be empty");
            }
            if !names.insert(t.name.as_str()) {
                eyre::bail!("table.name '{}' is defined more than once", t.name);
            }
            match &t.builtin {
                Some(b) => {
                    if t.min.is_some() || t.max.is_some() || !t.points.is_empty() || t.csv.is_some()
                    {
                        eyre::bail!(
                            "table '{}': builtin tables cannot also set min/max/points/csv",
                            t.name
                        );
                    }
                    if !factory.names().any(|n| n == b) {
                        eyre::bail!("table '{}': unknown builtin '{b}'", t.name);
                    }
                }
                None => {
                    let (Some(min), Some(max)) = (t.min, t.max) else {
                        eyre::bail!("table '{}' needs both min and max", t.name);
                    };
                    if ![min.0, min.1, max.0, max.1].iter().all(|v| v.is_finite()) {
                        eyre::bail!("table '{}': min/max must be finite", t.name);
                    }
                    if min.0 >= max.0 {
                        eyre::bail!(
                            "table '{}': min input must be < max input ({} >= {})",
                            t.name,
                            min.0,
                            max.0
                        );
                    }
                }
            }
        }

        // Gauges
        let mut ids = HashSet::new();
        for g in &self.gauges {
            if g.id.trim().is_empty() {
                eyre::bail!("gauge.id must not be empty");
            }
            if !ids.insert(g.id.as_str()) {
                eyre::bail!("gauge.id '{}' is defined more than once", g.id);
            }
            if g.device.trim().is_empty() || g.element.trim().is_empty() {
                eyre::bail!("gauge '{}': device and element must not be empty", g.id);
            }
            if !names.contains(g.table.as_str()) {
                eyre::bail!("gauge '{}' references unknown table '{}'", g.id, g.table);
            }
        }

        Ok(())
    }

    /// Validate, then build every table and binding.
    pub fn build_registry(&self, base_dir: &Path) -> eyre::Result<(TableRegistry, GaugeBindings)> {
        self.validate()?;
        let mut registry = TableRegistry::new();
        for t in &self.tables {
            let table = t
                .build(base_dir)
                .wrap_err_with(|| format!("building table '{}'", t.name))?;
            registry.insert(t.name.as_str(), table)?;
        }
        let mut bindings = GaugeBindings::new();
        for g in &self.gauges {
            bindings.bind(
                g.device.as_str(),
                g.element.as_str(),
                g.id.as_str(),
                g.table.as_str(),
            )?;
        }
        Ok((registry, bindings))
    }
}
