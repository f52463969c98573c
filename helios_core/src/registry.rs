//! Explicit registries populated at startup.
//!
//! - `TableRegistry`: named calibration tables.
//! - `GaugeBindings`: which gauges a (device, element) telemetry key drives.
//! - `GaugeFactory`: named constructors for built-in tables.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::calibration::CalibrationPointCollection;
use crate::error::{CalibrationError, RegistryError, Result};
use crate::tables;

#[derive(Debug, Default, Clone)]
pub struct TableRegistry {
    tables: BTreeMap<String, CalibrationPointCollection>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        table: CalibrationPointCollection,
    ) -> std::result::Result<(), RegistryError> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(RegistryError::DuplicateTable(name));
        }
        self.tables.insert(name, table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CalibrationPointCollection> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn interpolate(&self, name: &str, x: f64) -> std::result::Result<f64, RegistryError> {
        self.get(name)
            .map(|t| t.interpolate(x))
            .ok_or_else(|| RegistryError::UnknownTable(name.to_string()))
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CalibrationPointCollection)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeBinding {
    pub gauge: String,
    pub table: String,
}

#[derive(Debug, Default, Clone)]
pub struct GaugeBindings {
    // device -> element -> bindings
    by_device: HashMap<String, HashMap<String, Vec<GaugeBinding>>>,
    gauges: HashSet<String>,
}

impl GaugeBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `gauge` to a telemetry key. Gauge ids are unique across the profile.
    pub fn bind(
        &mut self,
        device: impl Into<String>,
        element: impl Into<String>,
        gauge: impl Into<String>,
        table: impl Into<String>,
    ) -> std::result::Result<(), RegistryError> {
        let gauge = gauge.into();
        if !self.gauges.insert(gauge.clone()) {
            return Err(RegistryError::DuplicateGauge(gauge));
        }
        self.by_device
            .entry(device.into())
            .or_default()
            .entry(element.into())
            .or_default()
            .push(GaugeBinding {
                gauge,
                table: table.into(),
            });
        Ok(())
    }

    /// Bindings for a telemetry key; empty when nothing listens to it.
    pub fn lookup(&self, device: &str, element: &str) -> &[GaugeBinding] {
        self.by_device
            .get(device)
            .and_then(|m| m.get(element))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GaugeBinding> {
        self.by_device.values().flat_map(|m| m.values()).flatten()
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Every binding must point at a registered table.
    pub fn check_tables(&self, registry: &TableRegistry) -> std::result::Result<(), RegistryError> {
        match self.iter().find(|b| !registry.contains(&b.table)) {
            Some(b) => Err(RegistryError::UnknownTable(b.table.clone())),
            None => Ok(()),
        }
    }
}

pub type TableCtor = fn() -> std::result::Result<CalibrationPointCollection, CalibrationError>;

/// Named constructors for calibration tables.
#[derive(Debug, Default, Clone)]
pub struct GaugeFactory {
    ctors: BTreeMap<String, TableCtor>,
}

impl GaugeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory preloaded with the stock instrument tables.
    pub fn with_builtins() -> Self {
        let mut f = Self::new();
        for (name, ctor) in [
            ("airspeed_indicator", tables::airspeed_indicator as TableCtor),
            ("rotor_rpm", tables::rotor_rpm as TableCtor),
            ("trim_indicator", tables::trim_indicator as TableCtor),
            ("vertical_velocity", tables::vertical_velocity as TableCtor),
        ] {
            f.ctors.insert(name.to_string(), ctor);
        }
        f
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        ctor: TableCtor,
    ) -> std::result::Result<(), RegistryError> {
        let name = name.into();
        if self.ctors.contains_key(&name) {
            return Err(RegistryError::DuplicateTable(name));
        }
        self.ctors.insert(name, ctor);
        Ok(())
    }

    pub fn create(&self, name: &str) -> Result<CalibrationPointCollection> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTable(name.to_string()))?;
        Ok(ctor()?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    /// Construct every registered table into `registry` under its factory name.
    pub fn populate(&self, registry: &mut TableRegistry) -> Result<()> {
        for name in self.names() {
            registry.insert(name, self.create(name)?)?;
        }
        Ok(())
    }
}
