use std::collections::BTreeMap;

use serde::Serialize;

/// Temperatures travel as integer hundredths of a degree Celsius.
pub const TEMPERATURE_SCALE: f64 = 100.0;

/// Placeholder recorded when the controller omitted a field.
pub const NOT_AVAILABLE: &str = "NA";

/// Map key under which the device's unique id is stored after an update.
pub const UNIQUE_ID_KEY: &str = "Unique ID";

/// Addressing scope of a parameter on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterKind {
    /// Per-device value, addressed as `G{index}.{name}`.
    ControllerDevice,
    /// Controller-wide value, addressed as `CD.{name}`.
    ControllerGlobal,
    /// Declared by the protocol but not queried by any request.
    ReadOnly,
}

impl ParameterKind {
    /// Numeric code used by the controller's own tooling.
    pub(crate) fn wire_code(&self) -> u8 {
        match self {
            ParameterKind::ControllerGlobal => 0,
            ParameterKind::ControllerDevice => 1,
            ParameterKind::ReadOnly => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParameterKind,
}

impl ParameterDescriptor {
    pub const fn new(name: &'static str, description: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            description,
            kind,
        }
    }
}

/// The fields queried for every device. Parsing is positional, so the order
/// here must match the order of the request.
pub const DESCRIPTORS: [ParameterDescriptor; 10] = [
    ParameterDescriptor::new("name", "Name", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("upass", "Password", ParameterKind::ControllerGlobal),
    ParameterDescriptor::new("SollTempMaxVal", "Setpoint max", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("SollTempMinVal", "Setpoint min", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("WeekProg", "Week program", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("OPMode", "Operation mode", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("SollTemp", "Setpoint", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("RaumTemp", "Temperature", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("kurzID", "Device ID", ParameterKind::ControllerDevice),
    ParameterDescriptor::new("ownerKurzID", "Controller ID", ParameterKind::ControllerDevice),
];

/// Device parameters keyed by descriptor description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, String>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.get(UNIQUE_ID_KEY)
    }
}

impl FromIterator<(String, String)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Format a temperature the way the controller echoes it back.
/// The float formatting keeps a fractional part: 30.0 becomes "3000.0".
pub fn to_wire_temperature(celsius: f64) -> String {
    format!("{:?}", celsius * TEMPERATURE_SCALE)
}

pub fn from_wire_temperature(hundredths: i64) -> f64 {
    hundredths as f64 / TEMPERATURE_SCALE
}
