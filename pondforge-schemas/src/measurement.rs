use crate::{
    parameters::WaterParameters,
    text::{NotesText, WeatherText},
    MeasurementId, PondId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of whoever recorded a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable, stored measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    pub pond_id: PondId,
    pub recorder: Principal,
    pub parameters: WaterParameters,
    pub weather: WeatherText,
    pub notes: NotesText,
    /// Logical time supplied by the recording environment.
    pub recorded_at: u64,
    /// Fixed at creation against the thresholds in force at that moment.
    pub critical: bool,
}
