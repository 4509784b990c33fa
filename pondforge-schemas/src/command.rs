use crate::{
    measurement::Principal, parameters::WaterParameters, thresholds::ParameterThresholds,
    MeasurementId, PondId,
};
use serde::Deserialize;

/// One step of a replayable session script.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStep {
    Record {
        pond_id: PondId,
        parameters: WaterParameters,
        #[serde(default)]
        weather: String,
        #[serde(default)]
        notes: String,
        /// Overrides the session operator for this step.
        recorder: Option<Principal>,
    },
    UpdateThresholds {
        thresholds: ParameterThresholds,
    },
    ExpectMeasurement {
        measurement_id: MeasurementId,
    },
}
