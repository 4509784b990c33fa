use crate::{command::SessionStep, measurement::Principal, thresholds::ParameterThresholds};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SessionFile {
    pub schema_version: String,
    pub operator: Principal,
    pub steps: Vec<SessionStep>,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdFile {
    pub schema_version: String,
    pub thresholds: ParameterThresholds,
}
