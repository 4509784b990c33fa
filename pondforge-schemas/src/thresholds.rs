use crate::parameters::Parameter;
use serde::{Deserialize, Serialize};

/// Safe operating bounds, in the same raw units as `WaterParameters`.
///
/// No relationship between the `min_*` and `max_*` fields is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterThresholds {
    pub min_temperature: i32,
    pub max_temperature: i32,
    pub min_ph: i32,
    pub max_ph: i32,
    pub min_dissolved_oxygen: u32,
    pub max_ammonia: u32,
    pub max_nitrite: u32,
    pub max_nitrate: u32,
}

impl Default for ParameterThresholds {
    fn default() -> Self {
        Self {
            min_temperature: 150,
            max_temperature: 320,
            min_ph: 65,
            max_ph: 90,
            min_dissolved_oxygen: 50,
            max_ammonia: 50,
            max_nitrite: 10,
            max_nitrate: 500,
        }
    }
}

impl ParameterThresholds {
    pub fn lower_bound(&self, parameter: Parameter) -> Option<i64> {
        match parameter {
            Parameter::Temperature => Some(i64::from(self.min_temperature)),
            Parameter::Ph => Some(i64::from(self.min_ph)),
            Parameter::DissolvedOxygen => Some(i64::from(self.min_dissolved_oxygen)),
            Parameter::Ammonia | Parameter::Nitrite | Parameter::Nitrate => None,
        }
    }

    pub fn upper_bound(&self, parameter: Parameter) -> Option<i64> {
        match parameter {
            Parameter::Temperature => Some(i64::from(self.max_temperature)),
            Parameter::Ph => Some(i64::from(self.max_ph)),
            Parameter::Ammonia => Some(i64::from(self.max_ammonia)),
            Parameter::Nitrite => Some(i64::from(self.max_nitrite)),
            Parameter::Nitrate => Some(i64::from(self.max_nitrate)),
            Parameter::DissolvedOxygen => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let t: ParameterThresholds = serde_yaml::from_str("max_temperature: 300\n").unwrap();
        assert_eq!(t.max_temperature, 300);
        assert_eq!(t.min_temperature, 150);
        assert_eq!(t.max_nitrate, 500);
    }

    #[test]
    fn oxygen_has_only_a_floor() {
        let t = ParameterThresholds::default();
        assert_eq!(t.lower_bound(Parameter::DissolvedOxygen), Some(50));
        assert_eq!(t.upper_bound(Parameter::DissolvedOxygen), None);
        assert_eq!(t.lower_bound(Parameter::Nitrite), None);
    }
}
