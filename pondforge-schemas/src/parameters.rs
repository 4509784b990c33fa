use serde::{Deserialize, Serialize};
use std::fmt;

/// The thresholded water-quality parameters.
///
/// Turbidity is recorded alongside these but is never compared against a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    Ph,
    DissolvedOxygen,
    Ammonia,
    Nitrite,
    Nitrate,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Temperature,
        Parameter::Ph,
        Parameter::DissolvedOxygen,
        Parameter::Ammonia,
        Parameter::Nitrite,
        Parameter::Nitrate,
    ];

    /// Raw units per whole unit of the parameter.
    pub fn scale(self) -> i64 {
        match self {
            Parameter::Ammonia | Parameter::Nitrite => 100,
            _ => 10,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Ph => "pH",
            Parameter::DissolvedOxygen
            | Parameter::Ammonia
            | Parameter::Nitrite
            | Parameter::Nitrate => "mg/L",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Ph => "pH",
            Parameter::DissolvedOxygen => "dissolved oxygen",
            Parameter::Ammonia => "ammonia",
            Parameter::Nitrite => "nitrite",
            Parameter::Nitrate => "nitrate",
        }
    }

    pub fn to_decimal(self, raw: i64) -> f64 {
        raw as f64 / self.scale() as f64
    }

    /// Renders a raw value with exactly as many decimals as the scale implies.
    pub fn format(self, raw: i64) -> String {
        let digits = if self.scale() == 100 { 2 } else { 1 };
        format!("{:.*}", digits, self.to_decimal(raw))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reading of a pond's water, in fixed-point raw units.
///
/// | field              | unit          |
/// |--------------------|---------------|
/// | `temperature`      | 0.1 °C        |
/// | `ph`               | 0.1 pH        |
/// | `dissolved_oxygen` | 0.1 mg/L      |
/// | `ammonia`          | 0.01 mg/L     |
/// | `nitrite`          | 0.01 mg/L     |
/// | `nitrate`          | 0.1 mg/L      |
/// | `turbidity`        | NTU           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterParameters {
    pub temperature: i32,
    pub ph: i32,
    pub dissolved_oxygen: u32,
    pub ammonia: u32,
    pub nitrite: u32,
    pub nitrate: u32,
    #[serde(default)]
    pub turbidity: u32,
}

impl WaterParameters {
    /// Raw value of a thresholded parameter, widened so signed and unsigned
    /// fields compare on one axis.
    pub fn raw(&self, parameter: Parameter) -> i64 {
        match parameter {
            Parameter::Temperature => i64::from(self.temperature),
            Parameter::Ph => i64::from(self.ph),
            Parameter::DissolvedOxygen => i64::from(self.dissolved_oxygen),
            Parameter::Ammonia => i64::from(self.ammonia),
            Parameter::Nitrite => i64::from(self.nitrite),
            Parameter::Nitrate => i64::from(self.nitrate),
        }
    }

    pub fn decimal(&self, parameter: Parameter) -> f64 {
        parameter.to_decimal(self.raw(parameter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_using_parameter_scale() {
        assert_eq!(Parameter::Temperature.format(-15), "-1.5");
        assert_eq!(Parameter::Ammonia.format(25), "0.25");
        assert_eq!(Parameter::Nitrate.format(500), "50.0");
    }

    #[test]
    fn turbidity_defaults_when_omitted() {
        let yaml = "temperature: 250\nph: 72\ndissolved_oxygen: 85\n\
                    ammonia: 25\nnitrite: 5\nnitrate: 200\n";
        let params: WaterParameters = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.turbidity, 0);
        assert_eq!(params.decimal(Parameter::Ph), 7.2);
    }
}
