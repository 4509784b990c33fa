//! Classifies a reading as critical against the current thresholds.

use pondforge_schemas::{
    parameters::{Parameter, WaterParameters},
    thresholds::ParameterThresholds,
};
use serde::{Deserialize, Serialize};

/// Which side of a bound a reading fell on, and the bound itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side", content = "limit", rename_all = "snake_case")]
pub enum Bound {
    Below(i64),
    Above(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breach {
    pub parameter: Parameter,
    pub bound: Bound,
    pub observed: i64,
}

/// True when any thresholded parameter lies strictly outside its bounds.
///
/// Turbidity is deliberately not consulted.
pub fn is_critical(params: &WaterParameters, cfg: &ParameterThresholds) -> bool {
    params.temperature < cfg.min_temperature
        || params.temperature > cfg.max_temperature
        || params.ph < cfg.min_ph
        || params.ph > cfg.max_ph
        || params.dissolved_oxygen < cfg.min_dissolved_oxygen
        || params.ammonia > cfg.max_ammonia
        || params.nitrite > cfg.max_nitrite
        || params.nitrate > cfg.max_nitrate
}

/// Every violated bound, in `Parameter::ALL` order. Empty exactly when
/// `is_critical` is false.
pub fn breaches(params: &WaterParameters, cfg: &ParameterThresholds) -> Vec<Breach> {
    let mut found = Vec::new();
    for parameter in Parameter::ALL {
        let observed = params.raw(parameter);
        if let Some(limit) = cfg.lower_bound(parameter) {
            if observed < limit {
                found.push(Breach {
                    parameter,
                    bound: Bound::Below(limit),
                    observed,
                });
            }
        }
        if let Some(limit) = cfg.upper_bound(parameter) {
            if observed > limit {
                found.push(Breach {
                    parameter,
                    bound: Bound::Above(limit),
                    observed,
                });
            }
        }
    }
    found
}

impl Breach {
    pub fn describe(&self) -> String {
        let (relation, limit) = match self.bound {
            Bound::Below(limit) => ("below minimum", limit),
            Bound::Above(limit) => ("above maximum", limit),
        };
        format!(
            "{} {} {} {} {}",
            self.parameter,
            self.parameter.format(self.observed),
            relation,
            self.parameter.format(limit),
            self.parameter.unit()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> WaterParameters {
        WaterParameters {
            temperature: 250,
            ph: 72,
            dissolved_oxygen: 85,
            ammonia: 25,
            nitrite: 5,
            nitrate: 200,
            turbidity: 0,
        }
    }

    #[test]
    fn healthy_reading_is_normal_regardless_of_turbidity() {
        let cfg = ParameterThresholds::default();
        for turbidity in [0, 40, u32::MAX] {
            let params = WaterParameters {
                turbidity,
                ..healthy()
            };
            assert!(!is_critical(&params, &cfg));
            assert!(breaches(&params, &cfg).is_empty());
        }
    }

    #[test]
    fn cold_water_is_critical() {
        let cfg = ParameterThresholds::default();
        let params = WaterParameters {
            temperature: 100,
            ..healthy()
        };
        assert!(is_critical(&params, &cfg));
        assert_eq!(
            breaches(&params, &cfg),
            vec![Breach {
                parameter: Parameter::Temperature,
                bound: Bound::Below(150),
                observed: 100,
            }]
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let cfg = ParameterThresholds::default();
        let at_edges = WaterParameters {
            temperature: cfg.max_temperature,
            ph: cfg.min_ph,
            dissolved_oxygen: cfg.min_dissolved_oxygen,
            ammonia: cfg.max_ammonia,
            nitrite: cfg.max_nitrite,
            nitrate: cfg.max_nitrate,
            turbidity: 0,
        };
        assert!(!is_critical(&at_edges, &cfg));
    }

    #[test]
    fn each_bound_trips_on_its_own() {
        let cfg = ParameterThresholds::default();
        let cases = [
            WaterParameters {
                temperature: 321,
                ..healthy()
            },
            WaterParameters {
                ph: 64,
                ..healthy()
            },
            WaterParameters {
                ph: 91,
                ..healthy()
            },
            WaterParameters {
                dissolved_oxygen: 49,
                ..healthy()
            },
            WaterParameters {
                ammonia: 51,
                ..healthy()
            },
            WaterParameters {
                nitrite: 11,
                ..healthy()
            },
            WaterParameters {
                nitrate: 501,
                ..healthy()
            },
        ];
        for params in cases {
            assert!(is_critical(&params, &cfg), "{params:?}");
            assert_eq!(breaches(&params, &cfg).len(), 1, "{params:?}");
        }
    }

    #[test]
    fn inverted_temperature_bounds_breach_both_sides() {
        let cfg = ParameterThresholds {
            min_temperature: 400,
            max_temperature: 100,
            ..ParameterThresholds::default()
        };
        let found = breaches(&healthy(), &cfg);
        assert!(is_critical(&healthy(), &cfg));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn describes_breach_in_decimal_units() {
        let breach = Breach {
            parameter: Parameter::Ammonia,
            bound: Bound::Above(50),
            observed: 75,
        };
        assert_eq!(breach.describe(), "ammonia 0.75 above maximum 0.50 mg/L");
    }
}
