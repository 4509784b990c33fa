//! Per-pond summaries over recorded measurements or a journal file.

use crate::{error::PondforgeError, logger, store::MeasurementStore};
use pondforge_schemas::{
    parameters::{Parameter, WaterParameters},
    PondId,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PondSummary {
    pub pond_id: PondId,
    pub measurements: usize,
    pub critical: usize,
    pub critical_ratio: f64,
    pub first_recorded_at: u64,
    pub last_recorded_at: u64,
    pub parameters: BTreeMap<Parameter, ParameterStats>,
    /// NTU; reported but never thresholded.
    pub turbidity: ParameterStats,
}

#[derive(Debug, Clone, Copy)]
struct RunningStats {
    min: i64,
    max: i64,
    sum: i128,
    n: u64,
}

impl RunningStats {
    fn new(first: i64) -> Self {
        Self {
            min: first,
            max: first,
            sum: i128::from(first),
            n: 1,
        }
    }

    fn push(&mut self, value: i64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += i128::from(value);
        self.n += 1;
    }

    fn finish(&self, scale: i64) -> ParameterStats {
        let scale = scale as f64;
        ParameterStats {
            min: self.min as f64 / scale,
            max: self.max as f64 / scale,
            mean: self.sum as f64 / self.n as f64 / scale,
        }
    }
}

#[derive(Debug)]
struct PondAccumulator {
    measurements: usize,
    critical: usize,
    first_recorded_at: u64,
    last_recorded_at: u64,
    parameters: BTreeMap<Parameter, RunningStats>,
    turbidity: RunningStats,
}

impl PondAccumulator {
    fn new(params: &WaterParameters, critical: bool, recorded_at: u64) -> Self {
        Self {
            measurements: 1,
            critical: usize::from(critical),
            first_recorded_at: recorded_at,
            last_recorded_at: recorded_at,
            parameters: Parameter::ALL
                .iter()
                .map(|p| (*p, RunningStats::new(params.raw(*p))))
                .collect(),
            turbidity: RunningStats::new(i64::from(params.turbidity)),
        }
    }

    fn push(&mut self, params: &WaterParameters, critical: bool, recorded_at: u64) {
        self.measurements += 1;
        self.critical += usize::from(critical);
        self.first_recorded_at = self.first_recorded_at.min(recorded_at);
        self.last_recorded_at = self.last_recorded_at.max(recorded_at);
        for (parameter, stats) in self.parameters.iter_mut() {
            stats.push(params.raw(*parameter));
        }
        self.turbidity.push(i64::from(params.turbidity));
    }

    fn finish(self, pond_id: PondId) -> PondSummary {
        PondSummary {
            pond_id,
            measurements: self.measurements,
            critical: self.critical,
            critical_ratio: self.critical as f64 / self.measurements as f64,
            first_recorded_at: self.first_recorded_at,
            last_recorded_at: self.last_recorded_at,
            parameters: self
                .parameters
                .into_iter()
                .map(|(p, stats)| (p, stats.finish(p.scale())))
                .collect(),
            turbidity: self.turbidity.finish(1),
        }
    }
}

fn summarize_observations<I>(observations: I) -> Vec<PondSummary>
where
    I: IntoIterator<Item = (PondId, WaterParameters, bool, u64)>,
{
    let mut ponds: BTreeMap<PondId, PondAccumulator> = BTreeMap::new();
    for (pond_id, params, critical, recorded_at) in observations {
        match ponds.get_mut(&pond_id) {
            Some(acc) => acc.push(&params, critical, recorded_at),
            None => {
                ponds.insert(pond_id, PondAccumulator::new(&params, critical, recorded_at));
            }
        }
    }
    ponds
        .into_iter()
        .map(|(pond_id, acc)| acc.finish(pond_id))
        .collect()
}

/// Summaries for every pond in the store, ascending by pond id.
pub fn summarize(store: &MeasurementStore) -> Vec<PondSummary> {
    summarize_observations(
        store
            .measurements()
            .into_iter()
            .map(|m| (m.pond_id, m.parameters, m.critical, m.recorded_at)),
    )
}

/// Same as `summarize`, computed from a journal CSV.
pub fn summarize_journal(path: &str) -> Result<Vec<PondSummary>, PondforgeError> {
    let rows = logger::read_journal(path)?;
    Ok(summarize_observations(
        rows.iter()
            .map(|r| (r.pond_id, r.parameters(), r.critical, r.recorded_at)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MeasurementRequest, RecordContext};
    use pondforge_schemas::measurement::Principal;

    fn record(
        store: &MeasurementStore,
        pond_id: PondId,
        temperature: i32,
        turbidity: u32,
        at: u64,
    ) {
        store
            .record(
                RecordContext::new(Principal::new("t"), at),
                MeasurementRequest {
                    pond_id,
                    parameters: WaterParameters {
                        temperature,
                        ph: 72,
                        dissolved_oxygen: 85,
                        ammonia: 25,
                        nitrite: 5,
                        nitrate: 200,
                        turbidity,
                    },
                    weather: String::new(),
                    notes: String::new(),
                },
            )
            .unwrap();
    }

    #[test]
    fn summarizes_each_pond() {
        let store = MeasurementStore::default();
        record(&store, 2, 100, 4, 10);
        record(&store, 1, 250, 8, 11);
        record(&store, 2, 300, 6, 12);
        record(&store, 2, 260, 2, 13);

        let summaries = summarize(&store);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].pond_id, 1);

        let pond2 = &summaries[1];
        assert_eq!(pond2.measurements, 3);
        assert_eq!(pond2.critical, 1);
        assert_eq!(pond2.first_recorded_at, 10);
        assert_eq!(pond2.last_recorded_at, 13);
        let temp = pond2.parameters[&Parameter::Temperature];
        assert_eq!(temp.min, 10.0);
        assert_eq!(temp.max, 30.0);
        assert!((temp.mean - 22.0).abs() < 1e-9);
        assert_eq!(pond2.turbidity.max, 6.0);
        assert!((pond2.critical_ratio - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_store_has_no_summaries() {
        assert!(summarize(&MeasurementStore::default()).is_empty());
    }

    #[test]
    fn summary_serializes_parameter_keys_as_names() {
        let store = MeasurementStore::default();
        record(&store, 1, 250, 0, 0);
        let json = serde_json::to_value(summarize(&store)).unwrap();
        assert!(json[0]["parameters"]["dissolved_oxygen"]["min"].is_number());
    }
}
