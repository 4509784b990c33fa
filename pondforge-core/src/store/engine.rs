use super::state::{LedgerState, MeasurementRequest, RecordContext};
use crate::{
    error::PondforgeError,
    evaluator,
    index::{CRITICAL_INDEX_CAPACITY, POND_INDEX_CAPACITY},
};
use parking_lot::RwLock;
use pondforge_schemas::{
    measurement::Measurement,
    text::{NotesText, WeatherText},
    thresholds::ParameterThresholds,
    MeasurementId, PondId,
};
use tracing::{debug, info, warn};

/// Append-only ledger of pond measurements.
///
/// The counter, the records, both indices and the thresholds sit behind one
/// lock. `record` holds the write half for its whole duration, so readers see
/// either none or all of a measurement's effects.
#[derive(Debug)]
pub struct MeasurementStore {
    state: RwLock<LedgerState>,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::from_state(LedgerState::new(
            ParameterThresholds::default(),
            POND_INDEX_CAPACITY,
            CRITICAL_INDEX_CAPACITY,
        ))
    }
}

impl MeasurementStore {
    pub(super) fn from_state(state: LedgerState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Records a measurement and returns its id.
    ///
    /// Nothing changes unless every step succeeds: text is validated before
    /// the lock is taken, and both index slots are reserved before the first
    /// write.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `weather` exceeds 100 or `notes` 500 characters.
    /// - `CapacityExceeded` when the pond's index, or its critical index for a
    ///   critical reading, is full.
    pub fn record(
        &self,
        ctx: RecordContext,
        request: MeasurementRequest,
    ) -> Result<MeasurementId, PondforgeError> {
        self.record_evaluated(ctx, request).map(|(id, _)| id)
    }

    /// Same as `record`, also returning the thresholds the critical flag was
    /// evaluated against, read inside the same critical section.
    pub fn record_evaluated(
        &self,
        ctx: RecordContext,
        request: MeasurementRequest,
    ) -> Result<(MeasurementId, ParameterThresholds), PondforgeError> {
        let weather = WeatherText::new(request.weather)
            .map_err(|e| PondforgeError::invalid_text("weather", e))?;
        let notes =
            NotesText::new(request.notes).map_err(|e| PondforgeError::invalid_text("notes", e))?;

        let mut state = self.state.write();
        let id = state.counter;
        let thresholds = state.thresholds.get();
        let critical = evaluator::is_critical(&request.parameters, &thresholds);

        let pond_slot = state
            .pond_index
            .reserve(request.pond_id)
            .inspect_err(|e| warn!(pond_id = request.pond_id, "measurement rejected: {e}"))?;
        let critical_slot = if critical {
            let slot = state
                .critical_index
                .reserve(request.pond_id)
                .inspect_err(|e| warn!(pond_id = request.pond_id, "measurement rejected: {e}"))?;
            Some(slot)
        } else {
            None
        };

        state.pond_index.commit(pond_slot, id);
        if let Some(slot) = critical_slot {
            state.critical_index.commit(slot, id);
        }
        state.records.push(Measurement {
            id,
            pond_id: request.pond_id,
            recorder: ctx.recorder,
            parameters: request.parameters,
            weather,
            notes,
            recorded_at: ctx.recorded_at,
            critical,
        });
        state.counter += 1;
        drop(state);

        if critical {
            let reasons: Vec<String> = evaluator::breaches(&request.parameters, &thresholds)
                .iter()
                .map(|b| b.describe())
                .collect();
            warn!(
                measurement_id = id,
                pond_id = request.pond_id,
                "critical measurement: {}",
                reasons.join("; ")
            );
        } else {
            debug!(measurement_id = id, pond_id = request.pond_id, "measurement recorded");
        }
        Ok((id, thresholds))
    }

    pub fn get(&self, id: MeasurementId) -> Option<Measurement> {
        self.state.read().record(id).cloned()
    }

    /// All ids recorded for a pond, oldest first.
    pub fn pond_measurement_ids(&self, pond_id: PondId) -> Vec<MeasurementId> {
        self.state.read().pond_index.get(pond_id).to_vec()
    }

    /// Ids of the pond's critical measurements, oldest first.
    pub fn critical_measurement_ids(&self, pond_id: PondId) -> Vec<MeasurementId> {
        self.state.read().critical_index.get(pond_id).to_vec()
    }

    /// Number of measurements recorded so far, which is also the next id.
    pub fn count(&self) -> u64 {
        self.state.read().counter
    }

    pub fn thresholds(&self) -> ParameterThresholds {
        self.state.read().thresholds.get()
    }

    /// Replaces the thresholds for every later `record` call. Stored critical
    /// flags are left as they are.
    pub fn update_thresholds(&self, thresholds: ParameterThresholds) {
        self.state.write().thresholds.update(thresholds);
        info!(?thresholds, "thresholds updated");
    }

    /// Ponds with at least one measurement, ascending.
    pub fn pond_ids(&self) -> Vec<PondId> {
        self.state.read().pond_index.owners()
    }

    pub fn measurements_for_pond(&self, pond_id: PondId) -> Vec<Measurement> {
        let state = self.state.read();
        state
            .pond_index
            .get(pond_id)
            .iter()
            .filter_map(|id| state.record(*id).cloned())
            .collect()
    }

    /// Every record, in id order, read under a single lock.
    pub fn measurements(&self) -> Vec<Measurement> {
        self.state.read().records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::builder::MeasurementStoreBuilder;
    use assert_matches::assert_matches;
    use pondforge_schemas::{measurement::Principal, parameters::WaterParameters};

    fn ctx(at: u64) -> RecordContext {
        RecordContext::new(Principal::new("tester"), at)
    }

    fn reading(pond_id: PondId, temperature: i32) -> MeasurementRequest {
        MeasurementRequest {
            pond_id,
            parameters: WaterParameters {
                temperature,
                ph: 72,
                dissolved_oxygen: 85,
                ammonia: 25,
                nitrite: 5,
                nitrate: 200,
                turbidity: 10,
            },
            weather: "sunny".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn ids_start_at_zero_and_increase() {
        let store = MeasurementStore::default();
        for expected in 0..5 {
            assert_eq!(store.record(ctx(expected), reading(1, 250)).unwrap(), expected);
        }
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn stores_injected_context_and_flag() {
        let store = MeasurementStore::default();
        let id = store
            .record(RecordContext::new(Principal::new("ops"), 812), reading(4, 100))
            .unwrap();
        let m = store.get(id).unwrap();
        assert_eq!(m.recorder, Principal::new("ops"));
        assert_eq!(m.recorded_at, 812);
        assert_eq!(m.pond_id, 4);
        assert!(m.critical);
        assert_eq!(store.critical_measurement_ids(4), vec![id]);
    }

    #[test]
    fn unknown_lookups_are_empty() {
        let store = MeasurementStore::default();
        assert!(store.get(0).is_none());
        assert!(store.get(u64::MAX).is_none());
        assert!(store.pond_measurement_ids(9).is_empty());
        assert!(store.critical_measurement_ids(9).is_empty());
    }

    #[test]
    fn overlong_text_is_rejected_before_mutation() {
        let store = MeasurementStore::default();
        let mut request = reading(1, 100);
        request.weather = "w".repeat(101);
        assert_matches!(
            store.record(ctx(0), request),
            Err(PondforgeError::InvalidInput {
                field: "weather",
                max: 100,
                actual: 101
            })
        );

        let mut request = reading(1, 100);
        request.notes = "n".repeat(501);
        assert_matches!(
            store.record(ctx(0), request),
            Err(PondforgeError::InvalidInput {
                field: "notes",
                max: 500,
                actual: 501
            })
        );

        assert_eq!(store.count(), 0);
        assert!(store.pond_ids().is_empty());
    }

    #[test]
    fn full_critical_index_rolls_back_whole_record() {
        let store = MeasurementStoreBuilder::new()
            .with_pond_index_capacity(10)
            .with_critical_index_capacity(1)
            .build()
            .unwrap();
        store.record(ctx(0), reading(1, 100)).unwrap();

        assert_matches!(
            store.record(ctx(1), reading(1, 100)),
            Err(PondforgeError::CapacityExceeded {
                pond_id: 1,
                capacity: 1,
                ..
            })
        );
        assert_eq!(store.count(), 1);
        assert!(store.get(1).is_none());
        assert_eq!(store.pond_measurement_ids(1), vec![0]);

        // A normal reading still has room in the pond index.
        assert_eq!(store.record(ctx(2), reading(1, 250)).unwrap(), 1);
    }

    #[test]
    fn evaluated_snapshot_agrees_with_stored_flag() {
        let store = MeasurementStore::default();
        let (cold_id, snapshot) = store.record_evaluated(ctx(0), reading(1, 100)).unwrap();
        assert_eq!(snapshot, ParameterThresholds::default());
        let stored = store.get(cold_id).unwrap();
        assert_eq!(
            stored.critical,
            !evaluator::breaches(&stored.parameters, &snapshot).is_empty()
        );

        let lowered = ParameterThresholds {
            min_temperature: 50,
            ..ParameterThresholds::default()
        };
        store.update_thresholds(lowered);
        let (id, snapshot) = store.record_evaluated(ctx(1), reading(1, 100)).unwrap();
        assert_eq!(snapshot, lowered);
        assert!(!store.get(id).unwrap().critical);
        assert!(evaluator::breaches(&store.get(id).unwrap().parameters, &snapshot).is_empty());
    }

    #[test]
    fn measurements_for_pond_follow_index_order() {
        let store = MeasurementStore::default();
        store.record(ctx(0), reading(2, 250)).unwrap();
        store.record(ctx(1), reading(1, 250)).unwrap();
        store.record(ctx(2), reading(2, 260)).unwrap();
        let temps: Vec<i32> = store
            .measurements_for_pond(2)
            .iter()
            .map(|m| m.parameters.temperature)
            .collect();
        assert_eq!(temps, vec![250, 260]);
        assert_eq!(store.pond_ids(), vec![1, 2]);
        assert_eq!(store.measurements().len(), 3);
    }
}
