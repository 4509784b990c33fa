use crate::{
    index::{BoundedIndex, IndexKind},
    thresholds::ThresholdConfig,
};
use pondforge_schemas::{
    measurement::{Measurement, Principal},
    parameters::WaterParameters,
    thresholds::ParameterThresholds,
    MeasurementId, PondId,
};

/// Caller identity and logical time, supplied by the layer that invokes the
/// store rather than by the caller's own arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContext {
    pub recorder: Principal,
    pub recorded_at: u64,
}

impl RecordContext {
    pub fn new(recorder: Principal, recorded_at: u64) -> Self {
        Self {
            recorder,
            recorded_at,
        }
    }
}

/// Caller-supplied half of a measurement; text is validated on `record`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRequest {
    pub pond_id: PondId,
    pub parameters: WaterParameters,
    pub weather: String,
    pub notes: String,
}

/// Everything a `record` call must change together.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// Next id to hand out; equal to `records.len()`.
    pub(crate) counter: MeasurementId,
    /// Indexed by id.
    pub(crate) records: Vec<Measurement>,
    pub(crate) thresholds: ThresholdConfig,
    pub(crate) pond_index: BoundedIndex,
    pub(crate) critical_index: BoundedIndex,
}

impl LedgerState {
    pub(crate) fn new(
        thresholds: ParameterThresholds,
        pond_index_capacity: usize,
        critical_index_capacity: usize,
    ) -> Self {
        Self {
            counter: 0,
            records: Vec::new(),
            thresholds: ThresholdConfig::new(thresholds),
            pond_index: BoundedIndex::new(IndexKind::Pond, pond_index_capacity),
            critical_index: BoundedIndex::new(IndexKind::Critical, critical_index_capacity),
        }
    }

    pub(crate) fn record(&self, id: MeasurementId) -> Option<&Measurement> {
        usize::try_from(id).ok().and_then(|i| self.records.get(i))
    }
}
