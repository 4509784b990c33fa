use crate::{
    error::PondforgeError,
    index::{CRITICAL_INDEX_CAPACITY, POND_INDEX_CAPACITY},
    store::{engine::MeasurementStore, state::LedgerState},
};
use pondforge_schemas::thresholds::ParameterThresholds;

/// A fluent builder for constructing a `MeasurementStore`.
///
/// Unset values fall back to the default thresholds and the standard index
/// ceilings (1000 per pond, 100 critical per pond).
#[derive(Debug, Default)]
pub struct MeasurementStoreBuilder {
    thresholds: Option<ParameterThresholds>,
    pond_index_capacity: Option<usize>,
    critical_index_capacity: Option<usize>,
}

impl MeasurementStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the thresholds in force before any update.
    pub fn with_thresholds(mut self, thresholds: ParameterThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Sets the ceiling on measurements indexed per pond.
    pub fn with_pond_index_capacity(mut self, capacity: usize) -> Self {
        self.pond_index_capacity = Some(capacity);
        self
    }

    /// Sets the ceiling on critical measurements indexed per pond.
    pub fn with_critical_index_capacity(mut self, capacity: usize) -> Self {
        self.critical_index_capacity = Some(capacity);
        self
    }

    /// Consumes the builder and returns an empty store.
    ///
    /// # Errors
    ///
    /// Returns `PondforgeError::ConfigError` if either capacity is zero.
    pub fn build(self) -> Result<MeasurementStore, PondforgeError> {
        let pond_capacity = self.pond_index_capacity.unwrap_or(POND_INDEX_CAPACITY);
        let critical_capacity = self.critical_index_capacity.unwrap_or(CRITICAL_INDEX_CAPACITY);

        if pond_capacity == 0 {
            return Err(PondforgeError::ConfigError(
                "pond index capacity must be at least 1".to_string(),
            ));
        }
        if critical_capacity == 0 {
            return Err(PondforgeError::ConfigError(
                "critical index capacity must be at least 1".to_string(),
            ));
        }

        Ok(MeasurementStore::from_state(LedgerState::new(
            self.thresholds.unwrap_or_default(),
            pond_capacity,
            critical_capacity,
        )))
    }
}
