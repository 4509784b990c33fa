use crate::index::IndexKind;
use pondforge_schemas::{text::TextTooLong, MeasurementId, PondId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PondforgeError {
    #[error("Field '{field}' is {actual} characters long, the limit is {max}")]
    InvalidInput {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("The {index} index for pond {pond_id} is full ({capacity} entries)")]
    CapacityExceeded {
        index: IndexKind,
        pond_id: PondId,
        capacity: usize,
    },

    #[error("Measurement {0} not found")]
    MeasurementNotFound(MeasurementId),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

impl PondforgeError {
    pub(crate) fn invalid_text(field: &'static str, err: TextTooLong) -> Self {
        PondforgeError::InvalidInput {
            field,
            max: err.max,
            actual: err.actual,
        }
    }

    /// Rejections that leave the ledger untouched and may be reported per call.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PondforgeError::InvalidInput { .. } | PondforgeError::CapacityExceeded { .. }
        )
    }
}
