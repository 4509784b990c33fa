pub mod command;
pub mod file_formats;
pub mod measurement;
pub mod parameters;
pub mod text;
pub mod thresholds;

/// Identifier of a monitored pond.
pub type PondId = u64;

/// Sequential identifier assigned to a recorded measurement.
pub type MeasurementId = u64;
