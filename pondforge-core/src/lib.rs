pub mod analysis;
pub mod error;
pub mod evaluator;
pub mod index;
pub mod logger;
pub mod store;
pub mod thresholds;

pub use error::PondforgeError;
pub use store::{MeasurementRequest, MeasurementStore, MeasurementStoreBuilder, RecordContext};
