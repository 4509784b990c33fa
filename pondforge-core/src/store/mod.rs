pub mod builder;
pub mod engine;
pub mod state;

pub use builder::MeasurementStoreBuilder;
pub use engine::MeasurementStore;
pub use state::{MeasurementRequest, RecordContext};
