use crate::{error::PondforgeError, evaluator::Breach};
use csv::Writer;
use pondforge_schemas::{
    measurement::Measurement, parameters::WaterParameters, MeasurementId, PondId,
};
use serde::{Deserialize, Serialize};
use std::fs;

/// One CSV row of the measurement journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub measurement_id: MeasurementId,
    pub pond_id: PondId,
    pub recorder: String,
    pub recorded_at: u64,
    pub temperature: i32,
    pub ph: i32,
    pub dissolved_oxygen: u32,
    pub ammonia: u32,
    pub nitrite: u32,
    pub nitrate: u32,
    pub turbidity: u32,
    pub critical: bool,
    pub breaches_json: String,
    pub weather: String,
    pub notes: String,
}

impl JournalEntry {
    pub fn parameters(&self) -> WaterParameters {
        WaterParameters {
            temperature: self.temperature,
            ph: self.ph,
            dissolved_oxygen: self.dissolved_oxygen,
            ammonia: self.ammonia,
            nitrite: self.nitrite,
            nitrate: self.nitrate,
            turbidity: self.turbidity,
        }
    }

    pub fn breaches(&self) -> Result<Vec<Breach>, PondforgeError> {
        Ok(serde_json::from_str(&self.breaches_json)?)
    }
}

/// Appends every committed measurement to a CSV file, flushing per row.
pub struct MeasurementJournal {
    path: String,
    writer: Writer<fs::File>,
}

impl MeasurementJournal {
    pub fn new(path: &str) -> Result<Self, PondforgeError> {
        let writer =
            Writer::from_path(path).map_err(|e| PondforgeError::CsvError(path.to_string(), e))?;
        Ok(Self {
            path: path.to_string(),
            writer,
        })
    }

    pub fn log_measurement(
        &mut self,
        measurement: &Measurement,
        breaches: &[Breach],
    ) -> Result<(), PondforgeError> {
        let p = &measurement.parameters;
        let entry = JournalEntry {
            measurement_id: measurement.id,
            pond_id: measurement.pond_id,
            recorder: measurement.recorder.to_string(),
            recorded_at: measurement.recorded_at,
            temperature: p.temperature,
            ph: p.ph,
            dissolved_oxygen: p.dissolved_oxygen,
            ammonia: p.ammonia,
            nitrite: p.nitrite,
            nitrate: p.nitrate,
            turbidity: p.turbidity,
            critical: measurement.critical,
            breaches_json: serde_json::to_string(breaches)?,
            weather: measurement.weather.to_string(),
            notes: measurement.notes.to_string(),
        };

        self.writer
            .serialize(entry)
            .map_err(|e| PondforgeError::CsvError(self.path.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| PondforgeError::FileIO(self.path.clone(), e))?;
        Ok(())
    }
}

pub fn read_journal(path: &str) -> Result<Vec<JournalEntry>, PondforgeError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| PondforgeError::CsvError(path.to_string(), e))?;
    reader
        .deserialize::<JournalEntry>()
        .map(|row| row.map_err(|e| PondforgeError::CsvError(path.to_string(), e)))
        .collect()
}
