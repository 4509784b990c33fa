use anyhow::{Context, Result};
use pondforge_core::{
    index::{CRITICAL_INDEX_CAPACITY, POND_INDEX_CAPACITY},
    MeasurementStore, MeasurementStoreBuilder,
};
use pondforge_schemas::{file_formats::ThresholdFile, thresholds::ParameterThresholds};
use serde::Deserialize;
use std::{fs, path::Path};

pub const DEFAULT_LOG_FILTER: &str = "pondforge=info";

/// Settings read from `pondforge.yaml`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub thresholds: Option<ParameterThresholds>,
    /// A `ThresholdFile` to load instead of inline `thresholds`.
    pub thresholds_file: Option<String>,
    pub pond_index_capacity: usize,
    pub critical_index_capacity: usize,
    pub output_dir: String,
    pub log_filter: Option<String>,
    pub charts: bool,
    /// Logical height the session clock starts from.
    pub start_height: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            thresholds: None,
            thresholds_file: None,
            pond_index_capacity: POND_INDEX_CAPACITY,
            critical_index_capacity: CRITICAL_INDEX_CAPACITY,
            output_dir: "./data/runs".to_string(),
            log_filter: None,
            charts: true,
            start_height: 0,
        }
    }
}

impl AppConfig {
    /// Loads the config file, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        Ok(config)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Thresholds in force at start-up: the thresholds file, then the inline
    /// block, then the defaults.
    pub fn initial_thresholds(&self) -> Result<ParameterThresholds> {
        if let Some(path) = &self.thresholds_file {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read thresholds file: {}", path))?;
            let file: ThresholdFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML from {}", path))?;
            return Ok(file.thresholds);
        }
        Ok(self.thresholds.unwrap_or_default())
    }

    pub fn build_store(&self) -> Result<MeasurementStore> {
        let store = MeasurementStoreBuilder::new()
            .with_thresholds(self.initial_thresholds()?)
            .with_pond_index_capacity(self.pond_index_capacity)
            .with_critical_index_capacity(self.critical_index_capacity)
            .build()
            .context("Invalid store configuration")?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/pondforge.yaml")).unwrap();
        assert_eq!(config.pond_index_capacity, 1000);
        assert_eq!(config.critical_index_capacity, 100);
        assert!(config.charts);
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.initial_thresholds().unwrap(), ParameterThresholds::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pondforge.yaml");
        fs::write(
            &path,
            "critical_index_capacity: 5\ncharts: false\nthresholds:\n  max_nitrate: 400\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.critical_index_capacity, 5);
        assert_eq!(config.pond_index_capacity, 1000);
        assert!(!config.charts);
        let thresholds = config.initial_thresholds().unwrap();
        assert_eq!(thresholds.max_nitrate, 400);
        assert_eq!(thresholds.min_ph, 65);
    }

    #[test]
    fn thresholds_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("thresholds.yaml");
        fs::write(&file, "schema_version: \"1\"\nthresholds:\n  min_temperature: 120\n").unwrap();

        let config = AppConfig {
            thresholds: Some(ParameterThresholds {
                min_temperature: 10,
                ..Default::default()
            }),
            thresholds_file: Some(file.to_str().unwrap().to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.initial_thresholds().unwrap().min_temperature, 120);
    }

    #[test]
    fn zero_capacity_fails_store_construction() {
        let config = AppConfig {
            pond_index_capacity: 0,
            ..AppConfig::default()
        };
        assert!(config.build_store().is_err());
    }
}
