use pondforge_schemas::thresholds::ParameterThresholds;

/// Holder for the thresholds every evaluation reads.
///
/// Updates are taken verbatim; a `min` above its `max` is accepted and simply
/// makes every reading of that parameter critical.
#[derive(Debug, Clone, Default)]
pub struct ThresholdConfig {
    current: ParameterThresholds,
}

impl ThresholdConfig {
    pub fn new(initial: ParameterThresholds) -> Self {
        Self { current: initial }
    }

    pub fn get(&self) -> ParameterThresholds {
        self.current
    }

    pub fn update(&mut self, thresholds: ParameterThresholds) {
        self.current = thresholds;
    }
}
