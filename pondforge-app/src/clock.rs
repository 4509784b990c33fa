use pondforge_core::RecordContext;
use pondforge_schemas::measurement::Principal;

/// Logical time for a session: a height that advances once per committed
/// state change.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalClock {
    height: u64,
}

impl LogicalClock {
    pub fn starting_at(height: u64) -> Self {
        Self { height }
    }

    pub fn now(&self) -> u64 {
        self.height
    }

    pub fn advance(&mut self) {
        self.height += 1;
    }

    /// Context for a call made by `recorder` at the current height.
    pub fn context(&self, recorder: Principal) -> RecordContext {
        RecordContext::new(recorder, self.height)
    }
}
