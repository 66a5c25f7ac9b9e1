/// Accumulator gating a bonus action once a threshold is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceMeter {
    value: u32,
    threshold: u32,
}

impl ResourceMeter {
    pub const DEFAULT_THRESHOLD: u32 = 100;
    pub const COMPANION_CHARGE: u32 = 25;

    pub fn new(threshold: u32) -> Self {
        Self {
            value: 0,
            threshold: threshold.max(1),
        }
    }

    /// Adds `amount`, saturating at the threshold.
    pub fn charge(&mut self, amount: u32) {
        self.value = self.value.saturating_add(amount).min(self.threshold);
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.threshold
    }

    /// Empties a full meter. Returns `false` and leaves it untouched otherwise.
    pub fn consume(&mut self) -> bool {
        if !self.is_full() {
            return false;
        }
        self.value = 0;
        true
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for ResourceMeter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
