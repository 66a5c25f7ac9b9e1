//! Shrink: a paired, stacking multiplier on the holder's outgoing and incoming damage.
//!
//! The two halves are independent stacks with their own durations; each
//! stack multiplies in, so two dealt stacks give `0.85 × 0.85`.

/// One multiplicative stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShrinkStack {
    pub factor: f64,
    pub rounds: u32,
}

/// Dealt/received shrink stacks held by one combatant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShrinkStacks {
    dealt: Vec<ShrinkStack>,
    received: Vec<ShrinkStack>,
}

impl ShrinkStacks {
    pub const DEALT_FACTOR: f64 = 0.85;
    pub const RECEIVED_FACTOR: f64 = 1.15;

    /// Adds one stack to each half.
    pub fn push(&mut self, rounds: u32) {
        let rounds = rounds.max(1);
        self.dealt.push(ShrinkStack {
            factor: Self::DEALT_FACTOR,
            rounds,
        });
        self.received.push(ShrinkStack {
            factor: Self::RECEIVED_FACTOR,
            rounds,
        });
    }

    /// Multiplier on damage the holder deals.
    pub fn dealt_factor(&self) -> f64 {
        self.dealt.iter().map(|s| s.factor).product()
    }

    /// Multiplier on damage the holder receives.
    pub fn received_factor(&self) -> f64 {
        self.received.iter().map(|s| s.factor).product()
    }

    pub fn stacks(&self) -> usize {
        self.dealt.len().max(self.received.len())
    }

    pub fn is_empty(&self) -> bool {
        self.dealt.is_empty() && self.received.is_empty()
    }

    /// One round passes. Returns how many stacks fell off (both halves).
    pub fn decay(&mut self) -> usize {
        let before = self.dealt.len() + self.received.len();
        for stack in self.dealt.iter_mut().chain(self.received.iter_mut()) {
            stack.rounds = stack.rounds.saturating_sub(1);
        }
        self.dealt.retain(|s| s.rounds > 0);
        self.received.retain(|s| s.rounds > 0);
        before - (self.dealt.len() + self.received.len())
    }
}
