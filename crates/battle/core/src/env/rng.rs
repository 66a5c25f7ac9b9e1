//! RNG oracle for deterministic random number generation.
//!
//! All RNG implementations must be deterministic: given the same seed,
//! they must produce the same sequence of random numbers. Crit rolls,
//! control resistance, target selection and purify picks all draw through
//! [`Dice`], so an encounter replays exactly from its configured seed.

use crate::state::CombatantId;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Common for percentage-based mechanics like crit chance.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. Same seed always
/// produces the same output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Distinguishes independent rolls made for the same actor and draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RollContext {
    Crit = 0,
    Resist = 1,
    Target = 2,
    Dodge = 3,
    Block = 4,
    Purify = 5,
}

/// Compute deterministic seed from encounter components.
///
/// Combines the encounter seed, the draw nonce, the rolling actor and the
/// roll context so that every draw gets its own seed.
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = game_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Stateful roller on top of an [`RngOracle`].
///
/// Holds the encounter seed and a monotonically increasing nonce; each draw
/// consumes one nonce value.
pub struct Dice {
    oracle: Box<dyn RngOracle>,
    seed: u64,
    nonce: u64,
}

impl Dice {
    pub fn new(oracle: Box<dyn RngOracle>, seed: u64) -> Self {
        Self {
            oracle,
            seed,
            nonce: 0,
        }
    }

    /// PCG-backed dice for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(PcgRng), seed)
    }

    /// Number of draws made so far.
    pub fn draws(&self) -> u64 {
        self.nonce
    }

    fn next_seed(&mut self, actor: CombatantId, context: RollContext) -> u64 {
        let seed = compute_seed(self.seed, self.nonce, actor.as_u32(), context as u32);
        self.nonce += 1;
        seed
    }

    /// Roll 1..=100.
    pub fn roll_d100(&mut self, actor: CombatantId, context: RollContext) -> u32 {
        let seed = self.next_seed(actor, context);
        self.oracle.roll_d100(seed)
    }

    /// Succeeds with `percent`% probability.
    ///
    /// Values at or below zero never succeed and values at or above 100
    /// always succeed; neither extreme consumes a draw.
    pub fn chance(&mut self, actor: CombatantId, context: RollContext, percent: i64) -> bool {
        if percent <= 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        i64::from(self.roll_d100(actor, context)) <= percent
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick(&mut self, actor: CombatantId, context: RollContext, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let seed = self.next_seed(actor, context);
        self.oracle.range(seed, 0, (len - 1) as u32) as usize
    }
}

impl std::fmt::Debug for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dice")
            .field("seed", &self.seed)
            .field("nonce", &self.nonce)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rolls() {
        let mut a = Dice::seeded(42);
        let mut b = Dice::seeded(42);
        for _ in 0..32 {
            assert_eq!(
                a.roll_d100(CombatantId::Hero(1), RollContext::Crit),
                b.roll_d100(CombatantId::Hero(1), RollContext::Crit)
            );
        }
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut dice = Dice::seeded(7);
        for _ in 0..1000 {
            let roll = dice.roll_d100(CombatantId::Boss, RollContext::Resist);
            assert!((1..=100).contains(&roll));
            let idx = dice.pick(CombatantId::Boss, RollContext::Target, 3);
            assert!(idx < 3);
        }
    }

    #[test]
    fn certain_outcomes_skip_the_draw() {
        let mut dice = Dice::seeded(1);
        assert!(dice.chance(CombatantId::Boss, RollContext::Crit, 100));
        assert!(!dice.chance(CombatantId::Boss, RollContext::Crit, 0));
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn compute_seed_separates_contexts() {
        let crit = compute_seed(9, 1, 2, RollContext::Crit as u32);
        let resist = compute_seed(9, 1, 2, RollContext::Resist as u32);
        assert_ne!(crit, resist);
    }
}
