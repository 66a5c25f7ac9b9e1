//! Environment oracles injected into the engine.
//!
//! The engine has no ambient sources of nondeterminism: every random draw goes
//! through an [`RngOracle`] chosen at encounter construction.

mod rng;

pub use rng::{Dice, PcgRng, RngOracle, RollContext, compute_seed};
