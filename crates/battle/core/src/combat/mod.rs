//! Combat resolution.
//!
//! [`resolve`] is the damage pipeline: it rolls evasion and crits, walks the
//! ordered multiplier stages, applies mitigation and shield absorption and
//! removes HP from the defender. Everything that follows a hit (energy,
//! hooks, counterattacks) is the engine's business.

pub mod damage;
pub mod hit;
pub mod modifiers;
pub mod result;

pub use damage::{DamageContext, resolve};
pub use hit::{AttackKind, Hit, HitSpec};
pub use modifiers::{Modifier, MultiplierStack};
pub use result::DamageOutcome;
