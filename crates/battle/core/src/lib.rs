//! Deterministic turn-based combat engine for a hero roster against a single boss.
//!
//! `battle-core` defines the canonical rules (stat ledger, damage pipeline,
//! control afflictions, variant hooks, round scheduling) and exposes a pure API
//! that produces a linear sequence of [`Outcome`] records. All state mutation
//! flows through [`Encounter`], and randomness only enters through the
//! [`env::RngOracle`] injected at construction.
pub mod combat;
pub mod config;
pub mod control;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;
pub mod variants;

pub use combat::{AttackKind, DamageOutcome, Hit, HitSpec};
pub use config::{ArtifactSpec, BaseStats, BattleConfig, BossSpec, EncounterSpec, HeroSpec};
pub use control::{AfflictionResult, ControlKind, ControlState};
pub use engine::{
    BattleEvent, Effect, Encounter, EncounterResult, EncounterStatus, Outcome, OutcomeCategory,
};
pub use env::{Dice, PcgRng, RngOracle};
pub use error::SetupError;
pub use state::{BattleState, Capabilities, Combatant, CombatantId, StatusKind};
pub use stats::{ApplyMode, ApplyOutcome, Buff, BuffKey, BuffOrigin, Lifetime, StatBlock, StatKind};
pub use variants::{
    ArtifactKind, ClassKind, CompanionKind, LifestarKind, PurifyKind, Registry, TraitEnableKind,
};
