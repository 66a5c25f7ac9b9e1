//! Outcome records: the linear, immutable log an encounter produces.

use std::fmt;

use crate::combat::{AttackKind, DamageOutcome};
use crate::control::ControlKind;
use crate::state::{Capabilities, CombatantId, StatusKind};
use crate::stats::{BuffKey, Lifetime, StatKind};
use crate::variants::CompanionKind;

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EncounterResult {
    /// The boss fell.
    Victory,
    /// Every hero fell.
    Defeat,
    /// The round cap was reached with both sides standing.
    RoundCap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterStatus {
    Ongoing,
    Finished(EncounterResult),
}

/// Machine-checkable record category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeCategory {
    Round,
    Action,
    Damage,
    Heal,
    Shield,
    Energy,
    Buff,
    Control,
    Calamity,
    Curse,
    Status,
    Transition,
    Companion,
    Result,
}

/// What a control affliction blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Blocked {
    Turn,
    ActiveSkill,
    EnergyGain,
    Passive,
    Transition,
}

/// Typed payload of an outcome record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleEvent {
    RoundStarted { round: u32 },
    RoundEnded { round: u32 },
    ActionTaken { actor: CombatantId, action: AttackKind },
    Suppressed { actor: CombatantId, control: ControlKind, blocked: Blocked },
    Damage(DamageOutcome),
    DamageOverTime { target: CombatantId, source: CombatantId, status: StatusKind, damage: u64 },
    Defeated { target: CombatantId },
    Healed { target: CombatantId, amount: u64 },
    Shielded { target: CombatantId, amount: u64 },
    EnergyGained { target: CombatantId, amount: u32 },
    EnergyDrained { target: CombatantId, amount: u32 },
    BuffApplied { target: CombatantId, key: BuffKey, stat: StatKind, magnitude: i64, lifetime: Lifetime, replaced: bool },
    BuffDiverted { target: CombatantId, source: &'static str, penalty: u64, damage: u64, curse_remaining: u32 },
    BuffRejected { target: CombatantId, source: &'static str },
    BuffExpired { target: CombatantId, key: BuffKey, stat: StatKind, magnitude: i64 },
    BuffPurified { target: CombatantId, key: BuffKey, stat: StatKind, magnitude: i64 },
    ControlApplied { target: CombatantId, kind: ControlKind, rounds: u32 },
    ControlResisted { target: CombatantId, kind: ControlKind },
    ControlImmune { target: CombatantId, kind: ControlKind },
    ControlExpired { target: CombatantId, kind: ControlKind },
    ControlPurified { target: CombatantId, kind: ControlKind },
    BossReaction { kind: ControlKind },
    CalamityRaised { target: CombatantId, before: u32, after: u32 },
    CalamityTriggered { target: CombatantId },
    CurseAdded { target: CombatantId, stacks: u32, total: u32 },
    CurseCleared { target: CombatantId, removed: u32 },
    StatusApplied { target: CombatantId, status: StatusKind, rounds: u32 },
    StatusExpired { target: CombatantId, status: StatusKind },
    ShrinkApplied { target: CombatantId, rounds: u32 },
    ShrinkExpired { target: CombatantId, stacks: usize },
    CapabilitiesGranted { target: CombatantId, flags: Capabilities },
    DeathWardsGranted { target: CombatantId, uses: u32 },
    TransitionReleased { actor: CombatantId },
    TransitionInsufficient { actor: CombatantId, current: u32, threshold: u32 },
    CompanionReleased { companion: CompanionKind },
    Finished { result: EncounterResult, rounds: u32 },
}

impl BattleEvent {
    pub fn category(&self) -> OutcomeCategory {
        use BattleEvent::*;
        match self {
            RoundStarted { .. } | RoundEnded { .. } => OutcomeCategory::Round,
            ActionTaken { .. } | Suppressed { .. } => OutcomeCategory::Action,
            Damage(_) | DamageOverTime { .. } | Defeated { .. } => OutcomeCategory::Damage,
            Healed { .. } => OutcomeCategory::Heal,
            Shielded { .. } => OutcomeCategory::Shield,
            EnergyGained { .. } | EnergyDrained { .. } => OutcomeCategory::Energy,
            BuffApplied { .. }
            | BuffDiverted { .. }
            | BuffRejected { .. }
            | BuffExpired { .. }
            | BuffPurified { .. }
            | CapabilitiesGranted { .. }
            | DeathWardsGranted { .. } => OutcomeCategory::Buff,
            ControlApplied { .. }
            | ControlResisted { .. }
            | ControlImmune { .. }
            | ControlExpired { .. }
            | ControlPurified { .. }
            | BossReaction { .. } => OutcomeCategory::Control,
            CalamityRaised { .. } | CalamityTriggered { .. } => OutcomeCategory::Calamity,
            CurseAdded { .. } | CurseCleared { .. } => OutcomeCategory::Curse,
            StatusApplied { .. } | StatusExpired { .. } | ShrinkApplied { .. } | ShrinkExpired { .. } => {
                OutcomeCategory::Status
            }
            TransitionReleased { .. } | TransitionInsufficient { .. } => OutcomeCategory::Transition,
            CompanionReleased { .. } => OutcomeCategory::Companion,
            Finished { .. } => OutcomeCategory::Result,
        }
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BattleEvent::*;
        match self {
            RoundStarted { round } => write!(f, "round {round} begins"),
            RoundEnded { round } => write!(f, "round {round} ends"),
            ActionTaken { actor, action } => write!(f, "{actor} uses {action}"),
            Suppressed { actor, control, blocked } => {
                write!(f, "{actor} is under {control}: {blocked} suppressed")
            }
            Damage(outcome) if outcome.dodged => {
                write!(f, "{} dodges {}'s {}", outcome.defender, outcome.attacker, outcome.kind)
            }
            Damage(outcome) => {
                write!(
                    f,
                    "{} hits {} with {} for {} damage",
                    outcome.attacker, outcome.defender, outcome.kind, outcome.damage
                )?;
                if outcome.crits > 0 {
                    write!(f, " ({}/{} crit)", outcome.crits, outcome.hits)?;
                }
                if outcome.blocked {
                    f.write_str(" (blocked)")?;
                }
                if outcome.absorbed > 0 {
                    write!(f, ", {} absorbed by shield", outcome.absorbed)?;
                }
                if outcome.ward_used {
                    f.write_str(", death ward holds")?;
                }
                Ok(())
            }
            DamageOverTime { target, source, status, damage } => {
                write!(f, "{target} takes {damage} {status} damage from {source}")
            }
            Defeated { target } => write!(f, "{target} is defeated"),
            Healed { target, amount } => write!(f, "{target} heals {amount}"),
            Shielded { target, amount } => write!(f, "{target} gains a {amount} shield"),
            EnergyGained { target, amount } => write!(f, "{target} gains {amount} energy"),
            EnergyDrained { target, amount } => write!(f, "{target} loses {amount} energy"),
            BuffApplied { target, key, stat, magnitude, lifetime, replaced } => {
                write!(f, "{target} gains {magnitude:+} {stat} from {} ({lifetime})", key.source)?;
                if *replaced {
                    f.write_str(", replacing the previous one")?;
                }
                Ok(())
            }
            BuffDiverted { target, source, penalty, damage, curse_remaining } => write!(
                f,
                "curse on {target} consumes {source} for a {penalty} penalty, {damage} hp lost ({curse_remaining} stacks left)"
            ),
            BuffRejected { target, source } => write!(f, "{source} on {target} refused"),
            BuffExpired { target, key, stat, magnitude } => {
                write!(f, "{} on {target} expires ({magnitude:+} {stat} reverted)", key.source)
            }
            BuffPurified { target, key, stat, magnitude } => {
                write!(f, "{} on {target} purified ({magnitude:+} {stat} reverted)", key.source)
            }
            ControlApplied { target, kind, rounds } => {
                write!(f, "{target} is afflicted with {kind} for {rounds} rounds")
            }
            ControlResisted { target, kind } => write!(f, "{target} resists {kind}"),
            ControlImmune { target, kind } => write!(f, "{target} is immune to {kind}"),
            ControlExpired { target, kind } => write!(f, "{kind} on {target} wears off"),
            ControlPurified { target, kind } => write!(f, "{kind} on {target} purified"),
            BossReaction { kind } => write!(f, "boss feeds on {kind}"),
            CalamityRaised { target, before, after } => {
                write!(f, "{target} calamity {before} -> {after}")
            }
            CalamityTriggered { target } => write!(f, "calamity erupts on {target}"),
            CurseAdded { target, stacks, total } => {
                write!(f, "{target} gains {stacks} curse (now {total})")
            }
            CurseCleared { target, removed } => write!(f, "{removed} curse cleared from {target}"),
            StatusApplied { target, status, rounds } => {
                write!(f, "{target} gains {status} for {rounds} rounds")
            }
            StatusExpired { target, status } => write!(f, "{status} on {target} ends"),
            ShrinkApplied { target, rounds } => write!(f, "{target} shrinks for {rounds} rounds"),
            ShrinkExpired { target, stacks } => write!(f, "{stacks} shrink stacks on {target} end"),
            CapabilitiesGranted { target, flags } => write!(f, "{target} gains {flags}"),
            DeathWardsGranted { target, uses } => write!(f, "{target} gains {uses} death ward"),
            TransitionReleased { actor } => write!(f, "{actor} releases a transition skill"),
            TransitionInsufficient { actor, current, threshold } => {
                write!(f, "{actor} transition meter insufficient ({current}/{threshold})")
            }
            CompanionReleased { companion } => write!(f, "{companion} answers the call"),
            Finished { result, rounds } => write!(f, "encounter ends in {result} after {rounds} rounds"),
        }
    }
}

/// One immutable record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Outcome {
    pub round: u32,
    pub category: OutcomeCategory,
    pub message: String,
    pub event: BattleEvent,
}

impl Outcome {
    pub fn new(round: u32, event: BattleEvent) -> Self {
        Self {
            round,
            category: event.category(),
            message: event.to_string(),
            event,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[r{:02}] {:<10} {}", self.round, self.category.as_ref(), self.message)
    }
}
