//! The boss's fixed behavior.

use super::Effect;
use crate::combat::{AttackKind, HitSpec};
use crate::state::{BattleState, CombatantId};
use crate::stats::{Buff, Lifetime, StatKind};

const BASIC_MULTIPLIER: f64 = 10.0;
const BASIC_CALAMITY: u32 = 2;

const ACTIVE_MULTIPLIER: f64 = 6.0;
const ACTIVE_ENERGY_DRAIN: u32 = 20;
const ACTIVE_CURSE: u32 = 1;
const ACTIVE_CALAMITY: u32 = 2;
const SUNDER_DR: i64 = -10;
const SUNDER_ROUNDS: u32 = 2;

const COUNTER_MULTIPLIER: f64 = 4.0;

const ENRAGE_FROM_ROUND: u32 = 6;
const ENRAGE_DAMAGE: i64 = 10;

fn boss_attack(state: &BattleState) -> f64 {
    state.boss().attack()
}

/// Single evadable strike on `target`, then calamity on it.
pub(crate) fn basic(state: &BattleState, target: CombatantId) -> Vec<Effect> {
    let spec = HitSpec::single(AttackKind::Basic, boss_attack(state) * BASIC_MULTIPLIER).evadable();
    vec![
        Effect::strike(CombatantId::Boss, target, spec),
        Effect::AddCalamity {
            target,
            stacks: BASIC_CALAMITY,
        },
    ]
}

/// Per living hero: strike, energy drain, sunder, curse, calamity.
pub(crate) fn active(state: &BattleState) -> Vec<Effect> {
    let magnitude = boss_attack(state) * ACTIVE_MULTIPLIER;
    let mut effects = Vec::new();
    for target in state.living_hero_ids() {
        effects.push(Effect::strike(
            CombatantId::Boss,
            target,
            HitSpec::single(AttackKind::Active, magnitude),
        ));
        effects.push(Effect::DrainEnergy {
            target,
            amount: ACTIVE_ENERGY_DRAIN,
        });
        effects.push(Effect::buff(
            target,
            Buff::attribute("boss_sunder", StatKind::DamageReduction, SUNDER_DR, Lifetime::rounds(SUNDER_ROUNDS)),
        ));
        effects.push(Effect::AddCurse {
            target,
            stacks: ACTIVE_CURSE,
        });
        effects.push(Effect::AddCalamity {
            target,
            stacks: ACTIVE_CALAMITY,
        });
    }
    effects
}

pub(crate) fn counter_spec(state: &BattleState) -> HitSpec {
    HitSpec::single(AttackKind::Counter, boss_attack(state) * COUNTER_MULTIPLIER).evadable()
}

/// Permanent damage ramp once the fight drags on.
pub(crate) fn end_of_round(state: &BattleState) -> Vec<Effect> {
    if state.round() < ENRAGE_FROM_ROUND {
        return Vec::new();
    }
    vec![Effect::buff(
        CombatantId::Boss,
        Buff::skill("boss_enrage", StatKind::AllDamageDealt, ENRAGE_DAMAGE, Lifetime::Permanent),
    )]
}
