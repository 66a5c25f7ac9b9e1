//! Team companions. Each charges a meter from hero active skills and acts at
//! end of round once the meter is full.

use crate::combat::{AttackKind, HitSpec};
use crate::engine::Effect;
use crate::state::{BattleState, CombatantId};
use crate::stats::{Buff, Lifetime, StatKind};

use super::{Companion, CompanionKind, ResourceMeter, percent_of, team_buff};

pub fn build_companion(kind: CompanionKind) -> Box<dyn Companion> {
    match kind {
        CompanionKind::Phoenix => Box::new(Phoenix::default()),
        CompanionKind::Gryphon => Box::new(Gryphon::default()),
        CompanionKind::Tortoise => Box::new(Tortoise::default()),
    }
}

/// Heals every hero.
#[derive(Debug, Default)]
pub struct Phoenix {
    meter: ResourceMeter,
}

impl Phoenix {
    const HEAL_PERCENT: u64 = 15;
}

impl Companion for Phoenix {
    fn kind(&self) -> CompanionKind {
        CompanionKind::Phoenix
    }

    fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    fn meter_mut(&mut self) -> &mut ResourceMeter {
        &mut self.meter
    }

    fn release(&mut self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .map(|hero| Effect::Heal {
                target: hero.id(),
                amount: percent_of(hero.max_hp(), Self::HEAL_PERCENT),
            })
            .collect()
    }
}

/// Team crit at start; dives the boss with the strongest hero's attack.
#[derive(Debug, Default)]
pub struct Gryphon {
    meter: ResourceMeter,
}

impl Gryphon {
    const CRIT_RATE: i64 = 10;
    const DIVE_MULTIPLIER: f64 = 20.0;
}

impl Companion for Gryphon {
    fn kind(&self) -> CompanionKind {
        CompanionKind::Gryphon
    }

    fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    fn meter_mut(&mut self) -> &mut ResourceMeter {
        &mut self.meter
    }

    fn apply_start_of_battle(&mut self, state: &BattleState) -> Vec<Effect> {
        team_buff(
            state,
            &Buff::attribute("gryphon_keen_eye", StatKind::CritRate, Self::CRIT_RATE, Lifetime::Permanent),
        )
    }

    fn release(&mut self, state: &BattleState) -> Vec<Effect> {
        let Some(strongest) = state.strongest_hero() else {
            return Vec::new();
        };
        let spec = HitSpec::single(AttackKind::Companion, strongest.attack() * Self::DIVE_MULTIPLIER)
            .without_crits();
        vec![Effect::strike(strongest.id(), CombatantId::Boss, spec)]
    }
}

/// Team damage reduction at start; shields every hero.
#[derive(Debug, Default)]
pub struct Tortoise {
    meter: ResourceMeter,
}

impl Tortoise {
    const ADR: i64 = 10;
    const SHIELD_PERCENT: u64 = 10;
}

impl Companion for Tortoise {
    fn kind(&self) -> CompanionKind {
        CompanionKind::Tortoise
    }

    fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    fn meter_mut(&mut self) -> &mut ResourceMeter {
        &mut self.meter
    }

    fn apply_start_of_battle(&mut self, state: &BattleState) -> Vec<Effect> {
        team_buff(
            state,
            &Buff::skill("tortoise_shell", StatKind::AllDamageReduction, Self::ADR, Lifetime::Permanent),
        )
    }

    fn release(&mut self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .map(|hero| Effect::Shield {
                target: hero.id(),
                amount: percent_of(hero.max_hp(), Self::SHIELD_PERCENT),
            })
            .collect()
    }
}
