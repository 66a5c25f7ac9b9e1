//! Encounter state: the roster, the boss and the round counter.
//!
//! Variants read this through `&BattleState` and answer with effects; only
//! the engine holds it mutably.

mod capabilities;
mod combatant;
mod shrink;
mod status;

pub use capabilities::Capabilities;
pub use combatant::{Combatant, CombatantId};
pub use shrink::{ShrinkStack, ShrinkStacks};
pub use status::{StatusEffect, StatusEffects, StatusKind};

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::stats::StatKind;

/// Hero roster storage.
pub type Roster = ArrayVec<Combatant, { BattleConfig::MAX_HEROES }>;

/// Everything the rules read: combatants, round counter, configuration.
#[derive(Clone, Debug)]
pub struct BattleState {
    heroes: Roster,
    boss: Combatant,
    round: u32,
    config: BattleConfig,
}

impl BattleState {
    pub fn new(heroes: Roster, boss: Combatant, config: BattleConfig) -> Self {
        Self {
            heroes,
            boss,
            round: 0,
            config,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub(crate) fn advance_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn boss(&self) -> &Combatant {
        &self.boss
    }

    pub(crate) fn boss_mut(&mut self) -> &mut Combatant {
        &mut self.boss
    }

    pub fn heroes(&self) -> &[Combatant] {
        &self.heroes
    }

    pub fn hero(&self, index: usize) -> Option<&Combatant> {
        self.heroes.get(index)
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        match id {
            CombatantId::Hero(index) => self.heroes.get(index as usize),
            CombatantId::Boss => Some(&self.boss),
        }
    }

    pub(crate) fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        match id {
            CombatantId::Hero(index) => self.heroes.get_mut(index as usize),
            CombatantId::Boss => Some(&mut self.boss),
        }
    }

    /// Splits the borrow for a hero/boss strike in either direction.
    pub(crate) fn pair_mut(
        &mut self,
        attacker: CombatantId,
        defender: CombatantId,
    ) -> Option<(&Combatant, &mut Combatant)> {
        match (attacker, defender) {
            (CombatantId::Hero(index), CombatantId::Boss) => {
                let hero = self.heroes.get(index as usize)?;
                Some((hero, &mut self.boss))
            }
            (CombatantId::Boss, CombatantId::Hero(index)) => {
                let hero = self.heroes.get_mut(index as usize)?;
                Some((&self.boss, hero))
            }
            _ => None,
        }
    }

    /// Every combatant id, heroes in roster order then the boss.
    pub fn all_ids(&self) -> Vec<CombatantId> {
        self.heroes
            .iter()
            .map(Combatant::id)
            .chain(std::iter::once(CombatantId::Boss))
            .collect()
    }

    pub fn living_heroes(&self) -> impl Iterator<Item = &Combatant> {
        self.heroes.iter().filter(|h| h.is_alive())
    }

    pub fn living_hero_ids(&self) -> Vec<CombatantId> {
        self.living_heroes().map(Combatant::id).collect()
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(Combatant::is_alive)
    }

    pub fn all_heroes_down(&self) -> bool {
        self.living_heroes().next().is_none()
    }

    /// Living hero with the highest attack (first in roster order on ties).
    pub fn strongest_hero(&self) -> Option<&Combatant> {
        self.living_heroes().fold(None, |best: Option<&Combatant>, hero| match best {
            Some(current) if current.stat(StatKind::Attack) >= hero.stat(StatKind::Attack) => {
                Some(current)
            }
            _ => Some(hero),
        })
    }

    /// Damage a curse stack deals when it intercepts an attribute buff.
    pub fn curse_penalty(&self) -> u64 {
        (self.boss.stat(StatKind::Attack).max(0) as u64)
            .saturating_mul(BattleConfig::CURSE_DAMAGE_MULTIPLIER)
    }

    /// Hero indices in action order: descending speed, ties by roster order.
    pub fn action_order(&self) -> Vec<CombatantId> {
        let mut order: Vec<&Combatant> = self.living_heroes().collect();
        // sort_by is stable, so equal speeds keep roster order
        order.sort_by(|a, b| b.stat(StatKind::Speed).cmp(&a.stat(StatKind::Speed)));
        order.into_iter().map(Combatant::id).collect()
    }
}
