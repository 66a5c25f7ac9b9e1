//! Non-control status effects: damage over time and synergy windows.
//!
//! # Round-based Duration
//!
//! Effects store the number of rounds left. Damage-over-time ticks at the
//! start of each round; every counter is decremented once at end of round and
//! the effect is removed when it reaches zero.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::state::CombatantId;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// Damage over time; enables venom bonuses against the holder.
    Poisoned,
    /// Damage over time; enables burn-synergy bonuses against the holder.
    Burning,
    /// Attacker-side window: bonus damage against burning targets.
    BurnSynergy,
}

impl StatusKind {
    pub fn is_damage_over_time(self) -> bool {
        matches!(self, StatusKind::Poisoned | StatusKind::Burning)
    }
}

/// A single status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub rounds: u32,
    /// Damage per tick for damage-over-time kinds, zero otherwise.
    pub magnitude: u64,
    /// Who applied it; damage-over-time is credited to this combatant.
    pub source: CombatantId,
}

/// Active status effects on a combatant, at most one per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind && e.rounds > 0)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Adds a status effect.
    ///
    /// If the kind is already present, keeps the longer duration and the
    /// stronger magnitude (crediting the stronger source).
    pub fn add(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.rounds = existing.rounds.max(effect.rounds);
            if effect.magnitude > existing.magnitude {
                existing.magnitude = effect.magnitude;
                existing.source = effect.source;
            }
            return;
        }

        if !self.effects.is_full() {
            self.effects.push(effect);
        }
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// One round passes. Returns the kinds that ran out.
    pub fn decay(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.rounds = effect.rounds.saturating_sub(1);
            if effect.rounds == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.rounds > 0);
        expired
    }

    /// Damage-over-time effects due to tick this round.
    pub fn damage_over_time(&self) -> impl Iterator<Item = &StatusEffect> + '_ {
        self.effects
            .iter()
            .filter(|e| e.kind.is_damage_over_time() && e.rounds > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poison(rounds: u32, magnitude: u64) -> StatusEffect {
        StatusEffect {
            kind: StatusKind::Poisoned,
            rounds,
            magnitude,
            source: CombatantId::Hero(0),
        }
    }

    #[test]
    fn reapplying_keeps_longer_and_stronger() {
        let mut effects = StatusEffects::empty();
        effects.add(poison(3, 10));
        effects.add(StatusEffect {
            source: CombatantId::Hero(2),
            ..poison(1, 50)
        });

        let current = effects.get(StatusKind::Poisoned).copied().unwrap();
        assert_eq!(current.rounds, 3);
        assert_eq!(current.magnitude, 50);
        assert_eq!(current.source, CombatantId::Hero(2));
    }

    #[test]
    fn decay_removes_at_zero() {
        let mut effects = StatusEffects::empty();
        effects.add(poison(2, 10));
        assert!(effects.decay().is_empty());
        assert!(effects.has(StatusKind::Poisoned));
        assert_eq!(effects.decay(), vec![StatusKind::Poisoned]);
        assert!(!effects.has(StatusKind::Poisoned));
        assert!(effects.is_empty());
    }

    #[test]
    fn synergy_window_is_not_damage_over_time() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffect {
            kind: StatusKind::BurnSynergy,
            rounds: 2,
            magnitude: 0,
            source: CombatantId::Hero(1),
        });
        assert_eq!(effects.damage_over_time().count(), 0);
    }
}
