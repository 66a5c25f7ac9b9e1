//! Combatant state: stats, resources, control state and the buff ledger.

use std::fmt;

use tracing::debug;

use super::capabilities::Capabilities;
use super::shrink::ShrinkStacks;
use super::status::StatusEffects;
use crate::config::BaseStats;
use crate::control::{ControlKind, ControlState};
use crate::stats::{
    ApplyOutcome, Buff, BuffKey, BuffLedger, BuffOrigin, BuffRecord, ExpiredBuff, StatBlock,
    StatKind,
};
use strum::IntoEnumIterator;

/// Identifies a combatant within an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantId {
    /// Roster index.
    Hero(u8),
    Boss,
}

impl CombatantId {
    /// Stable numeric id used for seeding rolls.
    pub const fn as_u32(self) -> u32 {
        match self {
            CombatantId::Hero(index) => index as u32,
            CombatantId::Boss => u32::MAX,
        }
    }

    pub const fn is_boss(self) -> bool {
        matches!(self, CombatantId::Boss)
    }

    pub const fn hero_index(self) -> Option<usize> {
        match self {
            CombatantId::Hero(index) => Some(index as usize),
            CombatantId::Boss => None,
        }
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantId::Hero(index) => write!(f, "hero#{index}"),
            CombatantId::Boss => f.write_str("boss"),
        }
    }
}

/// A hero or the boss.
///
/// Stats change only through [`Combatant::apply_buff`], [`Combatant::remove_buff`]
/// and [`Combatant::expire_buffs`], which keeps every modifier reversible.
#[derive(Clone, Debug)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    stats: StatBlock,
    ledger: BuffLedger,
    hp: u64,
    max_hp: u64,
    energy: u32,
    shield: u64,
    calamity: u32,
    curse: u32,
    immune: ControlKind,
    damage_dealt: u64,
    death_wards: u32,
    pub controls: ControlState,
    pub status: StatusEffects,
    pub shrink: ShrinkStacks,
    pub capabilities: Capabilities,
}

impl Combatant {
    pub fn new(id: CombatantId, name: impl Into<String>, base: &BaseStats, immune: ControlKind) -> Self {
        let mut stats = StatBlock::zeroed();
        for stat in StatKind::iter() {
            stats.set(stat, base.get(stat));
        }

        Self {
            id,
            name: name.into(),
            stats,
            ledger: BuffLedger::new(id),
            hp: base.hp,
            max_hp: base.hp,
            energy: 0,
            shield: 0,
            calamity: 0,
            curse: 0,
            immune,
            damage_dealt: 0,
            death_wards: 0,
            controls: ControlState::default(),
            status: StatusEffects::empty(),
            shrink: ShrinkStacks::default(),
            capabilities: Capabilities::empty(),
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn stat(&self, stat: StatKind) -> i64 {
        self.stats.get(stat)
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Attack clamped to zero, as used for hit magnitudes.
    pub fn attack(&self) -> f64 {
        self.stat(StatKind::Attack).max(0) as f64
    }

    pub fn hp(&self) -> u64 {
        self.hp
    }

    pub fn max_hp(&self) -> u64 {
        self.max_hp
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn shield(&self) -> u64 {
        self.shield
    }

    pub fn calamity(&self) -> u32 {
        self.calamity
    }

    pub fn curse_stacks(&self) -> u32 {
        self.curse
    }

    pub fn immune(&self) -> ControlKind {
        self.immune
    }

    pub fn damage_dealt(&self) -> u64 {
        self.damage_dealt
    }

    pub fn death_wards(&self) -> u32 {
        self.death_wards
    }

    pub fn buffs(&self) -> &BuffLedger {
        &self.ledger
    }

    /// True when the given control kind currently restrains this combatant.
    pub fn is_controlled(&self, kind: ControlKind) -> bool {
        self.controls.is_afflicted(kind)
    }

    // ===== resources =====

    pub fn gain_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount);
    }

    pub fn drain_energy(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.energy);
        self.energy -= drained;
        drained
    }

    /// Spends `cost` energy if available.
    pub fn spend_energy(&mut self, cost: u32) -> bool {
        if self.energy < cost {
            return false;
        }
        self.energy -= cost;
        true
    }

    /// Adds shield, capped so the buffer never exceeds max HP. Returns the amount gained.
    pub fn add_shield(&mut self, amount: u64) -> u64 {
        if !self.is_alive() {
            return 0;
        }
        let room = self.max_hp.saturating_sub(self.shield);
        let gained = amount.min(room);
        self.shield += gained;
        gained
    }

    /// Soaks `damage` into the shield. Returns `(absorbed, remaining)`.
    pub fn absorb(&mut self, damage: u64) -> (u64, u64) {
        let absorbed = self.shield.min(damage);
        self.shield -= absorbed;
        (absorbed, damage - absorbed)
    }

    /// Removes HP, never below zero. Returns the HP actually lost.
    pub fn lose_hp(&mut self, amount: u64) -> u64 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores HP up to max. Dead combatants are not healed.
    pub fn heal(&mut self, amount: u64) -> u64 {
        if !self.is_alive() {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    pub fn record_damage_dealt(&mut self, amount: u64) {
        self.damage_dealt = self.damage_dealt.saturating_add(amount);
    }

    pub fn grant_death_wards(&mut self, uses: u32) {
        self.death_wards = self.death_wards.saturating_add(uses);
    }

    /// Consumes one death ward if any remain.
    pub fn use_death_ward(&mut self) -> bool {
        if self.death_wards == 0 {
            return false;
        }
        self.death_wards -= 1;
        true
    }

    // ===== curse / calamity counters =====

    pub fn add_curse(&mut self, stacks: u32) {
        if self.is_alive() {
            self.curse = self.curse.saturating_add(stacks);
        }
    }

    /// Clears every curse stack, returning how many were removed.
    pub fn clear_curse(&mut self) -> u32 {
        std::mem::take(&mut self.curse)
    }

    pub fn decay_curse(&mut self) {
        self.curse = self.curse.saturating_sub(1);
    }

    /// Raw calamity increment. Threshold handling lives in [`crate::control`].
    pub(crate) fn bump_calamity(&mut self, stacks: u32) -> (u32, u32) {
        let before = self.calamity;
        self.calamity = self.calamity.saturating_add(stacks);
        (before, self.calamity)
    }

    pub(crate) fn reset_calamity(&mut self) {
        self.calamity = 0;
    }

    pub fn decay_calamity(&mut self) {
        self.calamity = self.calamity.saturating_sub(1);
    }

    // ===== ledger contract =====

    /// Applies a buff through the ledger.
    ///
    /// Order of operations: liveness check, key resolution, curse check,
    /// then either divert-to-damage or apply-and-mutate. `curse_penalty` is
    /// the damage taken when a curse stack intercepts an attribute buff.
    pub fn apply_buff(&mut self, buff: Buff, curse_penalty: u64) -> ApplyOutcome {
        if !self.is_alive() {
            return ApplyOutcome::Rejected;
        }

        let resolution = self.ledger.resolve_key(&buff);

        if buff.origin == BuffOrigin::Attribute && self.curse > 0 {
            self.curse -= 1;
            let damage = self.lose_hp(curse_penalty);
            debug!(
                target: "battle::ledger",
                combatant = %self.id,
                source = buff.source,
                penalty = curse_penalty,
                damage,
                curse_remaining = self.curse,
                "buff diverted by curse"
            );
            return ApplyOutcome::Diverted {
                penalty: curse_penalty,
                damage,
                curse_remaining: self.curse,
            };
        }

        let replaced = match resolution.replaces {
            Some(old) => self.ledger.remove(&old, &mut self.stats).is_some(),
            None => false,
        };
        self.ledger.insert(resolution.key, &buff, &mut self.stats);

        ApplyOutcome::Applied {
            key: resolution.key,
            replaced,
        }
    }

    /// Explicitly removes a record, reversing it.
    pub fn remove_buff(&mut self, key: &BuffKey) -> Option<BuffRecord> {
        self.ledger.remove(key, &mut self.stats)
    }

    /// End-of-round expiry of finite records.
    pub fn expire_buffs(&mut self) -> Vec<ExpiredBuff> {
        self.ledger.expire(&mut self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Lifetime;

    fn hero() -> Combatant {
        let base = BaseStats {
            hp: 1_000,
            attack: 100,
            ..BaseStats::default()
        };
        Combatant::new(CombatantId::Hero(0), "Aria", &base, ControlKind::Fear)
    }

    #[test]
    fn curse_diverts_attribute_buffs() {
        let mut target = hero();
        target.add_curse(2);

        let outcome = target.apply_buff(
            Buff::attribute("anthem", StatKind::Attack, 50, Lifetime::rounds(2)),
            300,
        );

        assert_eq!(
            outcome,
            ApplyOutcome::Diverted {
                penalty: 300,
                damage: 300,
                curse_remaining: 1
            }
        );
        assert_eq!(target.stat(StatKind::Attack), 100);
        assert_eq!(target.hp(), 700);
        assert!(target.buffs().is_empty());
    }

    #[test]
    fn diverted_penalty_is_reported_in_full_on_a_low_target() {
        let mut target = hero();
        target.lose_hp(900);
        target.add_curse(1);

        let outcome = target.apply_buff(
            Buff::attribute("anthem", StatKind::Attack, 50, Lifetime::rounds(2)),
            1_500,
        );

        assert_eq!(
            outcome,
            ApplyOutcome::Diverted {
                penalty: 1_500,
                damage: 100,
                curse_remaining: 0
            }
        );
        assert!(!target.is_alive());
    }

    #[test]
    fn skill_buffs_bypass_curse() {
        let mut target = hero();
        target.add_curse(2);

        let outcome = target.apply_buff(
            Buff::skill("aura", StatKind::Attack, 50, Lifetime::rounds(2)),
            300,
        );

        assert!(outcome.is_applied());
        assert_eq!(target.stat(StatKind::Attack), 150);
        assert_eq!(target.curse_stacks(), 2);
        assert_eq!(target.hp(), 1_000);
    }

    #[test]
    fn dead_targets_reject_buffs() {
        let mut target = hero();
        target.lose_hp(u64::MAX);
        let outcome = target.apply_buff(
            Buff::skill("aura", StatKind::Attack, 50, Lifetime::Permanent),
            0,
        );
        assert_eq!(outcome, ApplyOutcome::Rejected);
        assert_eq!(target.stat(StatKind::Attack), 100);
    }

    #[test]
    fn replace_mode_is_still_intercepted_before_mutation() {
        let mut target = hero();
        target.apply_buff(
            Buff::attribute("hourglass", StatKind::Speed, 20, Lifetime::Permanent).replacing(),
            0,
        );
        target.add_curse(1);

        let outcome = target.apply_buff(
            Buff::attribute("hourglass", StatKind::Speed, 40, Lifetime::Permanent).replacing(),
            10,
        );

        assert!(matches!(outcome, ApplyOutcome::Diverted { .. }));
        assert_eq!(target.stat(StatKind::Speed), 20);
        assert_eq!(target.buffs().len(), 1);
    }

    #[test]
    fn shield_is_capped_and_absorbs() {
        let mut target = hero();
        assert_eq!(target.add_shield(5_000), 1_000);
        assert_eq!(target.absorb(400), (400, 0));
        assert_eq!(target.absorb(900), (600, 300));
        assert_eq!(target.shield(), 0);
    }

    #[test]
    fn heal_does_not_exceed_max_or_revive() {
        let mut target = hero();
        target.lose_hp(300);
        assert_eq!(target.heal(1_000), 300);
        target.lose_hp(2_000);
        assert_eq!(target.heal(100), 0);
    }
}
