//! Control afflictions: fear, silence and seal.
//!
//! Per (combatant, kind) the machine is either clear or afflicted with a
//! remaining-round counter. A combatant's immune kind can never be afflicted.
//! The calamity counter feeds a mass-affliction trigger at
//! [`BattleConfig::CALAMITY_THRESHOLD`].

use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use crate::config::BattleConfig;
use crate::env::{Dice, RollContext};
use crate::state::Combatant;
use crate::stats::{Buff, Lifetime, StatKind};

/// The three control kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ControlKind {
    /// The whole turn is lost.
    Fear,
    /// Active skills are blocked.
    Silence,
    /// Energy gain, passives and transitions are blocked.
    Seal,
}

/// Remaining rounds per control kind; zero means clear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    remaining: [u32; ControlKind::COUNT],
}

impl ControlState {
    pub fn is_afflicted(&self, kind: ControlKind) -> bool {
        self.remaining[kind as usize] > 0
    }

    pub fn remaining(&self, kind: ControlKind) -> u32 {
        self.remaining[kind as usize]
    }

    /// Sets the counter, keeping the longer of the current and new duration.
    pub(crate) fn afflict(&mut self, kind: ControlKind, rounds: u32) {
        let slot = &mut self.remaining[kind as usize];
        *slot = (*slot).max(rounds);
    }

    /// Clears one kind. Returns whether it was active.
    pub(crate) fn clear(&mut self, kind: ControlKind) -> bool {
        std::mem::take(&mut self.remaining[kind as usize]) > 0
    }

    /// One round passes. Returns the kinds that wore off.
    pub(crate) fn decay(&mut self) -> Vec<ControlKind> {
        let mut expired = Vec::new();
        for kind in ControlKind::iter() {
            let slot = &mut self.remaining[kind as usize];
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    pub fn active(&self) -> impl Iterator<Item = ControlKind> + '_ {
        ControlKind::iter().filter(|kind| self.is_afflicted(*kind))
    }

    pub fn any_active(&self) -> bool {
        self.remaining.iter().any(|r| *r > 0)
    }
}

/// Result of a single affliction attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AfflictionResult {
    /// The kind is the target's immune kind.
    Immune,
    /// The resistance roll succeeded.
    Resisted,
    Afflicted { rounds: u32 },
    /// The target is not alive.
    Rejected,
}

impl AfflictionResult {
    pub fn landed(&self) -> bool {
        matches!(self, AfflictionResult::Afflicted { .. })
    }
}

/// Attempts to afflict `target` with `kind`.
///
/// Resist probability is `clamp(ctrl_immunity, 0, 100)` percent.
pub fn attempt(
    target: &mut Combatant,
    kind: ControlKind,
    dice: &mut Dice,
    config: &BattleConfig,
) -> AfflictionResult {
    if !target.is_alive() {
        return AfflictionResult::Rejected;
    }
    if kind == target.immune() {
        return AfflictionResult::Immune;
    }

    let resist = target.stat(StatKind::CtrlImmunity).clamp(0, 100);
    if dice.chance(target.id(), RollContext::Resist, resist) {
        debug!(target: "battle::control", combatant = %target.id(), %kind, "resisted");
        return AfflictionResult::Resisted;
    }

    let rounds = config.control_duration();
    target.controls.afflict(kind, rounds);
    debug!(target: "battle::control", combatant = %target.id(), %kind, rounds, "afflicted");
    AfflictionResult::Afflicted { rounds }
}

/// Result of raising a calamity counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalamityOutcome {
    pub before: u32,
    /// Counter value right after the increment, before any reset.
    pub raised: u32,
    /// Per-kind results when the threshold was crossed.
    pub mass_affliction: Option<Vec<(ControlKind, AfflictionResult)>>,
}

impl CalamityOutcome {
    pub fn triggered(&self) -> bool {
        self.mass_affliction.is_some()
    }
}

/// Raises calamity by `stacks`.
///
/// Crossing from below the threshold to at-or-above it attempts every
/// non-immune kind in one batch and then resets the counter to zero,
/// however many afflictions landed. Returns `None` for dead targets.
pub fn add_calamity(
    target: &mut Combatant,
    stacks: u32,
    dice: &mut Dice,
    config: &BattleConfig,
) -> Option<CalamityOutcome> {
    if !target.is_alive() || stacks == 0 {
        return None;
    }

    let (before, raised) = target.bump_calamity(stacks);
    let threshold = BattleConfig::CALAMITY_THRESHOLD;
    if before >= threshold || raised < threshold {
        return Some(CalamityOutcome {
            before,
            raised,
            mass_affliction: None,
        });
    }

    debug!(target: "battle::control", combatant = %target.id(), raised, "calamity threshold reached");
    let immune = target.immune();
    let results = ControlKind::iter()
        .filter(|kind| *kind != immune)
        .map(|kind| (kind, attempt(target, kind, dice, config)))
        .collect();
    target.reset_calamity();

    Some(CalamityOutcome {
        before,
        raised,
        mass_affliction: Some(results),
    })
}

/// Removes one active affliction chosen uniformly at random.
pub fn purify_random(target: &mut Combatant, dice: &mut Dice) -> Option<ControlKind> {
    let active: Vec<ControlKind> = target.controls.active().collect();
    if active.is_empty() {
        return None;
    }
    let kind = active[dice.pick(target.id(), RollContext::Purify, active.len())];
    target.controls.clear(kind);
    debug!(target: "battle::control", combatant = %target.id(), %kind, "purified");
    Some(kind)
}

/// One-time bonus the boss receives when a hero is first afflicted with a kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BossReaction {
    Buff(Buff),
    Energy(u32),
}

/// Tracks which reactive bonuses the boss has already received.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossReactions {
    fired: [bool; ControlKind::COUNT],
}

impl BossReactions {
    pub const FEAR_HOLY_DAMAGE: i64 = 20;
    pub const SILENCE_ENERGY: u32 = 50;
    pub const SEAL_ALL_DAMAGE: i64 = 20;

    /// Returns the reaction for `kind` the first time it is asked for.
    pub fn trigger(&mut self, kind: ControlKind) -> Option<BossReaction> {
        let fired = &mut self.fired[kind as usize];
        if *fired {
            return None;
        }
        *fired = true;
        Some(boss_reaction(kind))
    }
}

/// The reactive bonus keyed to a control kind.
pub fn boss_reaction(kind: ControlKind) -> BossReaction {
    let lifetime = Lifetime::rounds(BattleConfig::REACTIVE_BUFF_ROUNDS);
    match kind {
        ControlKind::Fear => BossReaction::Buff(Buff::skill(
            "dread_feast",
            StatKind::HolyDamage,
            BossReactions::FEAR_HOLY_DAMAGE,
            lifetime,
        )),
        ControlKind::Silence => BossReaction::Energy(BossReactions::SILENCE_ENERGY),
        ControlKind::Seal => BossReaction::Buff(Buff::skill(
            "sealed_fury",
            StatKind::AllDamageDealt,
            BossReactions::SEAL_ALL_DAMAGE,
            lifetime,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseStats;
    use crate::state::CombatantId;

    fn target(ctrl_immunity: i64) -> Combatant {
        let base = BaseStats {
            hp: 100,
            ctrl_immunity,
            ..BaseStats::default()
        };
        Combatant::new(CombatantId::Hero(0), "t", &base, ControlKind::Fear)
    }

    #[test]
    fn full_immunity_always_resists() {
        let mut dice = Dice::seeded(3);
        let config = BattleConfig::default();
        for _ in 0..500 {
            let mut t = target(140);
            let result = attempt(&mut t, ControlKind::Silence, &mut dice, &config);
            assert_eq!(result, AfflictionResult::Resisted);
            assert!(!t.controls.any_active());
        }
    }

    #[test]
    fn zero_immunity_always_lands_except_immune_kind() {
        let mut dice = Dice::seeded(3);
        let config = BattleConfig::default();
        for _ in 0..500 {
            let mut t = target(0);
            assert!(attempt(&mut t, ControlKind::Seal, &mut dice, &config).landed());
            assert_eq!(
                attempt(&mut t, ControlKind::Fear, &mut dice, &config),
                AfflictionResult::Immune
            );
        }
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn core_shortens_duration() {
        let mut dice = Dice::seeded(3);
        let config = BattleConfig::default().with_core(true);
        let mut t = target(0);
        assert_eq!(
            attempt(&mut t, ControlKind::Silence, &mut dice, &config),
            AfflictionResult::Afflicted { rounds: 1 }
        );
        assert_eq!(t.controls.decay(), vec![ControlKind::Silence]);
    }

    #[test]
    fn calamity_crossing_triggers_once_and_resets() {
        let mut dice = Dice::seeded(3);
        let config = BattleConfig::default();
        let mut t = target(0);

        let quiet = add_calamity(&mut t, 3, &mut dice, &config).unwrap();
        assert!(!quiet.triggered());
        let quiet = add_calamity(&mut t, 1, &mut dice, &config).unwrap();
        assert!(!quiet.triggered());
        assert_eq!(t.calamity(), 4);

        let burst = add_calamity(&mut t, 1, &mut dice, &config).unwrap();
        let results = burst.mass_affliction.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(kind, _)| *kind != ControlKind::Fear));
        assert_eq!(t.calamity(), 0);
        assert!(t.is_controlled(ControlKind::Silence));
        assert!(t.is_controlled(ControlKind::Seal));
    }

    #[test]
    fn calamity_resets_even_when_everything_resists() {
        let mut dice = Dice::seeded(3);
        let config = BattleConfig::default();
        let mut t = target(100);
        t.bump_calamity(4);

        let burst = add_calamity(&mut t, 3, &mut dice, &config).unwrap();
        assert_eq!(burst.raised, 7);
        assert!(burst
            .mass_affliction
            .unwrap()
            .iter()
            .all(|(_, r)| *r == AfflictionResult::Resisted));
        assert_eq!(t.calamity(), 0);
    }

    #[test]
    fn purify_removes_one_active_kind() {
        let mut dice = Dice::seeded(9);
        let mut t = target(0);
        t.controls.afflict(ControlKind::Silence, 2);
        t.controls.afflict(ControlKind::Seal, 2);

        let removed = purify_random(&mut t, &mut dice).unwrap();
        assert!(!t.is_controlled(removed));
        assert_eq!(t.controls.active().count(), 1);
    }

    #[test]
    fn boss_reactions_fire_once_per_kind() {
        let mut reactions = BossReactions::default();
        assert_eq!(
            reactions.trigger(ControlKind::Silence),
            Some(BossReaction::Energy(BossReactions::SILENCE_ENERGY))
        );
        assert_eq!(reactions.trigger(ControlKind::Silence), None);
        assert!(matches!(reactions.trigger(ControlKind::Fear), Some(BossReaction::Buff(_))));
    }
}
