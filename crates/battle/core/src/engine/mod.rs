//! Encounter orchestration.
//!
//! [`Encounter`] owns the [`BattleState`], the variant [`Registry`] and the
//! dice. Rounds are driven by [`Encounter::run_round`]; every state change
//! goes through the effect executor and leaves an [`Outcome`] behind.

mod boss;
mod effects;
mod outcome;
mod round;

pub use effects::Effect;
pub use outcome::{Blocked, BattleEvent, EncounterResult, EncounterStatus, Outcome, OutcomeCategory};

use std::collections::BTreeSet;
use std::str::FromStr;

use arrayvec::ArrayVec;
use tracing::info;

use crate::config::{BaseStats, BattleConfig, EncounterSpec};
use crate::control::{BossReactions, ControlKind};
use crate::env::{Dice, PcgRng, RngOracle};
use crate::error::SetupError;
use crate::state::{BattleState, Combatant, CombatantId};
use crate::variants::{HeroClass, HookContext, Registry};

/// Counterattack sources waiting to be answered, deduplicated per round.
#[derive(Clone, Debug, Default)]
pub(crate) struct CounterQueue {
    pending: Vec<CombatantId>,
    answered: BTreeSet<CombatantId>,
}

impl CounterQueue {
    /// Queues `attacker` unless it was already queued this round.
    pub(crate) fn register(&mut self, attacker: CombatantId) -> bool {
        if !self.answered.insert(attacker) {
            return false;
        }
        self.pending.push(attacker);
        true
    }

    pub(crate) fn drain(&mut self) -> Vec<CombatantId> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn reset_round(&mut self) {
        self.pending.clear();
        self.answered.clear();
    }
}

/// A running encounter.
#[derive(Debug)]
pub struct Encounter {
    state: BattleState,
    registry: Registry,
    dice: Dice,
    outcomes: Vec<Outcome>,
    status: EncounterStatus,
    counters: CounterQueue,
    reactions: BossReactions,
}

fn parse_immune(name: &str, value: &str) -> Result<ControlKind, SetupError> {
    ControlKind::from_str(value).map_err(|_| SetupError::UnknownControlKind {
        combatant: name.to_string(),
        value: value.to_string(),
    })
}

fn check_hp(name: &str, stats: &BaseStats) -> Result<(), SetupError> {
    if stats.hp == 0 {
        return Err(SetupError::ZeroHp(name.to_string()));
    }
    Ok(())
}

impl Encounter {
    /// Builds an encounter with the default PCG oracle and runs start-of-battle hooks.
    pub fn new(spec: &EncounterSpec) -> Result<Self, SetupError> {
        Self::with_oracle(spec, Box::new(PcgRng))
    }

    /// Builds an encounter drawing randomness from `oracle`.
    ///
    /// Fails before any round executes if the roster size is out of range,
    /// any identifier is unknown, or any combatant has zero HP.
    pub fn with_oracle(spec: &EncounterSpec, oracle: Box<dyn RngOracle>) -> Result<Self, SetupError> {
        if spec.heroes.is_empty() {
            return Err(SetupError::EmptyRoster);
        }
        if spec.heroes.len() > BattleConfig::MAX_HEROES {
            return Err(SetupError::TooManyHeroes {
                count: spec.heroes.len(),
                max: BattleConfig::MAX_HEROES,
            });
        }

        let mut heroes = ArrayVec::new();
        for (index, hero) in spec.heroes.iter().enumerate() {
            check_hp(&hero.name, &hero.stats)?;
            let immune = parse_immune(&hero.name, &hero.immune)?;
            heroes.push(Combatant::new(
                CombatantId::Hero(index as u8),
                hero.name.clone(),
                &hero.stats,
                immune,
            ));
        }
        check_hp(&spec.boss.name, &spec.boss.stats)?;
        let boss_immune = parse_immune(&spec.boss.name, &spec.boss.immune)?;
        let boss = Combatant::new(CombatantId::Boss, spec.boss.name.clone(), &spec.boss.stats, boss_immune);

        let registry = Registry::from_spec(spec)?;
        let config = spec.config.clone();
        let dice = Dice::new(oracle, config.seed);

        let mut encounter = Self {
            state: BattleState::new(heroes, boss, config),
            registry,
            dice,
            outcomes: Vec::new(),
            status: EncounterStatus::Ongoing,
            counters: CounterQueue::default(),
            reactions: BossReactions::default(),
        };
        encounter.start_of_battle();
        Ok(encounter)
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Every record produced so far, oldest first.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, EncounterStatus::Finished(_))
    }

    pub fn result(&self) -> Option<EncounterResult> {
        match self.status {
            EncounterStatus::Finished(result) => Some(result),
            EncounterStatus::Ongoing => None,
        }
    }

    /// Runs rounds until the encounter ends.
    pub fn run(&mut self) -> EncounterResult {
        loop {
            if let Some(result) = self.result() {
                return result;
            }
            self.run_round();
        }
    }

    /// Executes effects outside the regular hooks, e.g. scripted events.
    pub fn apply(&mut self, effects: Vec<Effect>) {
        self.execute(effects, 0);
    }

    fn start_of_battle(&mut self) {
        for id in self.state.living_hero_ids() {
            let effects = self.class_hook(id, |class, ctx| class.start_of_battle(ctx));
            self.execute(effects, 0);
        }
        if let Some(artifact) = self.registry.artifact_mut() {
            let effects = artifact.apply_start_of_battle(&self.state);
            self.execute(effects, 0);
        }
        if let Some(companion) = self.registry.companion_mut() {
            let effects = companion.apply_start_of_battle(&self.state);
            self.execute(effects, 0);
        }
        if let Some(enable) = self.registry.trait_enable() {
            let effects = enable.apply_start_of_battle(&self.state);
            self.execute(effects, 0);
        }
    }

    /// Runs a class hook for `id` with a context over the current state.
    pub(crate) fn class_hook(
        &mut self,
        id: CombatantId,
        hook: impl FnOnce(&mut Box<dyn HeroClass>, &HookContext<'_>) -> Vec<Effect>,
    ) -> Vec<Effect> {
        match (HookContext::new(&self.state, id), self.registry.class_mut(id)) {
            (Some(ctx), Some(class)) => hook(class, &ctx),
            _ => Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, event: BattleEvent) {
        self.outcomes.push(Outcome::new(self.state.round(), event));
    }

    /// Ends the encounter as soon as either side is fully down.
    pub(crate) fn check_terminal(&mut self) {
        if self.is_finished() {
            return;
        }
        if !self.state.boss().is_alive() {
            self.finish(EncounterResult::Victory);
        } else if self.state.all_heroes_down() {
            self.finish(EncounterResult::Defeat);
        }
    }

    pub(crate) fn finish(&mut self, result: EncounterResult) {
        if self.is_finished() {
            return;
        }
        let rounds = self.state.round();
        info!(target: "battle::engine", %result, rounds, "encounter finished");
        self.status = EncounterStatus::Finished(result);
        self.record(BattleEvent::Finished { result, rounds });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackKind, HitSpec};
    use crate::config::{BossSpec, HeroSpec};
    use crate::stats::{ApplyOutcome, Buff, Lifetime, StatKind};

    fn hero(name: &str, class: &str) -> HeroSpec {
        HeroSpec::new(
            name,
            class,
            BaseStats {
                hp: 10_000,
                attack: 100,
                speed: 10,
                ..BaseStats::default()
            },
        )
    }

    fn encounter(boss_hp: u64) -> Encounter {
        let spec = EncounterSpec::new(
            vec![hero("Aria", "warden"), hero("Brann", "bard")],
            BossSpec::new(
                "Wyrm",
                BaseStats {
                    hp: boss_hp,
                    attack: 50,
                    ..BaseStats::default()
                },
            ),
        );
        Encounter::new(&spec).unwrap()
    }

    #[test]
    fn start_of_battle_applies_team_auras() {
        let encounter = encounter(1_000_000);
        for hero in encounter.state().heroes() {
            assert_eq!(hero.stat(StatKind::CtrlImmunity), 15);
            assert_eq!(hero.stat(StatKind::Precision), 30);
        }
        assert!(encounter.outcomes().iter().all(|o| o.round == 0));
    }

    #[test]
    fn counters_are_queued_once_per_round() {
        let mut queue = CounterQueue::default();
        assert!(queue.register(CombatantId::Hero(0)));
        assert!(!queue.register(CombatantId::Hero(0)));
        assert_eq!(queue.drain(), vec![CombatantId::Hero(0)]);
        assert!(queue.drain().is_empty());
        assert!(!queue.register(CombatantId::Hero(0)));
        queue.reset_round();
        assert!(queue.register(CombatantId::Hero(0)));
    }

    #[test]
    fn boss_at_one_hp_falls_to_the_first_action() {
        let mut encounter = encounter(1);
        let outcomes = encounter.run_round().to_vec();

        assert_eq!(encounter.result(), Some(EncounterResult::Victory));
        let strikes = outcomes
            .iter()
            .filter(|o| matches!(o.event, BattleEvent::Damage(_)))
            .count();
        assert_eq!(strikes, 1);
        assert!(!outcomes.iter().any(|o| matches!(o.event, BattleEvent::RoundEnded { .. })));
        assert_eq!(outcomes.last().map(|o| o.category), Some(OutcomeCategory::Result));
    }

    #[test]
    fn real_strikes_on_the_boss_are_countered_immediately() {
        let mut encounter = encounter(1_000_000);
        let spec = HitSpec::single(AttackKind::Basic, 10.0);
        encounter.strike(CombatantId::Hero(1), CombatantId::Boss, &spec);
        encounter.strike(CombatantId::Hero(1), CombatantId::Boss, &spec);

        let counters = encounter
            .outcomes()
            .iter()
            .filter(|o| matches!(&o.event, BattleEvent::Damage(d) if d.kind == AttackKind::Counter))
            .count();
        assert_eq!(counters, 1);
    }

    #[test]
    fn curse_diverts_buffs_applied_through_the_engine() {
        let mut encounter = encounter(1_000_000);
        encounter.apply(vec![Effect::AddCurse {
            target: CombatantId::Hero(0),
            stacks: 2,
        }]);

        let outcome = encounter.apply_buff(
            CombatantId::Hero(0),
            Buff::attribute("anthem", StatKind::Attack, 40, Lifetime::rounds(2)),
        );
        assert_eq!(
            outcome,
            ApplyOutcome::Diverted {
                penalty: 1_500,
                damage: 1_500,
                curse_remaining: 1
            }
        );
        let hero = encounter.state().hero(0).unwrap();
        assert_eq!(hero.stat(StatKind::Attack), 100);
        assert_eq!(hero.hp(), 8_500);
    }
}
