//! Round scheduler.
//!
//! Phase order within a round:
//!
//! 1. start of round: damage-over-time ticks
//! 2. hero phase: descending speed, ties in roster order
//! 3. boss phase: active at full energy, basic otherwise
//! 4. end of round: class, artifact, companion, purify, lifestar and boss
//!    hooks, then decay of buffs, controls, statuses, curse and calamity
//!
//! The encounter ends the moment either side is fully down; remaining
//! actions are skipped.

use tracing::debug;

use super::outcome::{BattleEvent, Blocked, EncounterResult, Outcome};
use super::{Encounter, boss};
use crate::combat::AttackKind;
use crate::config::BattleConfig;
use crate::control::ControlKind;
use crate::env::RollContext;
use crate::state::{CombatantId, StatusEffect};
use crate::variants::{HookContext, TeamEvent, TransitionAttempt};

impl Encounter {
    /// Plays one round and returns the records it produced.
    ///
    /// Does nothing once the encounter is finished.
    pub fn run_round(&mut self) -> &[Outcome] {
        let start = self.outcomes.len();
        if self.is_finished() {
            return &self.outcomes[start..];
        }

        let round = self.state.advance_round();
        debug!(target: "battle::engine", round, "round start");
        self.record(BattleEvent::RoundStarted { round });

        self.tick_statuses();
        if !self.is_finished() {
            self.hero_phase();
        }
        if !self.is_finished() {
            self.boss_phase();
        }
        if !self.is_finished() {
            self.end_of_round();
        }

        &self.outcomes[start..]
    }

    fn tick_statuses(&mut self) {
        for id in self.state.all_ids() {
            let ticks: Vec<StatusEffect> = match self.state.get(id) {
                Some(combatant) if combatant.is_alive() => {
                    combatant.status.damage_over_time().copied().collect()
                }
                _ => continue,
            };

            for tick in ticks {
                let Some(combatant) = self.state.get_mut(id) else {
                    break;
                };
                if !combatant.is_alive() {
                    break;
                }
                let (_, remaining) = combatant.absorb(tick.magnitude);
                let damage = combatant.lose_hp(remaining);
                let died = !combatant.is_alive();

                if let Some(source) = self.state.get_mut(tick.source) {
                    source.record_damage_dealt(damage);
                }
                self.record(BattleEvent::DamageOverTime {
                    target: id,
                    source: tick.source,
                    status: tick.kind,
                    damage,
                });
                if died {
                    self.record(BattleEvent::Defeated { target: id });
                    self.check_terminal();
                    if self.is_finished() {
                        return;
                    }
                }
            }
        }
    }

    fn hero_phase(&mut self) {
        for id in self.state.action_order() {
            if self.is_finished() {
                return;
            }
            if self.state.is_alive(id) {
                self.take_turn(id);
            }
        }
    }

    fn take_turn(&mut self, id: CombatantId) {
        let Some(hero) = self.state.get(id) else {
            return;
        };
        if hero.is_controlled(ControlKind::Fear) {
            self.record(BattleEvent::Suppressed {
                actor: id,
                control: ControlKind::Fear,
                blocked: Blocked::Turn,
            });
            return;
        }

        let ready = hero.energy() >= BattleConfig::ENERGY_THRESHOLD;
        let silenced = hero.is_controlled(ControlKind::Silence);
        if ready && silenced {
            self.record(BattleEvent::Suppressed {
                actor: id,
                control: ControlKind::Silence,
                blocked: Blocked::ActiveSkill,
            });
        }

        if ready && !silenced {
            self.active_skill(id);
        } else {
            self.basic_attack(id);
        }

        if !self.is_finished() && self.state.is_alive(id) {
            self.attempt_transition(id);
        }
    }

    fn basic_attack(&mut self, id: CombatantId) {
        self.record(BattleEvent::ActionTaken {
            actor: id,
            action: AttackKind::Basic,
        });
        let effects = self.class_hook(id, |class, ctx| class.basic_attack(ctx));
        self.execute(effects, 0);
        if !self.is_finished() {
            self.grant_energy(id, BattleConfig::ENERGY_PER_BASIC);
        }
    }

    fn active_skill(&mut self, id: CombatantId) {
        let spent = self
            .state
            .get_mut(id)
            .is_some_and(|hero| hero.spend_energy(BattleConfig::ENERGY_THRESHOLD));
        if !spent {
            return;
        }

        self.record(BattleEvent::ActionTaken {
            actor: id,
            action: AttackKind::Active,
        });
        let effects = self.class_hook(id, |class, ctx| class.active_skill(ctx));
        self.execute(effects, 0);
        if self.is_finished() {
            return;
        }

        if let Some(artifact) = self.registry.artifact_mut() {
            let effects = artifact.on_active_skill(&self.state, id);
            self.execute(effects, 0);
        }
        if let Some(companion) = self.registry.companion_mut() {
            companion.on_hero_active(id);
        }
        self.notify_team(TeamEvent::AllyActive { ally: id }, 0);
    }

    /// Resource-gated bonus action at the end of the owner's turn.
    fn attempt_transition(&mut self, id: CombatantId) {
        let has_meter = self
            .registry
            .class(id)
            .is_some_and(|class| class.meter().is_some());
        if !has_meter {
            return;
        }
        if self
            .state
            .get(id)
            .is_some_and(|hero| hero.is_controlled(ControlKind::Seal))
        {
            self.record(BattleEvent::Suppressed {
                actor: id,
                control: ControlKind::Seal,
                blocked: Blocked::Transition,
            });
            return;
        }

        let attempt = match (HookContext::new(&self.state, id), self.registry.class_mut(id)) {
            (Some(ctx), Some(class)) => class.release_transition_skill(&ctx),
            _ => TransitionAttempt::Unsupported,
        };
        match attempt {
            TransitionAttempt::Released(effects) => {
                self.record(BattleEvent::TransitionReleased { actor: id });
                self.execute(effects, 0);
            }
            TransitionAttempt::Insufficient { current, threshold } => {
                self.record(BattleEvent::TransitionInsufficient {
                    actor: id,
                    current,
                    threshold,
                });
            }
            TransitionAttempt::Unsupported => {}
        }
    }

    fn boss_phase(&mut self) {
        let boss = self.state.boss();
        if !boss.is_alive() {
            return;
        }
        if boss.is_controlled(ControlKind::Fear) {
            self.record(BattleEvent::Suppressed {
                actor: CombatantId::Boss,
                control: ControlKind::Fear,
                blocked: Blocked::Turn,
            });
            return;
        }

        let ready = boss.energy() >= BattleConfig::ENERGY_THRESHOLD;
        let silenced = boss.is_controlled(ControlKind::Silence);
        if ready && !silenced && self.state.boss_mut().spend_energy(BattleConfig::ENERGY_THRESHOLD) {
            self.record(BattleEvent::ActionTaken {
                actor: CombatantId::Boss,
                action: AttackKind::Active,
            });
            let effects = boss::active(&self.state);
            self.execute(effects, 0);
            return;
        }

        if ready && silenced {
            self.record(BattleEvent::Suppressed {
                actor: CombatantId::Boss,
                control: ControlKind::Silence,
                blocked: Blocked::ActiveSkill,
            });
        }
        let living = self.state.living_hero_ids();
        if living.is_empty() {
            return;
        }
        let target = living[self.dice.pick(CombatantId::Boss, RollContext::Target, living.len())];

        self.record(BattleEvent::ActionTaken {
            actor: CombatantId::Boss,
            action: AttackKind::Basic,
        });
        let effects = boss::basic(&self.state, target);
        self.execute(effects, 0);
        if !self.is_finished() {
            self.grant_energy(CombatantId::Boss, BattleConfig::ENERGY_PER_BASIC);
        }
    }

    fn end_of_round(&mut self) {
        for id in self.state.living_hero_ids() {
            if self.is_finished() {
                return;
            }
            let effects = self.class_hook(id, |class, ctx| class.end_of_round(ctx));
            self.execute(effects, 0);
        }

        if let Some(artifact) = self.registry.artifact_mut() {
            let effects = artifact.apply_end_of_round(&self.state);
            self.execute(effects, 0);
        }

        let mut released = None;
        if let Some(companion) = self.registry.companion_mut() {
            let kind = companion.kind();
            released = companion.apply_end_of_round(&self.state).map(|effects| (kind, effects));
        }
        if let Some((companion, effects)) = released {
            self.record(BattleEvent::CompanionReleased { companion });
            self.execute(effects, 0);
        }

        if let Some(purify) = self.registry.purify_mut() {
            let effects = purify.apply_end_of_round(&self.state);
            self.execute(effects, 0);
        }

        for holder in self.registry.lifestar_holders() {
            if !self.state.is_alive(holder) {
                continue;
            }
            let effects = match (HookContext::new(&self.state, holder), self.registry.lifestar_mut(holder)) {
                (Some(ctx), Some(lifestar)) => lifestar.apply_end_of_round(&ctx),
                _ => Vec::new(),
            };
            self.execute(effects, 0);
        }

        let effects = boss::end_of_round(&self.state);
        self.execute(effects, 0);
        if self.is_finished() {
            return;
        }

        self.decay();
        let round = self.state.round();
        self.record(BattleEvent::RoundEnded { round });

        if round >= self.state.config().round_cap {
            self.finish(EncounterResult::RoundCap);
        }
    }

    /// Once-per-round decay of every timed counter.
    fn decay(&mut self) {
        self.counters.reset_round();

        for id in self.state.all_ids() {
            let Some(combatant) = self.state.get_mut(id) else {
                continue;
            };
            if !combatant.is_alive() {
                continue;
            }

            let expired_buffs = combatant.expire_buffs();
            let expired_controls = combatant.controls.decay();
            let expired_statuses = combatant.status.decay();
            let expired_shrinks = combatant.shrink.decay();
            combatant.decay_curse();
            combatant.decay_calamity();

            for expired in expired_buffs {
                self.record(BattleEvent::BuffExpired {
                    target: id,
                    key: expired.key,
                    stat: expired.record.stat,
                    magnitude: expired.record.magnitude,
                });
            }
            for kind in expired_controls {
                self.record(BattleEvent::ControlExpired { target: id, kind });
            }
            for status in expired_statuses {
                self.record(BattleEvent::StatusExpired { target: id, status });
            }
            if expired_shrinks > 0 {
                self.record(BattleEvent::ShrinkExpired {
                    target: id,
                    stacks: expired_shrinks,
                });
            }
        }
    }
}
