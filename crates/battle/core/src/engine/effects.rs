//! Effects: the only way rules change encounter state.
//!
//! Hooks return effects; [`Encounter`] executes them in order. Executing a
//! strike runs its follow-up hooks one level deeper; chains deeper than
//! [`BattleConfig::MAX_EFFECT_DEPTH`] are dropped.

use tracing::{debug, warn};

use super::Encounter;
use super::outcome::{BattleEvent, Blocked};
use crate::combat::{self, DamageContext, DamageOutcome, HitSpec};
use crate::config::BattleConfig;
use crate::control::{self, AfflictionResult, BossReaction, ControlKind};
use crate::engine::boss;
use crate::state::{Capabilities, CombatantId, StatusEffect};
use crate::stats::{ApplyOutcome, Buff, BuffKey};
use crate::variants::{HookContext, TeamEvent};

/// A single state change requested by a rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Strike { attacker: CombatantId, target: CombatantId, spec: HitSpec },
    Heal { target: CombatantId, amount: u64 },
    Shield { target: CombatantId, amount: u64 },
    GainEnergy { target: CombatantId, amount: u32 },
    DrainEnergy { target: CombatantId, amount: u32 },
    ApplyBuff { target: CombatantId, buff: Buff },
    RemoveBuff { target: CombatantId, key: BuffKey },
    AddCalamity { target: CombatantId, stacks: u32 },
    AddCurse { target: CombatantId, stacks: u32 },
    ClearCurse { target: CombatantId },
    /// Removes one random active control affliction.
    PurifyControl { target: CombatantId },
    ApplyStatus { target: CombatantId, status: StatusEffect },
    Shrink { target: CombatantId, rounds: u32 },
    GrantCapabilities { target: CombatantId, flags: Capabilities },
    GrantDeathWards { target: CombatantId, uses: u32 },
}

impl Effect {
    pub fn strike(attacker: CombatantId, target: CombatantId, spec: HitSpec) -> Self {
        Effect::Strike {
            attacker,
            target,
            spec,
        }
    }

    pub fn buff(target: CombatantId, buff: Buff) -> Self {
        Effect::ApplyBuff { target, buff }
    }
}

impl Encounter {
    pub(crate) fn execute(&mut self, effects: Vec<Effect>, depth: usize) {
        for effect in effects {
            if self.is_finished() {
                return;
            }
            self.execute_one(effect, depth);
        }
    }

    fn execute_one(&mut self, effect: Effect, depth: usize) {
        if depth >= BattleConfig::MAX_EFFECT_DEPTH {
            warn!(target: "battle::engine", ?effect, depth, "effect chain too deep, dropping");
            return;
        }

        match effect {
            Effect::Strike {
                attacker,
                target,
                spec,
            } => {
                self.strike_at(attacker, target, &spec, depth);
            }
            Effect::Heal { target, amount } => self.heal(target, amount),
            Effect::Shield { target, amount } => {
                if let Some(combatant) = self.state.get_mut(target) {
                    let gained = combatant.add_shield(amount);
                    if gained > 0 {
                        self.record(BattleEvent::Shielded {
                            target,
                            amount: gained,
                        });
                    }
                }
            }
            Effect::GainEnergy { target, amount } => self.grant_energy(target, amount),
            Effect::DrainEnergy { target, amount } => {
                let drained = match self.state.get_mut(target) {
                    Some(combatant) if combatant.is_alive() => combatant.drain_energy(amount),
                    _ => 0,
                };
                if drained > 0 {
                    self.record(BattleEvent::EnergyDrained {
                        target,
                        amount: drained,
                    });
                }
            }
            Effect::ApplyBuff { target, buff } => {
                self.apply_buff(target, buff);
            }
            Effect::RemoveBuff { target, key } => {
                let removed = self
                    .state
                    .get_mut(target)
                    .and_then(|combatant| combatant.remove_buff(&key));
                if let Some(record) = removed {
                    self.record(BattleEvent::BuffPurified {
                        target,
                        key,
                        stat: record.stat,
                        magnitude: record.magnitude,
                    });
                }
            }
            Effect::AddCalamity { target, stacks } => self.raise_calamity(target, stacks),
            Effect::AddCurse { target, stacks } => {
                let total = match self.state.get_mut(target) {
                    Some(combatant) if combatant.is_alive() => {
                        combatant.add_curse(stacks);
                        combatant.curse_stacks()
                    }
                    _ => return,
                };
                self.record(BattleEvent::CurseAdded {
                    target,
                    stacks,
                    total,
                });
            }
            Effect::ClearCurse { target } => {
                let removed = self
                    .state
                    .get_mut(target)
                    .map_or(0, |combatant| combatant.clear_curse());
                if removed > 0 {
                    self.record(BattleEvent::CurseCleared { target, removed });
                }
            }
            Effect::PurifyControl { target } => {
                let purified = self
                    .state
                    .get_mut(target)
                    .and_then(|combatant| control::purify_random(combatant, &mut self.dice));
                if let Some(kind) = purified {
                    self.record(BattleEvent::ControlPurified { target, kind });
                }
            }
            Effect::ApplyStatus { target, status } => {
                let applied = match self.state.get_mut(target) {
                    Some(combatant) if combatant.is_alive() => {
                        combatant.status.add(status);
                        true
                    }
                    _ => false,
                };
                if applied {
                    self.record(BattleEvent::StatusApplied {
                        target,
                        status: status.kind,
                        rounds: status.rounds,
                    });
                }
            }
            Effect::Shrink { target, rounds } => {
                let applied = match self.state.get_mut(target) {
                    Some(combatant) if combatant.is_alive() => {
                        combatant.shrink.push(rounds);
                        true
                    }
                    _ => false,
                };
                if applied {
                    self.record(BattleEvent::ShrinkApplied { target, rounds });
                }
            }
            Effect::GrantCapabilities { target, flags } => {
                if let Some(combatant) = self.state.get_mut(target) {
                    combatant.capabilities |= flags;
                    self.record(BattleEvent::CapabilitiesGranted { target, flags });
                }
            }
            Effect::GrantDeathWards { target, uses } => {
                if let Some(combatant) = self.state.get_mut(target) {
                    combatant.grant_death_wards(uses);
                    self.record(BattleEvent::DeathWardsGranted { target, uses });
                }
            }
        }

        self.check_terminal();
    }

    /// Applies a buff through the ledger contract and records the result.
    pub fn apply_buff(&mut self, target: CombatantId, buff: Buff) -> ApplyOutcome {
        let penalty = self.state.curse_penalty();
        let Some(combatant) = self.state.get_mut(target) else {
            return ApplyOutcome::Rejected;
        };

        let source = buff.source;
        let stat = buff.stat;
        let magnitude = buff.magnitude;
        let lifetime = buff.lifetime;
        let outcome = combatant.apply_buff(buff, penalty);
        let died = !combatant.is_alive();

        match &outcome {
            ApplyOutcome::Applied { key, replaced } => self.record(BattleEvent::BuffApplied {
                target,
                key: *key,
                stat,
                magnitude,
                lifetime,
                replaced: *replaced,
            }),
            ApplyOutcome::Diverted {
                penalty,
                damage,
                curse_remaining,
            } => {
                self.record(BattleEvent::BuffDiverted {
                    target,
                    source,
                    penalty: *penalty,
                    damage: *damage,
                    curse_remaining: *curse_remaining,
                });
                if died {
                    self.record(BattleEvent::Defeated { target });
                }
            }
            ApplyOutcome::Rejected => self.record(BattleEvent::BuffRejected { target, source }),
        }

        self.check_terminal();
        outcome
    }

    /// Resolves a strike and runs every hook that follows it.
    ///
    /// Returns `None` when either side is missing or dead.
    pub fn strike(&mut self, attacker: CombatantId, target: CombatantId, spec: &HitSpec) -> Option<DamageOutcome> {
        if self.is_finished() {
            return None;
        }
        let outcome = self.strike_at(attacker, target, spec, 0);
        self.check_terminal();
        outcome
    }

    fn strike_at(
        &mut self,
        attacker: CombatantId,
        target: CombatantId,
        spec: &HitSpec,
        depth: usize,
    ) -> Option<DamageOutcome> {
        if !self.state.is_alive(attacker) || !self.state.is_alive(target) {
            return None;
        }

        let outcome = {
            let enable = self.registry.trait_enable();
            let mut ctx = DamageContext::new(&mut self.dice);
            ctx.attacker_trait = enable.filter(|_| !attacker.is_boss());
            ctx.defender_trait = enable.filter(|_| !target.is_boss());
            let (striker, defender) = self.state.pair_mut(attacker, target)?;
            combat::resolve(striker, defender, spec, &mut ctx)
        };
        debug!(
            target: "battle::engine",
            %attacker,
            %target,
            kind = %outcome.kind,
            damage = outcome.damage,
            "strike resolved"
        );
        self.record(BattleEvent::Damage(outcome.clone()));
        if outcome.dodged {
            return Some(outcome);
        }

        if let Some(striker) = self.state.get_mut(attacker) {
            striker.record_damage_dealt(outcome.damage);
        }
        if outcome.self_heal > 0 {
            self.heal(attacker, outcome.self_heal);
        }
        if outcome.killed {
            self.record(BattleEvent::Defeated { target });
            self.check_terminal();
            if self.is_finished() {
                return Some(outcome);
            }
        }

        // Defender side: energy and damage-received hook.
        if target.is_boss() {
            if outcome.kind.is_real() {
                self.grant_energy(target, BattleConfig::BOSS_ENERGY_ON_HIT);
            }
        } else if self.state.is_alive(target) {
            self.grant_energy(target, BattleConfig::ENERGY_ON_HIT);
            let effects = self.class_hook(target, |class, ctx| class.on_receive_damage(ctx, &outcome));
            self.execute(effects, depth + 1);
        }

        // Attacker side: post-attack hook.
        if !attacker.is_boss() && !self.is_finished() {
            let effects = self.class_hook(attacker, |class, ctx| class.post_attack(ctx, &outcome));
            self.execute(effects, depth + 1);
        }

        // Allies of a struck hero.
        if !target.is_boss() && !self.is_finished() {
            self.notify_team(
                TeamEvent::AllyHit {
                    ally: target,
                    damage: outcome.damage,
                },
                depth + 1,
            );
            for holder in self.registry.lifestar_holders() {
                if holder == target || !self.state.is_alive(holder) || self.is_finished() {
                    continue;
                }
                let effects = match (HookContext::new(&self.state, holder), self.registry.lifestar_mut(holder)) {
                    (Some(ctx), Some(lifestar)) => lifestar.on_ally_hit(&ctx, target),
                    _ => Vec::new(),
                };
                self.execute(effects, depth + 1);
            }
        }

        // Real attacks on the boss queue a counterattack, flushed right away.
        if target.is_boss() && outcome.kind.is_real() && !self.is_finished() {
            self.counters.register(attacker);
            self.flush_counters(depth + 1);
        }

        Some(outcome)
    }

    fn flush_counters(&mut self, depth: usize) {
        for attacker in self.counters.drain() {
            if self.is_finished() {
                return;
            }
            if !self.state.is_alive(attacker) {
                continue;
            }
            let spec = boss::counter_spec(&self.state);
            self.strike_at(CombatantId::Boss, attacker, &spec, depth);
        }
    }

    /// Dispatches a team event to every living, unsealed hero class except the subject.
    pub(crate) fn notify_team(&mut self, event: TeamEvent, depth: usize) {
        let subject = match event {
            TeamEvent::AllyActive { ally } | TeamEvent::AllyHit { ally, .. } => ally,
        };
        for id in self.state.living_hero_ids() {
            if id == subject || self.is_finished() {
                continue;
            }
            let sealed = self
                .state
                .get(id)
                .is_some_and(|hero| hero.is_controlled(ControlKind::Seal));
            if sealed {
                if matches!(event, TeamEvent::AllyActive { .. }) {
                    self.record(BattleEvent::Suppressed {
                        actor: id,
                        control: ControlKind::Seal,
                        blocked: Blocked::Passive,
                    });
                }
                continue;
            }
            let effects = self.class_hook(id, |class, ctx| class.passive_trigger(ctx, &event));
            self.execute(effects, depth);
        }
    }

    pub(crate) fn heal(&mut self, target: CombatantId, amount: u64) {
        let healed = self
            .state
            .get_mut(target)
            .map_or(0, |combatant| combatant.heal(amount));
        if healed > 0 {
            self.record(BattleEvent::Healed {
                target,
                amount: healed,
            });
        }
    }

    /// Energy gain, blocked while sealed.
    pub(crate) fn grant_energy(&mut self, target: CombatantId, amount: u32) {
        let Some(combatant) = self.state.get_mut(target) else {
            return;
        };
        if !combatant.is_alive() || amount == 0 {
            return;
        }
        if combatant.is_controlled(ControlKind::Seal) {
            self.record(BattleEvent::Suppressed {
                actor: target,
                control: ControlKind::Seal,
                blocked: Blocked::EnergyGain,
            });
            return;
        }
        combatant.gain_energy(amount);
        self.record(BattleEvent::EnergyGained { target, amount });
    }

    fn raise_calamity(&mut self, target: CombatantId, stacks: u32) {
        let config = self.state.config().clone();
        let Some(combatant) = self.state.get_mut(target) else {
            return;
        };
        let Some(result) = control::add_calamity(combatant, stacks, &mut self.dice, &config) else {
            return;
        };

        self.record(BattleEvent::CalamityRaised {
            target,
            before: result.before,
            after: result.raised,
        });
        let Some(batch) = result.mass_affliction else {
            return;
        };

        self.record(BattleEvent::CalamityTriggered { target });
        for (kind, affliction) in batch {
            match affliction {
                AfflictionResult::Afflicted { rounds } => {
                    self.record(BattleEvent::ControlApplied { target, kind, rounds });
                    if !target.is_boss() {
                        if let Some(reaction) = self.reactions.trigger(kind) {
                            self.apply_boss_reaction(kind, reaction);
                        }
                    }
                }
                AfflictionResult::Resisted => self.record(BattleEvent::ControlResisted { target, kind }),
                AfflictionResult::Immune => self.record(BattleEvent::ControlImmune { target, kind }),
                AfflictionResult::Rejected => {}
            }
        }
    }

    fn apply_boss_reaction(&mut self, kind: ControlKind, reaction: BossReaction) {
        self.record(BattleEvent::BossReaction { kind });
        match reaction {
            BossReaction::Buff(buff) => {
                self.apply_buff(CombatantId::Boss, buff);
            }
            BossReaction::Energy(amount) => self.grant_energy(CombatantId::Boss, amount),
        }
    }
}
