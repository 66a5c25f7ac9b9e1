//! The damage pipeline.
//!
//! # Formula
//!
//! ```text
//! pre-roll (evadable only): dodge -> miss, block -> halve every hit
//! per hit: crit with p = min(crit_rate + bonus, 100)%,
//!          x (1.5 + 2 * min(crit_dmg, 150) / 100)
//! 1.  x (1 + holy * 0.007) x (1 + min(precision, 150) * 0.003) x (1 + all_damage_dealt / 100)
//! 2.  x product(1 + conditional modifier)
//! 3.  x (1 + level * 0.10)                      damage-type level, if any
//! 4.  x (1 + crit_damage_taken / 100)           if any hit crit
//! 5.  x shrink (attacker dealt, defender received)
//! 6.  + 30% of running total                    steadfast, if any hit did not crit
//! 7.  trait conversion: self-heal and/or extra damage
//! 8.  x (1 - min(DR, 75) / 100) x (1 - min(ADR, 75) / 100), negative values amplify
//! 9.  shield absorption
//! 10. death ward: clamp to HP - 1
//! 11. floor, never below zero
//! ```

use tracing::trace;

use super::hit::HitSpec;
use super::modifiers::{Modifier, MultiplierStack};
use super::result::DamageOutcome;
use crate::config::BattleConfig;
use crate::env::{Dice, RollContext};
use crate::state::{Capabilities, Combatant, StatusKind};
use crate::stats::StatKind;
use crate::variants::TraitEnable;

const HOLY_SCALE: f64 = 0.007;
const PRECISION_SCALE: f64 = 0.003;
const DAMAGE_TYPE_STEP: f64 = 0.10;
const CRIT_BASE: f64 = 1.5;
const CRIT_DMG_SCALE: f64 = 2.0;

/// Collaborators the pipeline consults while resolving one strike.
pub struct DamageContext<'a> {
    pub dice: &'a mut Dice,
    /// Trait enable acting for the attacker's side (crit bonus, steps 6-7).
    pub attacker_trait: Option<&'a dyn TraitEnable>,
    /// Trait enable acting for the defender's side (step 10).
    pub defender_trait: Option<&'a dyn TraitEnable>,
}

impl<'a> DamageContext<'a> {
    pub fn new(dice: &'a mut Dice) -> Self {
        Self {
            dice,
            attacker_trait: None,
            defender_trait: None,
        }
    }
}

/// Resolves `spec` from `attacker` against `defender`, mutating the
/// defender's shield, HP and death wards.
pub fn resolve(
    attacker: &Combatant,
    defender: &mut Combatant,
    spec: &HitSpec,
    ctx: &mut DamageContext<'_>,
) -> DamageOutcome {
    let hp_before = defender.hp();

    let mut block_factor = 1.0;
    let mut blocked = false;
    if spec.evadable {
        if ctx
            .dice
            .chance(defender.id(), RollContext::Dodge, defender.stat(StatKind::Dodge))
        {
            trace!(target: "battle::damage", attacker = %attacker.id(), defender = %defender.id(), "dodged");
            return DamageOutcome::dodge(attacker.id(), defender.id(), spec.kind, hp_before);
        }
        if ctx
            .dice
            .chance(defender.id(), RollContext::Block, defender.stat(StatKind::Block))
        {
            blocked = true;
            block_factor = 0.5;
        }
    }

    // Crit rolls
    let mut crit_rate = attacker.stat(StatKind::CritRate) + spec.crit_bonus;
    if let Some(enable) = ctx.attacker_trait {
        crit_rate = enable.apply_crit_bonus(crit_rate);
    }
    let crit_rate = crit_rate.min(100);
    let crit_multiplier = CRIT_BASE
        + CRIT_DMG_SCALE
            * attacker
                .stat(StatKind::CritDmg)
                .clamp(0, BattleConfig::CRIT_DMG_CAP) as f64
            / 100.0;

    let mut crits = 0u32;
    let mut misses = 0u32;
    let mut total = 0.0;
    for hit in &spec.hits {
        let mut magnitude = hit.magnitude * block_factor;
        if hit.can_crit && ctx.dice.chance(attacker.id(), RollContext::Crit, crit_rate) {
            crits += 1;
            magnitude *= crit_multiplier;
        } else {
            misses += 1;
        }
        total += magnitude;
    }
    trace!(target: "battle::damage", stage = "hits", total, crits);

    // 1. Additive scalars
    let holy = attacker.stat(StatKind::HolyDamage) as f64;
    let precision = attacker
        .stat(StatKind::Precision)
        .clamp(0, BattleConfig::PRECISION_CAP) as f64;
    let dealt = attacker.stat(StatKind::AllDamageDealt) as f64;
    total *= (1.0 + holy * HOLY_SCALE).max(0.0)
        * (1.0 + precision * PRECISION_SCALE)
        * (1.0 + dealt / 100.0).max(0.0);
    trace!(target: "battle::damage", stage = "additive", total);

    // 2. Conditional modifiers
    let stack = conditional_modifiers(attacker, defender);
    total *= stack.product();
    trace!(target: "battle::damage", stage = "conditional", total, terms = stack.iter().count());

    // 3. Damage-type level
    if let Some(level) = spec.damage_type_level {
        total *= 1.0 + f64::from(level) * DAMAGE_TYPE_STEP;
    }

    // 4. Crit vulnerability
    if crits > 0 {
        total *= 1.0 + defender.stat(StatKind::CritDamageTaken).max(0) as f64 / 100.0;
    }

    // 5. Shrink
    total *= attacker.shrink.dealt_factor() * defender.shrink.received_factor();
    trace!(target: "battle::damage", stage = "shrink", total);

    // 6. Non-crit trait bonus
    if misses > 0 {
        if let Some(enable) = ctx.attacker_trait {
            total += total * enable.non_crit_bonus();
        }
    }

    // 7. Trait conversion
    let mut self_heal = 0;
    if let Some(enable) = ctx.attacker_trait {
        let conversion = enable.convert(total);
        self_heal = conversion.heal.max(0.0).floor() as u64;
        total += conversion.extra.max(0.0);
    }

    // 8. Mitigation
    let dr = defender
        .stat(StatKind::DamageReduction)
        .min(BattleConfig::MITIGATION_CAP) as f64;
    let adr = defender
        .stat(StatKind::AllDamageReduction)
        .min(BattleConfig::MITIGATION_CAP) as f64;
    total *= (1.0 - dr / 100.0) * (1.0 - adr / 100.0);
    let mitigated = total.max(0.0).floor() as u64;
    trace!(target: "battle::damage", stage = "mitigation", mitigated);

    // 9. Shield
    let (absorbed, mut remaining) = defender.absorb(mitigated);

    // 10. Death prevention
    let mut ward_used = false;
    if remaining >= defender.hp() && defender.is_alive() {
        if let Some(enable) = ctx.defender_trait {
            if enable.prevent_death(defender) {
                remaining = defender.hp() - 1;
                ward_used = true;
            }
        }
    }

    // 11. Apply
    let damage = defender.lose_hp(remaining);

    DamageOutcome {
        attacker: attacker.id(),
        defender: defender.id(),
        kind: spec.kind,
        hits: spec.hits.len() as u32,
        crits,
        dodged: false,
        blocked,
        mitigated,
        absorbed,
        damage,
        self_heal,
        ward_used,
        hp_before,
        hp_after: defender.hp(),
        killed: hp_before > 0 && !defender.is_alive(),
    }
}

/// Step 2 terms engaged for this attacker/defender pair.
pub fn conditional_modifiers(attacker: &Combatant, defender: &Combatant) -> MultiplierStack {
    let mut stack = MultiplierStack::new();
    let caps = attacker.capabilities;
    let attacker_hp = attacker.hp();
    let defender_hp = defender.hp();

    if caps.contains(Capabilities::VENOM) && defender.status.has(StatusKind::Poisoned) {
        stack.add(Modifier::Venom, Modifier::VENOM_BONUS);
    }

    if attacker.status.has(StatusKind::BurnSynergy) && defender.status.has(StatusKind::Burning) {
        stack.add(Modifier::BurnSynergy, Modifier::BURN_BONUS);
    }

    if caps.contains(Capabilities::EXECUTE) && attacker_hp > 0 && defender_hp > attacker_hp {
        // floor((d / a - 1) / 0.10) without float rounding at step edges
        let steps = (u128::from(defender_hp - attacker_hp) * 10) / u128::from(attacker_hp);
        let bonus = (steps as f64 * Modifier::EXECUTE_STEP_BONUS).min(Modifier::EXECUTE_CAP);
        stack.add(Modifier::Execute, bonus);
    }

    if caps.contains(Capabilities::DEFIER) && defender.hp_fraction() >= Modifier::DEFIER_HP_FRACTION {
        stack.add(Modifier::Defier, Modifier::DEFIER_BONUS);
    }

    if caps.contains(Capabilities::GIANT_SLAYER) && defender_hp > attacker_hp {
        stack.add(Modifier::GiantSlayer, Modifier::GIANT_SLAYER_BONUS);
    }

    if caps.contains(Capabilities::MAIM) {
        stack.add(Modifier::Maim, (1.0 - defender.hp_fraction()) * Modifier::MAIM_SCALE);
    }

    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::hit::AttackKind;
    use crate::config::BaseStats;
    use crate::control::ControlKind;
    use crate::state::{CombatantId, StatusEffect};
    use crate::stats::{Buff, Lifetime};
    use crate::variants::{TraitEnableKind, build_trait_enable};

    fn combatant(id: CombatantId, base: BaseStats) -> Combatant {
        Combatant::new(id, "c", &base, ControlKind::Fear)
    }

    fn attacker(attack: i64) -> Combatant {
        combatant(
            CombatantId::Hero(0),
            BaseStats {
                hp: 1_000,
                attack,
                ..BaseStats::default()
            },
        )
    }

    fn boss(hp: u64) -> Combatant {
        combatant(
            CombatantId::Boss,
            BaseStats {
                hp,
                ..BaseStats::default()
            },
        )
    }

    #[test]
    fn plain_basic_attack_is_exact() {
        let attacker = attacker(100_000_000);
        let mut defender = boss(10_000_000_000);
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);

        let spec = HitSpec::single(AttackKind::Basic, attacker.attack() * 10.0);
        let outcome = resolve(&attacker, &mut defender, &spec, &mut ctx);

        assert_eq!(outcome.damage, 1_000_000_000);
        assert_eq!(defender.hp(), 9_000_000_000);
        assert_eq!(outcome.crits, 0);
    }

    #[test]
    fn shield_absorbs_before_hp() {
        let attacker = attacker(1);
        let mut defender = boss(1_000_000_000);
        defender.add_shield(100_000_000);
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);

        let spec = HitSpec::single(AttackKind::Basic, 150_000_000.0);
        let outcome = resolve(&attacker, &mut defender, &spec, &mut ctx);

        assert_eq!(outcome.absorbed, 100_000_000);
        assert_eq!(outcome.damage, 50_000_000);
        assert_eq!(defender.shield(), 0);
        assert_eq!(defender.hp(), 950_000_000);
    }

    #[test]
    fn mitigation_caps_apply_independently() {
        let attacker = attacker(1);
        let mut defender = combatant(
            CombatantId::Boss,
            BaseStats {
                hp: 1_000_000,
                damage_reduction: 300,
                all_damage_reduction: 90,
                ..BaseStats::default()
            },
        );
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);

        let outcome = resolve(
            &attacker,
            &mut defender,
            &HitSpec::single(AttackKind::Basic, 1_000.0),
            &mut ctx,
        );
        // 1000 x 0.25 x 0.25
        assert_eq!(outcome.damage, 62);
    }

    #[test]
    fn crit_damage_and_precision_are_capped() {
        let attacker = combatant(
            CombatantId::Hero(0),
            BaseStats {
                hp: 1_000,
                crit_rate: 100,
                crit_dmg: 900,
                precision: 400,
                ..BaseStats::default()
            },
        );
        let mut defender = boss(1_000_000);
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);

        let outcome = resolve(
            &attacker,
            &mut defender,
            &HitSpec::single(AttackKind::Basic, 100.0),
            &mut ctx,
        );
        // 100 x (1.5 + 3.0) x (1 + 150 x 0.003)
        assert_eq!(outcome.crits, 1);
        assert_eq!(outcome.damage, 652);
    }

    #[test]
    fn execute_steps_are_capped() {
        let mut attacker = attacker(1);
        attacker.capabilities = Capabilities::EXECUTE;
        let mut defender = boss(5_000);

        let stack = conditional_modifiers(&attacker, &defender);
        assert!((stack.product() - 2.0).abs() < 1e-12);

        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);
        let outcome = resolve(
            &attacker,
            &mut defender,
            &HitSpec::single(AttackKind::Basic, 100.0),
            &mut ctx,
        );
        assert_eq!(outcome.damage, 200);
    }

    #[test]
    fn execute_scales_in_tenth_steps() {
        let mut attacker = attacker(1);
        attacker.capabilities = Capabilities::EXECUTE;
        // 1_250 / 1_000 - 1 = 0.25 -> two steps
        let defender = boss(1_250);
        let stack = conditional_modifiers(&attacker, &defender);
        assert!((stack.product() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn burn_bonus_needs_synergy_window() {
        let mut attacker = attacker(1);
        let mut defender = boss(100);
        defender.status.add(StatusEffect {
            kind: StatusKind::Burning,
            rounds: 2,
            magnitude: 1,
            source: CombatantId::Hero(0),
        });
        assert!(conditional_modifiers(&attacker, &defender).is_empty());

        attacker.status.add(StatusEffect {
            kind: StatusKind::BurnSynergy,
            rounds: 2,
            magnitude: 0,
            source: CombatantId::Hero(0),
        });
        assert!(conditional_modifiers(&attacker, &defender).contains(Modifier::BurnSynergy));
    }

    #[test]
    fn dodge_skips_everything() {
        let attacker = attacker(1);
        let mut defender = combatant(
            CombatantId::Hero(1),
            BaseStats {
                hp: 500,
                dodge: 100,
                ..BaseStats::default()
            },
        );
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);

        let spec = HitSpec::single(AttackKind::Counter, 400.0).evadable();
        let outcome = resolve(&attacker, &mut defender, &spec, &mut ctx);
        assert!(outcome.dodged);
        assert_eq!(defender.hp(), 500);
    }

    #[test]
    fn block_halves_hits() {
        let attacker = attacker(1);
        let mut defender = combatant(
            CombatantId::Hero(1),
            BaseStats {
                hp: 500,
                block: 100,
                ..BaseStats::default()
            },
        );
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);

        let spec = HitSpec::single(AttackKind::Counter, 400.0).evadable();
        let outcome = resolve(&attacker, &mut defender, &spec, &mut ctx);
        assert!(outcome.blocked);
        assert_eq!(outcome.damage, 200);
    }

    #[test]
    fn death_ward_clamps_to_one_hp() {
        let attacker = attacker(1);
        let mut defender = combatant(
            CombatantId::Hero(1),
            BaseStats {
                hp: 500,
                ..BaseStats::default()
            },
        );
        defender.grant_death_wards(1);
        let undying = build_trait_enable(TraitEnableKind::Undying);
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);
        ctx.defender_trait = Some(undying.as_ref());

        let spec = HitSpec::single(AttackKind::Basic, 10_000.0);
        let first = resolve(&attacker, &mut defender, &spec, &mut ctx);
        assert!(first.ward_used);
        assert_eq!(defender.hp(), 1);

        let second = resolve(&attacker, &mut defender, &spec, &mut ctx);
        assert!(second.killed);
        assert_eq!(defender.hp(), 0);
    }

    #[test]
    fn steadfast_rewards_non_crits() {
        let attacker = attacker(1);
        let mut defender = boss(1_000_000);
        let steadfast = build_trait_enable(TraitEnableKind::Steadfast);
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);
        ctx.attacker_trait = Some(steadfast.as_ref());

        let outcome = resolve(
            &attacker,
            &mut defender,
            &HitSpec::single(AttackKind::Basic, 1_000.0),
            &mut ctx,
        );
        assert_eq!(outcome.damage, 1_300);
    }

    fn hit_for(defender: &mut Combatant, enable: Option<&dyn TraitEnable>) -> DamageOutcome {
        let attacker = attacker(1);
        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);
        ctx.attacker_trait = enable;
        resolve(
            &attacker,
            defender,
            &HitSpec::single(AttackKind::Basic, 1_000.0),
            &mut ctx,
        )
    }

    #[test]
    fn negative_reduction_amplifies_damage() {
        let mut plain = boss(1_000_000);
        let mut sundered = boss(1_000_000);
        sundered.apply_buff(
            Buff::attribute("boss_sunder", StatKind::DamageReduction, -10, Lifetime::rounds(2)),
            0,
        );
        sundered.apply_buff(
            Buff::attribute("armor_break", StatKind::AllDamageReduction, -20, Lifetime::rounds(2)),
            0,
        );
        assert_eq!(sundered.stat(StatKind::DamageReduction), -10);

        assert_eq!(hit_for(&mut plain, None).damage, 1_000);
        // 1000 x 1.10 x 1.20
        assert_eq!(hit_for(&mut sundered, None).damage, 1_320);
    }

    #[test]
    fn ruthless_pushes_crit_chance_to_certainty() {
        let attacker = combatant(
            CombatantId::Hero(0),
            BaseStats {
                hp: 1_000,
                crit_rate: 85,
                ..BaseStats::default()
            },
        );
        let mut defender = boss(1_000_000);
        let ruthless = build_trait_enable(TraitEnableKind::Ruthless);
        assert_eq!(ruthless.apply_crit_bonus(85), 100);

        let mut dice = Dice::seeded(1);
        let mut ctx = DamageContext::new(&mut dice);
        ctx.attacker_trait = Some(ruthless.as_ref());
        let spec = HitSpec::repeated(AttackKind::Basic, 100.0, 4);
        let outcome = resolve(&attacker, &mut defender, &spec, &mut ctx);

        assert_eq!(outcome.crits, 4);
        assert_eq!(outcome.damage, 600);
    }

    #[test]
    fn vampiric_heals_without_adding_damage() {
        let vampiric = build_trait_enable(TraitEnableKind::Vampiric);
        let outcome = hit_for(&mut boss(1_000_000), Some(vampiric.as_ref()));
        assert_eq!(outcome.damage, 1_000);
        assert_eq!(outcome.self_heal, 100);
    }

    #[test]
    fn wrath_adds_damage_before_mitigation() {
        let wrath = build_trait_enable(TraitEnableKind::Wrath);
        let mut defender = combatant(
            CombatantId::Boss,
            BaseStats {
                hp: 1_000_000,
                damage_reduction: 50,
                ..BaseStats::default()
            },
        );
        let outcome = hit_for(&mut defender, Some(wrath.as_ref()));
        // 1000 x 1.15 x 0.5
        assert_eq!(outcome.damage, 575);
        assert_eq!(outcome.self_heal, 0);
    }
}
