use crate::combat::{AttackKind, DamageOutcome, HitSpec};
use crate::engine::Effect;
use crate::state::{Capabilities, StatusEffect, StatusKind};
use crate::stats::{Buff, Lifetime, StatKind};
use crate::variants::{ClassKind, HeroClass, HookContext, scaled};

/// Multi-hit striker that poisons and snowballs crit chance.
#[derive(Debug, Default)]
pub struct Assassin;

impl Assassin {
    const HITS: usize = 3;
    const HIT_MULTIPLIER: f64 = 7.0;
    const POISON_MULTIPLIER: f64 = 3.0;
    const POISON_ROUNDS: u32 = 2;
    const MOMENTUM_CRIT: i64 = 5;
    const MOMENTUM_ROUNDS: u32 = 2;
}

impl HeroClass for Assassin {
    fn kind(&self) -> ClassKind {
        ClassKind::Assassin
    }

    fn start_of_battle(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        vec![Effect::GrantCapabilities {
            target: ctx.owner_id(),
            flags: Capabilities::EXECUTE | Capabilities::MAIM,
        }]
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        let boss = ctx.boss().id();
        let spec = HitSpec::repeated(
            AttackKind::Active,
            ctx.owner.attack() * Self::HIT_MULTIPLIER,
            Self::HITS,
        );
        vec![
            Effect::strike(ctx.owner_id(), boss, spec),
            Effect::ApplyStatus {
                target: boss,
                status: StatusEffect {
                    kind: StatusKind::Poisoned,
                    rounds: Self::POISON_ROUNDS,
                    magnitude: scaled(ctx.owner, Self::POISON_MULTIPLIER),
                    source: ctx.owner_id(),
                },
            },
        ]
    }

    fn post_attack(&mut self, ctx: &HookContext<'_>, outcome: &DamageOutcome) -> Vec<Effect> {
        if !outcome.kind.is_real() || !outcome.any_crit() {
            return Vec::new();
        }
        vec![Effect::buff(
            ctx.owner_id(),
            Buff::attribute(
                "assassin_momentum",
                StatKind::CritRate,
                Self::MOMENTUM_CRIT,
                Lifetime::rounds(Self::MOMENTUM_ROUNDS),
            ),
        )]
    }
}
