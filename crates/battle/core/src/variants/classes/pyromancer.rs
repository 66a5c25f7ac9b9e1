use crate::combat::AttackKind;
use crate::engine::Effect;
use crate::state::{StatusEffect, StatusKind};
use crate::variants::{ClassKind, HeroClass, HookContext, scaled};

/// Burns the boss and opens a burn-synergy window for the whole team.
#[derive(Debug, Default)]
pub struct Pyromancer;

impl Pyromancer {
    const ACTIVE_MULTIPLIER: f64 = 16.0;
    const BURN_MULTIPLIER: f64 = 4.0;
    const BURN_ROUNDS: u32 = 2;
    const SYNERGY_ROUNDS: u32 = 2;
    const KINDLING_ENERGY: u32 = 10;
}

impl HeroClass for Pyromancer {
    fn kind(&self) -> ClassKind {
        ClassKind::Pyromancer
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        let owner = ctx.owner_id();
        let boss = ctx.boss().id();

        let mut effects = vec![
            Effect::strike(owner, boss, ctx.strike(AttackKind::Active, Self::ACTIVE_MULTIPLIER)),
            Effect::ApplyStatus {
                target: boss,
                status: StatusEffect {
                    kind: StatusKind::Burning,
                    rounds: Self::BURN_ROUNDS,
                    magnitude: scaled(ctx.owner, Self::BURN_MULTIPLIER),
                    source: owner,
                },
            },
        ];
        effects.extend(ctx.state.living_heroes().map(|hero| Effect::ApplyStatus {
            target: hero.id(),
            status: StatusEffect {
                kind: StatusKind::BurnSynergy,
                rounds: Self::SYNERGY_ROUNDS,
                magnitude: 0,
                source: owner,
            },
        }));
        effects
    }

    fn end_of_round(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        if !ctx.boss().status.has(StatusKind::Burning) {
            return Vec::new();
        }
        vec![Effect::GainEnergy {
            target: ctx.owner_id(),
            amount: Self::KINDLING_ENERGY,
        }]
    }
}
