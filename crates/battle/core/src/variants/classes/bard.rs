use crate::combat::AttackKind;
use crate::engine::Effect;
use crate::stats::{Buff, Lifetime, StatKind};
use crate::variants::{ClassKind, HeroClass, HookContext, TeamEvent, team_buff};

/// Precision aura, shrink on the boss, and holy damage for allies who cast.
#[derive(Debug, Default)]
pub struct Bard;

impl Bard {
    const FOCUS_PRECISION: i64 = 30;
    const ACTIVE_MULTIPLIER: f64 = 12.0;
    const SHRINK_ROUNDS: u32 = 2;
    const INSPIRATION_HOLY: i64 = 20;
    const INSPIRATION_ROUNDS: u32 = 2;
}

impl HeroClass for Bard {
    fn kind(&self) -> ClassKind {
        ClassKind::Bard
    }

    fn start_of_battle(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        team_buff(
            ctx.state,
            &Buff::attribute("bard_focus", StatKind::Precision, Self::FOCUS_PRECISION, Lifetime::Permanent),
        )
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        let boss = ctx.boss().id();
        vec![
            Effect::strike(ctx.owner_id(), boss, ctx.strike(AttackKind::Active, Self::ACTIVE_MULTIPLIER)),
            Effect::Shrink {
                target: boss,
                rounds: Self::SHRINK_ROUNDS,
            },
        ]
    }

    fn passive_trigger(&mut self, ctx: &HookContext<'_>, event: &TeamEvent) -> Vec<Effect> {
        match event {
            TeamEvent::AllyActive { ally } if *ally != ctx.owner_id() => vec![Effect::buff(
                *ally,
                Buff::attribute(
                    "bard_inspiration",
                    StatKind::HolyDamage,
                    Self::INSPIRATION_HOLY,
                    Lifetime::rounds(Self::INSPIRATION_ROUNDS),
                ),
            )],
            _ => Vec::new(),
        }
    }
}
