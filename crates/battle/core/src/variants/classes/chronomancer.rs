use crate::combat::{AttackKind, HitSpec};
use crate::engine::Effect;
use crate::stats::{Buff, Lifetime, StatKind};
use crate::variants::{
    ClassKind, HeroClass, HookContext, ResourceMeter, TeamEvent, TransitionAttempt, basic_spec,
    team_buff,
};

/// Builds a transition meter from every active skill on the team and
/// releases it as a heavy strike plus energy for the others.
#[derive(Debug, Default)]
pub struct Chronomancer {
    meter: ResourceMeter,
}

impl Chronomancer {
    const BASIC_CHARGE: u32 = 10;
    const ACTIVE_CHARGE: u32 = 20;
    const ALLY_ACTIVE_CHARGE: u32 = 25;
    const ACTIVE_MULTIPLIER: f64 = 14.0;
    const HASTE: i64 = 10;
    const HASTE_ROUNDS: u32 = 2;
    const TRANSITION_MULTIPLIER: f64 = 25.0;
    const TRANSITION_LEVEL: u32 = 3;
    const TRANSITION_ENERGY: u32 = 30;
}

impl HeroClass for Chronomancer {
    fn kind(&self) -> ClassKind {
        ClassKind::Chronomancer
    }

    fn basic_attack(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        self.meter.charge(Self::BASIC_CHARGE);
        vec![Effect::strike(ctx.owner_id(), ctx.boss().id(), basic_spec(ctx))]
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        self.meter.charge(Self::ACTIVE_CHARGE);
        let mut effects = vec![Effect::strike(
            ctx.owner_id(),
            ctx.boss().id(),
            ctx.strike(AttackKind::Active, Self::ACTIVE_MULTIPLIER),
        )];
        effects.extend(team_buff(
            ctx.state,
            &Buff::attribute("chrono_haste", StatKind::Speed, Self::HASTE, Lifetime::rounds(Self::HASTE_ROUNDS)),
        ));
        effects
    }

    fn passive_trigger(&mut self, ctx: &HookContext<'_>, event: &TeamEvent) -> Vec<Effect> {
        if let TeamEvent::AllyActive { ally } = event {
            if *ally != ctx.owner_id() {
                self.meter.charge(Self::ALLY_ACTIVE_CHARGE);
            }
        }
        Vec::new()
    }

    fn release_transition_skill(&mut self, ctx: &HookContext<'_>) -> TransitionAttempt {
        if !self.meter.consume() {
            return TransitionAttempt::Insufficient {
                current: self.meter.value(),
                threshold: self.meter.threshold(),
            };
        }

        let spec = HitSpec::single(
            AttackKind::Transition,
            ctx.owner.attack() * Self::TRANSITION_MULTIPLIER,
        )
        .with_damage_type_level(Self::TRANSITION_LEVEL);

        let mut effects = vec![Effect::strike(ctx.owner_id(), ctx.boss().id(), spec)];
        effects.extend(ctx.allies().map(|ally| Effect::GainEnergy {
            target: ally.id(),
            amount: Self::TRANSITION_ENERGY,
        }));
        TransitionAttempt::Released(effects)
    }

    fn meter(&self) -> Option<&ResourceMeter> {
        Some(&self.meter)
    }
}
