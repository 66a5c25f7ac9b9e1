use crate::combat::{AttackKind, DamageOutcome};
use crate::engine::Effect;
use crate::stats::{Buff, Lifetime, StatKind};
use crate::variants::{ClassKind, HeroClass, HookContext, percent_of, team_buff};

/// Team damage reduction, shields on active, and a one-time defensive burst
/// when HP first drops below half.
#[derive(Debug, Default)]
pub struct Paladin {
    bulwark_spent: bool,
}

impl Paladin {
    const AURA_DR: i64 = 10;
    const ACTIVE_MULTIPLIER: f64 = 18.0;
    const ACTIVE_SHIELD_PERCENT: u64 = 5;
    const BULWARK_SHIELD_PERCENT: u64 = 30;
    const BULWARK_DR: i64 = 20;
    const BULWARK_ROUNDS: u32 = 3;
}

impl HeroClass for Paladin {
    fn kind(&self) -> ClassKind {
        ClassKind::Paladin
    }

    fn start_of_battle(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        team_buff(
            ctx.state,
            &Buff::skill("paladin_aura", StatKind::DamageReduction, Self::AURA_DR, Lifetime::Permanent),
        )
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        let spec = ctx
            .strike(AttackKind::Active, Self::ACTIVE_MULTIPLIER)
            .with_damage_type_level(1);
        let shield = percent_of(ctx.owner.max_hp(), Self::ACTIVE_SHIELD_PERCENT);

        let mut effects = vec![Effect::strike(ctx.owner_id(), ctx.boss().id(), spec)];
        effects.extend(ctx.state.living_heroes().map(|hero| Effect::Shield {
            target: hero.id(),
            amount: shield,
        }));
        effects
    }

    fn on_receive_damage(&mut self, ctx: &HookContext<'_>, hit: &DamageOutcome) -> Vec<Effect> {
        let max = ctx.owner.max_hp();
        let crossed = hit.hp_before.saturating_mul(2) >= max
            && hit.hp_after.saturating_mul(2) < max
            && hit.hp_after > 0;
        if self.bulwark_spent || !crossed {
            return Vec::new();
        }

        self.bulwark_spent = true;
        let owner = ctx.owner_id();
        vec![
            Effect::Shield {
                target: owner,
                amount: percent_of(max, Self::BULWARK_SHIELD_PERCENT),
            },
            Effect::buff(
                owner,
                Buff::attribute(
                    "paladin_bulwark",
                    StatKind::DamageReduction,
                    Self::BULWARK_DR,
                    Lifetime::rounds(Self::BULWARK_ROUNDS),
                ),
            ),
        ]
    }
}
