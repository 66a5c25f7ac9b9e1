use crate::combat::{AttackKind, DamageOutcome};
use crate::engine::Effect;
use crate::stats::{Buff, Lifetime, StatKind};
use crate::variants::{ClassKind, HeroClass, HookContext, team_buff};

/// Control-resistance aura, calamity pressure on the boss, and retaliation.
#[derive(Debug, Default)]
pub struct Warden;

impl Warden {
    const RESOLVE: i64 = 15;
    const ACTIVE_MULTIPLIER: f64 = 12.0;
    const ACTIVE_CALAMITY: u32 = 2;
    const MARK_CRIT_TAKEN: i64 = 20;
    const MARK_ROUNDS: u32 = 2;
    const RETALIATION_MULTIPLIER: f64 = 3.0;
}

impl HeroClass for Warden {
    fn kind(&self) -> ClassKind {
        ClassKind::Warden
    }

    fn start_of_battle(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        team_buff(
            ctx.state,
            &Buff::attribute("warden_resolve", StatKind::CtrlImmunity, Self::RESOLVE, Lifetime::Permanent),
        )
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        let boss = ctx.boss().id();
        vec![
            Effect::strike(ctx.owner_id(), boss, ctx.strike(AttackKind::Active, Self::ACTIVE_MULTIPLIER)),
            Effect::AddCalamity {
                target: boss,
                stacks: Self::ACTIVE_CALAMITY,
            },
            Effect::buff(
                boss,
                Buff::skill(
                    "warden_mark",
                    StatKind::CritDamageTaken,
                    Self::MARK_CRIT_TAKEN,
                    Lifetime::rounds(Self::MARK_ROUNDS),
                ),
            ),
        ]
    }

    fn on_receive_damage(&mut self, ctx: &HookContext<'_>, hit: &DamageOutcome) -> Vec<Effect> {
        if !hit.attacker.is_boss() || !ctx.owner.is_alive() {
            return Vec::new();
        }
        vec![Effect::strike(
            ctx.owner_id(),
            hit.attacker,
            ctx.strike(AttackKind::Retaliation, Self::RETALIATION_MULTIPLIER),
        )]
    }
}
