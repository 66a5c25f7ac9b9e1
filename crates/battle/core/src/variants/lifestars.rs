//! Per-hero lifestars.

use std::collections::BTreeSet;

use crate::engine::Effect;
use crate::state::CombatantId;

use super::{HookContext, Lifestar, LifestarKind, percent_of};

pub fn build_lifestar(kind: LifestarKind) -> Box<dyn Lifestar> {
    match kind {
        LifestarKind::Sentinel => Box::new(Sentinel),
        LifestarKind::Vigil => Box::new(Vigil::default()),
        LifestarKind::Bloom => Box::new(Bloom),
    }
}

/// Energy for the owner whenever an ally is hit.
#[derive(Debug)]
pub struct Sentinel;

impl Lifestar for Sentinel {
    fn kind(&self) -> LifestarKind {
        LifestarKind::Sentinel
    }

    fn on_ally_hit(&mut self, ctx: &HookContext<'_>, _ally: CombatantId) -> Vec<Effect> {
        vec![Effect::GainEnergy {
            target: ctx.owner_id(),
            amount: 10,
        }]
    }
}

/// Shields a struck ally, once per ally per round.
#[derive(Debug, Default)]
pub struct Vigil {
    shielded: BTreeSet<CombatantId>,
}

impl Vigil {
    const SHIELD_PERCENT: u64 = 3;
}

impl Lifestar for Vigil {
    fn kind(&self) -> LifestarKind {
        LifestarKind::Vigil
    }

    fn on_ally_hit(&mut self, ctx: &HookContext<'_>, ally: CombatantId) -> Vec<Effect> {
        if !self.shielded.insert(ally) {
            return Vec::new();
        }
        vec![Effect::Shield {
            target: ally,
            amount: percent_of(ctx.owner.max_hp(), Self::SHIELD_PERCENT),
        }]
    }

    fn apply_end_of_round(&mut self, _ctx: &HookContext<'_>) -> Vec<Effect> {
        self.shielded.clear();
        Vec::new()
    }
}

/// Heals the owner at end of round.
#[derive(Debug)]
pub struct Bloom;

impl Bloom {
    const HEAL_PERCENT: u64 = 5;
}

impl Lifestar for Bloom {
    fn kind(&self) -> LifestarKind {
        LifestarKind::Bloom
    }

    fn apply_end_of_round(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        vec![Effect::Heal {
            target: ctx.owner_id(),
            amount: percent_of(ctx.owner.max_hp(), Self::HEAL_PERCENT),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::fixtures::roster;

    #[test]
    fn sentinel_feeds_the_owner_on_every_ally_hit() {
        let state = roster(3);
        let ctx = HookContext::new(&state, CombatantId::Hero(0)).unwrap();
        let mut sentinel = build_lifestar(LifestarKind::Sentinel);

        for ally in [CombatantId::Hero(1), CombatantId::Hero(1), CombatantId::Hero(2)] {
            assert_eq!(
                sentinel.on_ally_hit(&ctx, ally),
                vec![Effect::GainEnergy {
                    target: CombatantId::Hero(0),
                    amount: 10
                }]
            );
        }
        assert!(sentinel.apply_end_of_round(&ctx).is_empty());
    }

    #[test]
    fn vigil_shields_each_ally_once_per_round() {
        let state = roster(3);
        let ctx = HookContext::new(&state, CombatantId::Hero(0)).unwrap();
        let mut vigil = build_lifestar(LifestarKind::Vigil);
        let shield = |target| {
            vec![Effect::Shield {
                target,
                amount: 30,
            }]
        };

        assert_eq!(vigil.on_ally_hit(&ctx, CombatantId::Hero(1)), shield(CombatantId::Hero(1)));
        assert!(vigil.on_ally_hit(&ctx, CombatantId::Hero(1)).is_empty());
        assert_eq!(vigil.on_ally_hit(&ctx, CombatantId::Hero(2)), shield(CombatantId::Hero(2)));

        assert!(vigil.apply_end_of_round(&ctx).is_empty());
        assert_eq!(vigil.on_ally_hit(&ctx, CombatantId::Hero(1)), shield(CombatantId::Hero(1)));
    }

    #[test]
    fn bloom_heals_the_owner_at_end_of_round() {
        let state = roster(2);
        let ctx = HookContext::new(&state, CombatantId::Hero(1)).unwrap();
        let mut bloom = build_lifestar(LifestarKind::Bloom);

        assert!(bloom.on_ally_hit(&ctx, CombatantId::Hero(0)).is_empty());
        assert_eq!(
            bloom.apply_end_of_round(&ctx),
            vec![Effect::Heal {
                target: CombatantId::Hero(1),
                amount: 50
            }]
        );
    }
}
