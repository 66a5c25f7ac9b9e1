//! End-of-round cleanses. Each variant handles exactly one family.

use crate::engine::Effect;
use crate::state::BattleState;

use super::{Purify, PurifyKind};

pub fn build_purify(kind: PurifyKind) -> Box<dyn Purify> {
    match kind {
        PurifyKind::ControlCleanse => Box::new(ControlCleanse),
        PurifyKind::AttributeCleanse => Box::new(AttributeCleanse),
        PurifyKind::CurseCleanse => Box::new(CurseCleanse),
    }
}

/// One random affliction off the first afflicted hero.
#[derive(Debug)]
pub struct ControlCleanse;

impl Purify for ControlCleanse {
    fn kind(&self) -> PurifyKind {
        PurifyKind::ControlCleanse
    }

    fn apply_end_of_round(&mut self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .find(|hero| hero.controls.any_active())
            .map(|hero| Effect::PurifyControl { target: hero.id() })
            .into_iter()
            .collect()
    }
}

/// First negative attribute record held by a hero.
#[derive(Debug)]
pub struct AttributeCleanse;

impl Purify for AttributeCleanse {
    fn kind(&self) -> PurifyKind {
        PurifyKind::AttributeCleanse
    }

    fn apply_end_of_round(&mut self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .find_map(|hero| {
                hero.buffs()
                    .first_reduction()
                    .map(|key| Effect::RemoveBuff { target: hero.id(), key })
            })
            .into_iter()
            .collect()
    }
}

/// All curse stacks off the most-cursed hero.
#[derive(Debug)]
pub struct CurseCleanse;

impl Purify for CurseCleanse {
    fn kind(&self) -> PurifyKind {
        PurifyKind::CurseCleanse
    }

    fn apply_end_of_round(&mut self, state: &BattleState) -> Vec<Effect> {
        let mut target = None;
        for hero in state.living_heroes() {
            let stacks = hero.curse_stacks();
            if stacks > 0 && target.is_none_or(|(_, best)| stacks > best) {
                target = Some((hero.id(), stacks));
            }
        }
        target
            .map(|(target, _)| Effect::ClearCurse { target })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlKind;
    use crate::state::CombatantId;
    use crate::stats::{Buff, Lifetime, StatKind};
    use crate::variants::fixtures::roster;

    #[test]
    fn control_cleanse_targets_the_first_afflicted_hero() {
        let mut state = roster(3);
        let mut purify = build_purify(PurifyKind::ControlCleanse);
        assert!(purify.apply_end_of_round(&state).is_empty());

        state
            .get_mut(CombatantId::Hero(2))
            .unwrap()
            .controls
            .afflict(ControlKind::Silence, 2);
        assert_eq!(
            purify.apply_end_of_round(&state),
            vec![Effect::PurifyControl {
                target: CombatantId::Hero(2)
            }]
        );
    }

    #[test]
    fn attribute_cleanse_picks_reductions_only() {
        let mut state = roster(2);
        let mut purify = build_purify(PurifyKind::AttributeCleanse);

        let hero = state.get_mut(CombatantId::Hero(0)).unwrap();
        hero.apply_buff(
            Buff::skill("warden_mark", StatKind::DamageReduction, -20, Lifetime::rounds(2)),
            0,
        );
        hero.apply_buff(
            Buff::attribute("chrono_haste", StatKind::Speed, 10, Lifetime::rounds(2)),
            0,
        );
        assert!(purify.apply_end_of_round(&state).is_empty());

        let sundered = state.get_mut(CombatantId::Hero(1)).unwrap();
        let key = match sundered.apply_buff(
            Buff::attribute("boss_sunder", StatKind::DamageReduction, -10, Lifetime::rounds(2)),
            0,
        ) {
            crate::stats::ApplyOutcome::Applied { key, .. } => key,
            other => panic!("expected applied, got {other:?}"),
        };
        assert_eq!(
            purify.apply_end_of_round(&state),
            vec![Effect::RemoveBuff {
                target: CombatantId::Hero(1),
                key
            }]
        );
    }

    #[test]
    fn curse_cleanse_picks_the_most_cursed_hero() {
        let mut state = roster(3);
        let mut purify = build_purify(PurifyKind::CurseCleanse);
        assert!(purify.apply_end_of_round(&state).is_empty());

        state.get_mut(CombatantId::Hero(0)).unwrap().add_curse(1);
        state.get_mut(CombatantId::Hero(1)).unwrap().add_curse(3);
        state.get_mut(CombatantId::Hero(2)).unwrap().add_curse(3);
        assert_eq!(
            purify.apply_end_of_round(&state),
            vec![Effect::ClearCurse {
                target: CombatantId::Hero(1)
            }]
        );
    }
}
