//! Team artifacts. Each is bound to one bearer.

use crate::engine::Effect;
use crate::state::{BattleState, Capabilities, CombatantId, StatusEffect, StatusKind};
use crate::stats::{Buff, Lifetime, StatKind};

use super::{Artifact, ArtifactKind, percent_of, scaled};

pub fn build_artifact(kind: ArtifactKind, bearer: CombatantId) -> Box<dyn Artifact> {
    match kind {
        ArtifactKind::ExecutionersBlade => Box::new(ExecutionersBlade { bearer }),
        ArtifactKind::DefiersBanner => Box::new(DefiersBanner { bearer }),
        ArtifactKind::VenomFang => Box::new(VenomFang { bearer }),
        ArtifactKind::EmberHeart => Box::new(EmberHeart { bearer }),
        ArtifactKind::AegisRelic => Box::new(AegisRelic { bearer }),
        ArtifactKind::TimewornHourglass => Box::new(TimewornHourglass { bearer }),
    }
}

/// Bearer gains execute and giant-slayer.
#[derive(Debug)]
pub struct ExecutionersBlade {
    bearer: CombatantId,
}

impl Artifact for ExecutionersBlade {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ExecutionersBlade
    }

    fn bearer(&self) -> CombatantId {
        self.bearer
    }

    fn apply_start_of_battle(&mut self, _state: &BattleState) -> Vec<Effect> {
        vec![Effect::GrantCapabilities {
            target: self.bearer,
            flags: Capabilities::EXECUTE | Capabilities::GIANT_SLAYER,
        }]
    }
}

/// Every hero gains defier.
#[derive(Debug)]
pub struct DefiersBanner {
    bearer: CombatantId,
}

impl Artifact for DefiersBanner {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::DefiersBanner
    }

    fn bearer(&self) -> CombatantId {
        self.bearer
    }

    fn apply_start_of_battle(&mut self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .map(|hero| Effect::GrantCapabilities {
                target: hero.id(),
                flags: Capabilities::DEFIER,
            })
            .collect()
    }
}

/// Bearer gains venom and poisons the boss with each active skill.
#[derive(Debug)]
pub struct VenomFang {
    bearer: CombatantId,
}

impl VenomFang {
    const POISON_MULTIPLIER: f64 = 2.0;
    const POISON_ROUNDS: u32 = 2;
}

impl Artifact for VenomFang {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::VenomFang
    }

    fn bearer(&self) -> CombatantId {
        self.bearer
    }

    fn apply_start_of_battle(&mut self, _state: &BattleState) -> Vec<Effect> {
        vec![Effect::GrantCapabilities {
            target: self.bearer,
            flags: Capabilities::VENOM,
        }]
    }

    fn on_active_skill(&mut self, state: &BattleState, user: CombatantId) -> Vec<Effect> {
        let Some(bearer) = state.get(self.bearer).filter(|_| user == self.bearer) else {
            return Vec::new();
        };
        vec![Effect::ApplyStatus {
            target: CombatantId::Boss,
            status: StatusEffect {
                kind: StatusKind::Poisoned,
                rounds: Self::POISON_ROUNDS,
                magnitude: scaled(bearer, Self::POISON_MULTIPLIER),
                source: self.bearer,
            },
        }]
    }
}

/// Bearer's active skills burn the boss and open a burn-synergy window.
#[derive(Debug)]
pub struct EmberHeart {
    bearer: CombatantId,
}

impl EmberHeart {
    const BURN_MULTIPLIER: f64 = 2.0;
    const ROUNDS: u32 = 2;
}

impl Artifact for EmberHeart {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::EmberHeart
    }

    fn bearer(&self) -> CombatantId {
        self.bearer
    }

    fn on_active_skill(&mut self, state: &BattleState, user: CombatantId) -> Vec<Effect> {
        let Some(bearer) = state.get(self.bearer).filter(|_| user == self.bearer) else {
            return Vec::new();
        };
        vec![
            Effect::ApplyStatus {
                target: CombatantId::Boss,
                status: StatusEffect {
                    kind: StatusKind::Burning,
                    rounds: Self::ROUNDS,
                    magnitude: scaled(bearer, Self::BURN_MULTIPLIER),
                    source: self.bearer,
                },
            },
            Effect::ApplyStatus {
                target: self.bearer,
                status: StatusEffect {
                    kind: StatusKind::BurnSynergy,
                    rounds: Self::ROUNDS,
                    magnitude: 0,
                    source: self.bearer,
                },
            },
        ]
    }
}

/// Shields the bearer every round.
#[derive(Debug)]
pub struct AegisRelic {
    bearer: CombatantId,
}

impl AegisRelic {
    const SHIELD_PERCENT: u64 = 8;
}

impl Artifact for AegisRelic {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::AegisRelic
    }

    fn bearer(&self) -> CombatantId {
        self.bearer
    }

    fn apply_end_of_round(&mut self, state: &BattleState) -> Vec<Effect> {
        match state.get(self.bearer) {
            Some(bearer) if bearer.is_alive() => vec![Effect::Shield {
                target: self.bearer,
                amount: percent_of(bearer.max_hp(), Self::SHIELD_PERCENT),
            }],
            _ => Vec::new(),
        }
    }
}

/// Bearer speed, and energy for the whole team every round.
#[derive(Debug)]
pub struct TimewornHourglass {
    bearer: CombatantId,
}

impl TimewornHourglass {
    const SPEED: i64 = 20;
    const ENERGY: u32 = 10;
}

impl Artifact for TimewornHourglass {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::TimewornHourglass
    }

    fn bearer(&self) -> CombatantId {
        self.bearer
    }

    fn apply_start_of_battle(&mut self, _state: &BattleState) -> Vec<Effect> {
        vec![Effect::buff(
            self.bearer,
            Buff::attribute("hourglass_tempo", StatKind::Speed, Self::SPEED, Lifetime::Permanent)
                .replacing(),
        )]
    }

    fn apply_end_of_round(&mut self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .map(|hero| Effect::GainEnergy {
                target: hero.id(),
                amount: Self::ENERGY,
            })
            .collect()
    }
}
