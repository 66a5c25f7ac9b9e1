//! Team-wide trait enables hooked into the damage pipeline.

use crate::engine::Effect;
use crate::state::{BattleState, Combatant};

use super::{TraitEnable, TraitEnableKind};

/// Step 7 split of the running total.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Conversion {
    /// Heal owed to the attacker.
    pub heal: f64,
    /// Damage added to the running total.
    pub extra: f64,
}

pub fn build_trait_enable(kind: TraitEnableKind) -> Box<dyn TraitEnable> {
    match kind {
        TraitEnableKind::Ruthless => Box::new(Ruthless),
        TraitEnableKind::Steadfast => Box::new(Steadfast),
        TraitEnableKind::Vampiric => Box::new(Vampiric),
        TraitEnableKind::Wrath => Box::new(Wrath),
        TraitEnableKind::Undying => Box::new(Undying),
    }
}

#[derive(Debug)]
pub struct Ruthless;

impl Ruthless {
    const CRIT_BONUS: i64 = 15;
}

impl TraitEnable for Ruthless {
    fn kind(&self) -> TraitEnableKind {
        TraitEnableKind::Ruthless
    }

    fn apply_crit_bonus(&self, crit_rate: i64) -> i64 {
        crit_rate + Self::CRIT_BONUS
    }
}

#[derive(Debug)]
pub struct Steadfast;

impl TraitEnable for Steadfast {
    fn kind(&self) -> TraitEnableKind {
        TraitEnableKind::Steadfast
    }

    fn non_crit_bonus(&self) -> f64 {
        0.30
    }
}

#[derive(Debug)]
pub struct Vampiric;

impl TraitEnable for Vampiric {
    fn kind(&self) -> TraitEnableKind {
        TraitEnableKind::Vampiric
    }

    fn convert(&self, running: f64) -> Conversion {
        Conversion {
            heal: running * 0.10,
            extra: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct Wrath;

impl TraitEnable for Wrath {
    fn kind(&self) -> TraitEnableKind {
        TraitEnableKind::Wrath
    }

    fn convert(&self, running: f64) -> Conversion {
        Conversion {
            heal: 0.0,
            extra: running * 0.15,
        }
    }
}

/// One death ward per hero.
#[derive(Debug)]
pub struct Undying;

impl Undying {
    const WARDS: u32 = 1;
}

impl TraitEnable for Undying {
    fn kind(&self) -> TraitEnableKind {
        TraitEnableKind::Undying
    }

    fn apply_start_of_battle(&self, state: &BattleState) -> Vec<Effect> {
        state
            .living_heroes()
            .map(|hero| Effect::GrantDeathWards {
                target: hero.id(),
                uses: Self::WARDS,
            })
            .collect()
    }

    fn prevent_death(&self, defender: &mut Combatant) -> bool {
        defender.use_death_ward()
    }
}
