//! Ability variants: classes, artifacts, companions, trait enables, purify
//! and lifestars.
//!
//! Every variant family is an explicit capability trait whose hooks have
//! empty defaults, so a variant implements only what it reacts to. Hooks
//! read the encounter through `&BattleState` and answer with [`Effect`]s;
//! the engine executes them in order. Private accumulators (resource
//! meters, once-per-encounter flags) live on the variant itself.

mod artifacts;
mod classes;
mod companions;
mod enables;
mod kinds;
mod lifestars;
mod meter;
mod purify;
mod registry;

pub use artifacts::build_artifact;
pub use classes::build_class;
pub use companions::build_companion;
pub use enables::{Conversion, build_trait_enable};
pub use kinds::{ArtifactKind, ClassKind, CompanionKind, LifestarKind, PurifyKind, TraitEnableKind};
pub use lifestars::build_lifestar;
pub use meter::ResourceMeter;
pub use purify::build_purify;
pub use registry::Registry;

use std::fmt;

use crate::combat::{AttackKind, DamageOutcome, HitSpec};
use crate::engine::Effect;
use crate::state::{BattleState, Combatant, CombatantId};
use crate::stats::Buff;

/// What a hook sees: the whole encounter plus the combatant it acts for.
#[derive(Clone, Copy)]
pub struct HookContext<'a> {
    pub state: &'a BattleState,
    pub owner: &'a Combatant,
}

impl<'a> HookContext<'a> {
    /// `None` when `owner` is not part of the encounter.
    pub fn new(state: &'a BattleState, owner: CombatantId) -> Option<Self> {
        state.get(owner).map(|owner| Self { state, owner })
    }

    pub fn owner_id(&self) -> CombatantId {
        self.owner.id()
    }

    pub fn boss(&self) -> &'a Combatant {
        self.state.boss()
    }

    /// Living heroes other than the owner.
    pub fn allies(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        let owner = self.owner.id();
        self.state.living_heroes().filter(move |h| h.id() != owner)
    }

    /// Strike on the boss scaled by the owner's attack.
    pub fn strike(&self, kind: AttackKind, multiplier: f64) -> HitSpec {
        HitSpec::single(kind, self.owner.attack() * multiplier)
    }
}

/// Something that happened to the team that passives may react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeamEvent {
    /// A hero used an active skill.
    AllyActive { ally: CombatantId },
    /// A hero took a landed hit.
    AllyHit { ally: CombatantId, damage: u64 },
}

/// Result of asking a class to release its transition skill.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionAttempt {
    /// The class has no transition skill.
    Unsupported,
    /// The meter is short; nothing happens.
    Insufficient { current: u32, threshold: u32 },
    /// The meter was consumed; execute these effects.
    Released(Vec<Effect>),
}

/// Combatant-class hooks.
pub trait HeroClass: Send + Sync + fmt::Debug {
    fn kind(&self) -> ClassKind;

    fn start_of_battle(&mut self, _ctx: &HookContext<'_>) -> Vec<Effect> {
        Vec::new()
    }

    /// Defaults to a single attack x10 strike on the boss.
    fn basic_attack(&mut self, ctx: &HookContext<'_>) -> Vec<Effect> {
        vec![Effect::strike(ctx.owner_id(), CombatantId::Boss, basic_spec(ctx))]
    }

    fn active_skill(&mut self, ctx: &HookContext<'_>) -> Vec<Effect>;

    fn end_of_round(&mut self, _ctx: &HookContext<'_>) -> Vec<Effect> {
        Vec::new()
    }

    /// The owner took a landed hit.
    fn on_receive_damage(&mut self, _ctx: &HookContext<'_>, _hit: &DamageOutcome) -> Vec<Effect> {
        Vec::new()
    }

    /// The owner finished a strike.
    fn post_attack(&mut self, _ctx: &HookContext<'_>, _outcome: &DamageOutcome) -> Vec<Effect> {
        Vec::new()
    }

    /// Team-reactive passive. Not called while the owner is sealed.
    fn passive_trigger(&mut self, _ctx: &HookContext<'_>, _event: &TeamEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Resource-gated bonus action, attempted at the end of the owner's turn.
    fn release_transition_skill(&mut self, _ctx: &HookContext<'_>) -> TransitionAttempt {
        TransitionAttempt::Unsupported
    }

    fn meter(&self) -> Option<&ResourceMeter> {
        None
    }
}

/// Team-wide artifact bound to a bearer.
pub trait Artifact: Send + Sync + fmt::Debug {
    fn kind(&self) -> ArtifactKind;

    fn bearer(&self) -> CombatantId;

    fn apply_start_of_battle(&mut self, _state: &BattleState) -> Vec<Effect> {
        Vec::new()
    }

    fn apply_end_of_round(&mut self, _state: &BattleState) -> Vec<Effect> {
        Vec::new()
    }

    /// A hero used an active skill.
    fn on_active_skill(&mut self, _state: &BattleState, _user: CombatantId) -> Vec<Effect> {
        Vec::new()
    }
}

/// Team-wide companion charged by hero active skills.
pub trait Companion: Send + Sync + fmt::Debug {
    fn kind(&self) -> CompanionKind;

    fn meter(&self) -> &ResourceMeter;

    fn meter_mut(&mut self) -> &mut ResourceMeter;

    /// What the companion does when its meter is consumed.
    fn release(&mut self, state: &BattleState) -> Vec<Effect>;

    fn apply_start_of_battle(&mut self, _state: &BattleState) -> Vec<Effect> {
        Vec::new()
    }

    fn on_hero_active(&mut self, _hero: CombatantId) {
        self.meter_mut().charge(ResourceMeter::COMPANION_CHARGE);
    }

    /// Consumes a full meter atomically. `Some` when the companion acted.
    fn apply_end_of_round(&mut self, state: &BattleState) -> Option<Vec<Effect>> {
        if self.meter_mut().consume() {
            Some(self.release(state))
        } else {
            None
        }
    }
}

/// Team-wide pipeline hooks.
pub trait TraitEnable: Send + Sync + fmt::Debug {
    fn kind(&self) -> TraitEnableKind;

    fn apply_start_of_battle(&self, _state: &BattleState) -> Vec<Effect> {
        Vec::new()
    }

    /// Adjusts the attacker's crit chance in percent points.
    fn apply_crit_bonus(&self, crit_rate: i64) -> i64 {
        crit_rate
    }

    /// Fraction of the running total added when a hit did not crit.
    fn non_crit_bonus(&self) -> f64 {
        0.0
    }

    /// Converts part of the running total into self-heal and/or extra damage.
    fn convert(&self, _running: f64) -> Conversion {
        Conversion::default()
    }

    /// Called when a hit would be lethal. Returns `true` if a ward was spent.
    fn prevent_death(&self, _defender: &mut Combatant) -> bool {
        false
    }
}

/// Team-wide end-of-round cleanse of exactly one family.
pub trait Purify: Send + Sync + fmt::Debug {
    fn kind(&self) -> PurifyKind;

    fn apply_end_of_round(&mut self, state: &BattleState) -> Vec<Effect>;
}

/// Per-hero passive reacting to allies being hit.
pub trait Lifestar: Send + Sync + fmt::Debug {
    fn kind(&self) -> LifestarKind;

    fn on_ally_hit(&mut self, _ctx: &HookContext<'_>, _ally: CombatantId) -> Vec<Effect> {
        Vec::new()
    }

    fn apply_end_of_round(&mut self, _ctx: &HookContext<'_>) -> Vec<Effect> {
        Vec::new()
    }
}

pub(crate) fn basic_spec(ctx: &HookContext<'_>) -> HitSpec {
    ctx.strike(AttackKind::Basic, 10.0)
}

/// `percent`% of `value`, rounded down.
pub(crate) fn percent_of(value: u64, percent: u64) -> u64 {
    value.saturating_mul(percent) / 100
}

/// Per-tick status magnitude scaled by attack.
pub(crate) fn scaled(combatant: &Combatant, multiplier: f64) -> u64 {
    (combatant.attack() * multiplier).floor() as u64
}

/// The same buff for every living hero.
pub(crate) fn team_buff(state: &BattleState, buff: &Buff) -> Vec<Effect> {
    state
        .living_heroes()
        .map(|hero| Effect::buff(hero.id(), buff.clone()))
        .collect()
}
