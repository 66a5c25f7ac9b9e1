//! Encounter configuration: tunable rules plus the roster description.

use crate::stats::StatKind;

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Number of rounds after which the encounter ends without a winner.
    pub round_cap: u32,
    /// Ruleset modifier that shortens control durations by one round.
    pub core_engaged: bool,
    /// Seed for every random draw made during the encounter.
    pub seed: u64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_HEROES: usize = 6;
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== rule constants =====
    pub const ENERGY_THRESHOLD: u32 = 100;
    pub const ENERGY_PER_BASIC: u32 = 50;
    pub const ENERGY_ON_HIT: u32 = 10;
    pub const BOSS_ENERGY_ON_HIT: u32 = 5;
    pub const CALAMITY_THRESHOLD: u32 = 5;
    pub const CONTROL_BASE_DURATION: u32 = 2;
    pub const CURSE_DAMAGE_MULTIPLIER: u64 = 30;
    pub const MITIGATION_CAP: i64 = 75;
    pub const CRIT_DMG_CAP: i64 = 150;
    pub const PRECISION_CAP: i64 = 150;
    pub const REACTIVE_BUFF_ROUNDS: u32 = 15;
    pub const MAX_EFFECT_DEPTH: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROUND_CAP: u32 = 15;
    pub const DEFAULT_SEED: u64 = 0x5eed_ba77_1e00_0001;

    pub fn new() -> Self {
        Self {
            round_cap: Self::DEFAULT_ROUND_CAP,
            core_engaged: false,
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_core(mut self, engaged: bool) -> Self {
        self.core_engaged = engaged;
        self
    }

    /// Rounds a freshly landed control affliction lasts.
    ///
    /// Base duration minus one while the core modifier is engaged, never below one.
    pub fn control_duration(&self) -> u32 {
        let reduction = u32::from(self.core_engaged);
        Self::CONTROL_BASE_DURATION.saturating_sub(reduction).max(1)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Base stat set for one combatant.
///
/// Percent stats are whole percent points (`crit_rate = 25` means 25%).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub hp: u64,
    pub attack: i64,
    pub armor: i64,
    pub speed: i64,
    pub crit_rate: i64,
    pub crit_dmg: i64,
    pub precision: i64,
    pub holy_damage: i64,
    pub dodge: i64,
    pub block: i64,
    pub all_damage_dealt: i64,
    pub damage_reduction: i64,
    pub all_damage_reduction: i64,
    pub ctrl_immunity: i64,
}

impl BaseStats {
    /// Stat value for the given identifier. Unlisted stats start at zero.
    pub fn get(&self, stat: StatKind) -> i64 {
        match stat {
            StatKind::Attack => self.attack,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDmg => self.crit_dmg,
            StatKind::Precision => self.precision,
            StatKind::HolyDamage => self.holy_damage,
            StatKind::Dodge => self.dodge,
            StatKind::Block => self.block,
            StatKind::AllDamageDealt => self.all_damage_dealt,
            StatKind::DamageReduction => self.damage_reduction,
            StatKind::AllDamageReduction => self.all_damage_reduction,
            StatKind::CtrlImmunity => self.ctrl_immunity,
            StatKind::CritDamageTaken => 0,
        }
    }

    pub fn with_hp(mut self, hp: u64) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_attack(mut self, attack: i64) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = speed;
        self
    }
}

fn default_hero_immune() -> String {
    "fear".to_string()
}

fn default_boss_immune() -> String {
    "seal".to_string()
}

/// One hero in the roster. Identifiers are resolved at encounter setup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroSpec {
    pub name: String,
    pub class: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default = "default_hero_immune"))]
    pub immune: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifestar: Option<String>,
}

impl HeroSpec {
    pub fn new(name: impl Into<String>, class: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            stats,
            immune: default_hero_immune(),
            lifestar: None,
        }
    }

    pub fn immune_to(mut self, kind: impl Into<String>) -> Self {
        self.immune = kind.into();
        self
    }

    pub fn with_lifestar(mut self, lifestar: impl Into<String>) -> Self {
        self.lifestar = Some(lifestar.into());
        self
    }
}

/// The adversary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossSpec {
    pub name: String,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default = "default_boss_immune"))]
    pub immune: String,
}

impl BossSpec {
    pub fn new(name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            stats,
            immune: default_boss_immune(),
        }
    }

    pub fn immune_to(mut self, kind: impl Into<String>) -> Self {
        self.immune = kind.into();
        self
    }
}

/// Artifact selection, bound to the hero at `bearer` (roster index).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtifactSpec {
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bearer: usize,
}

/// Full configuration input accepted by [`crate::Encounter::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub heroes: Vec<HeroSpec>,
    pub boss: BossSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artifact: Option<ArtifactSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub companion: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub purify: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trait_enable: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub config: BattleConfig,
}

impl EncounterSpec {
    pub fn new(heroes: Vec<HeroSpec>, boss: BossSpec) -> Self {
        Self {
            heroes,
            boss,
            artifact: None,
            companion: None,
            purify: None,
            trait_enable: None,
            config: BattleConfig::default(),
        }
    }

    pub fn with_artifact(mut self, kind: impl Into<String>, bearer: usize) -> Self {
        self.artifact = Some(ArtifactSpec {
            kind: kind.into(),
            bearer,
        });
        self
    }

    pub fn with_companion(mut self, kind: impl Into<String>) -> Self {
        self.companion = Some(kind.into());
        self
    }

    pub fn with_purify(mut self, kind: impl Into<String>) -> Self {
        self.purify = Some(kind.into());
        self
    }

    pub fn with_trait(mut self, kind: impl Into<String>) -> Self {
        self.trait_enable = Some(kind.into());
        self
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_duration_shrinks_with_core() {
        assert_eq!(BattleConfig::new().control_duration(), 2);
        assert_eq!(BattleConfig::new().with_core(true).control_duration(), 1);
    }

    #[test]
    fn base_stats_lookup_covers_aliased_immunity() {
        let stats = BaseStats {
            ctrl_immunity: 40,
            ..BaseStats::default()
        };
        assert_eq!(stats.get(StatKind::CtrlImmunity), 40);
        assert_eq!(stats.get(StatKind::CritDamageTaken), 0);
    }
}
