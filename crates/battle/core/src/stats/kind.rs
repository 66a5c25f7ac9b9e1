//! Closed stat enumeration and the per-combatant stat block.

use strum::EnumCount;

/// Identifier for every stat a buff record may target.
///
/// Parsing accepts the legacy alias `control_immunity` for [`StatKind::CtrlImmunity`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Attack,
    Armor,
    Speed,
    /// Percent chance to crit.
    CritRate,
    /// Crit damage percent; the pipeline caps its contribution at 150.
    CritDmg,
    /// Capped at 150 in the pipeline.
    Precision,
    HolyDamage,
    Dodge,
    Block,
    /// Additive percent on outgoing damage.
    AllDamageDealt,
    /// Percent mitigation (DR), capped at 75.
    DamageReduction,
    /// Percent mitigation (ADR), capped at 75 independently of DR.
    AllDamageReduction,
    /// Percent chance to resist a control affliction.
    #[strum(to_string = "ctrl_immunity", serialize = "control_immunity")]
    #[cfg_attr(feature = "serde", serde(alias = "control_immunity"))]
    CtrlImmunity,
    /// Extra percent damage taken from hits that crit.
    CritDamageTaken,
}

impl StatKind {
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Current stat values for one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatBlock {
    values: [i64; StatKind::COUNT],
}

impl StatBlock {
    pub fn zeroed() -> Self {
        Self {
            values: [0; StatKind::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, stat: StatKind) -> i64 {
        self.values[stat.as_index()]
    }

    #[inline]
    pub(crate) fn set(&mut self, stat: StatKind, value: i64) {
        self.values[stat.as_index()] = value;
    }

    /// Adds `delta` to `stat`. Only the ledger calls this after setup.
    #[inline]
    pub(crate) fn add(&mut self, stat: StatKind, delta: i64) {
        let slot = &mut self.values[stat.as_index()];
        *slot = slot.saturating_add(delta);
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::zeroed()
    }
}
