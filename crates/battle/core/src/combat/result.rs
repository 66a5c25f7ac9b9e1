//! Result of one pipeline resolution.

use super::hit::AttackKind;
use crate::state::CombatantId;

/// What a strike did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DamageOutcome {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub kind: AttackKind,
    pub hits: u32,
    pub crits: u32,
    /// Dodged before the pipeline ran; nothing else happened.
    pub dodged: bool,
    /// Blocked before the pipeline ran; hit magnitudes were halved.
    pub blocked: bool,
    /// Damage after mitigation, before shield absorption.
    pub mitigated: u64,
    /// Amount soaked by the defender's shield.
    pub absorbed: u64,
    /// HP actually removed.
    pub damage: u64,
    /// Heal owed to the attacker by a trait conversion.
    pub self_heal: u64,
    /// A death ward clamped the hit.
    pub ward_used: bool,
    pub hp_before: u64,
    pub hp_after: u64,
    pub killed: bool,
}

impl DamageOutcome {
    pub(crate) fn dodge(attacker: CombatantId, defender: CombatantId, kind: AttackKind, hp: u64) -> Self {
        Self {
            attacker,
            defender,
            kind,
            hits: 0,
            crits: 0,
            dodged: true,
            blocked: false,
            mitigated: 0,
            absorbed: 0,
            damage: 0,
            self_heal: 0,
            ward_used: false,
            hp_before: hp,
            hp_after: hp,
            killed: false,
        }
    }

    /// The strike connected (it may still have been fully absorbed).
    pub fn landed(&self) -> bool {
        !self.dodged
    }

    pub fn any_crit(&self) -> bool {
        self.crits > 0
    }
}
