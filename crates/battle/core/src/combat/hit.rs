//! Hit specifications handed to the damage pipeline.

/// Where a strike came from. Only basic and active attacks are "real".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Basic,
    Active,
    Transition,
    Counter,
    Retaliation,
    Companion,
}

impl AttackKind {
    /// Real attacks charge boss energy and provoke counterattacks.
    pub fn is_real(self) -> bool {
        matches!(self, AttackKind::Basic | AttackKind::Active)
    }
}

/// One hit before any modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub magnitude: f64,
    pub can_crit: bool,
}

impl Hit {
    pub fn new(magnitude: f64) -> Self {
        Self {
            magnitude,
            can_crit: true,
        }
    }
}

/// A full strike: one or more hits plus the flags the pipeline consults.
#[derive(Clone, Debug, PartialEq)]
pub struct HitSpec {
    pub hits: Vec<Hit>,
    pub kind: AttackKind,
    /// Flat per-level damage-type bonus (step 3).
    pub damage_type_level: Option<u32>,
    /// Extra crit chance in percent points on top of the attacker's crit rate.
    pub crit_bonus: i64,
    /// Subject to the defender's dodge and block rolls.
    pub evadable: bool,
}

impl HitSpec {
    pub fn single(kind: AttackKind, magnitude: f64) -> Self {
        Self::repeated(kind, magnitude, 1)
    }

    pub fn repeated(kind: AttackKind, magnitude: f64, count: usize) -> Self {
        Self {
            hits: vec![Hit::new(magnitude); count.max(1)],
            kind,
            damage_type_level: None,
            crit_bonus: 0,
            evadable: false,
        }
    }

    pub fn with_damage_type_level(mut self, level: u32) -> Self {
        self.damage_type_level = Some(level);
        self
    }

    pub fn with_crit_bonus(mut self, bonus: i64) -> Self {
        self.crit_bonus = bonus;
        self
    }

    pub fn evadable(mut self) -> Self {
        self.evadable = true;
        self
    }

    pub fn without_crits(mut self) -> Self {
        for hit in &mut self.hits {
            hit.can_crit = false;
        }
        self
    }

    pub fn total_magnitude(&self) -> f64 {
        self.hits.iter().map(|h| h.magnitude).sum()
    }
}
