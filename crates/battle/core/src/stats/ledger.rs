//! Buff/debuff ledger with an exact stat-reversal contract.
//!
//! # Keys
//!
//! A record is keyed by `(owner, source, instance)`. The instance counter is
//! monotonic per ledger, so two applications of the same source never collide:
//! [`ApplyMode::Stack`] always mints a fresh instance, while
//! [`ApplyMode::Replace`] reuses the key of the live record of that source.
//!
//! # Reversal
//!
//! Inserting a record adds its magnitude to the stat block; removing it (by
//! expiry or explicitly) subtracts the same magnitude. A record leaves the map
//! exactly once, so it is reversed exactly once.

use std::collections::BTreeMap;

use tracing::debug;

use super::kind::{StatBlock, StatKind};
use crate::state::CombatantId;

/// Distinguishes ordinary attribute modifiers from skill-tagged records.
///
/// Skill-tagged records bypass curse interception and are never picked by
/// generic purify effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffOrigin {
    Attribute,
    Skill,
}

/// How long a record stays in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Removed when the counter reaches zero during end-of-round expiry.
    Rounds(u32),
    /// Never expires; only explicit removal takes it out.
    Permanent,
}

impl Lifetime {
    /// Finite lifetime of at least one round.
    pub fn rounds(rounds: u32) -> Self {
        Self::Rounds(rounds.max(1))
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Rounds(n) => write!(f, "{n} rounds"),
            Lifetime::Permanent => f.write_str("permanent"),
        }
    }
}

/// Behavior when the target already holds a record from the same source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApplyMode {
    /// Coexist: a fresh key is minted and both records expire independently.
    #[default]
    Stack,
    /// Reverse the existing record of this source and take over its key.
    Replace,
}

/// A modifier request, before key resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buff {
    /// Stable semantic source name (e.g. `"anthem"`).
    pub source: &'static str,
    pub stat: StatKind,
    pub magnitude: i64,
    pub lifetime: Lifetime,
    pub origin: BuffOrigin,
    pub mode: ApplyMode,
}

impl Buff {
    /// Attribute-tagged modifier (curse-interceptable, purifiable when negative).
    pub fn attribute(source: &'static str, stat: StatKind, magnitude: i64, lifetime: Lifetime) -> Self {
        Self {
            source,
            stat,
            magnitude,
            lifetime,
            origin: BuffOrigin::Attribute,
            mode: ApplyMode::Stack,
        }
    }

    /// Skill-tagged modifier.
    pub fn skill(source: &'static str, stat: StatKind, magnitude: i64, lifetime: Lifetime) -> Self {
        Self {
            origin: BuffOrigin::Skill,
            ..Self::attribute(source, stat, magnitude, lifetime)
        }
    }

    /// Switch to [`ApplyMode::Replace`].
    pub fn replacing(mut self) -> Self {
        self.mode = ApplyMode::Replace;
        self
    }

    pub fn is_skill(&self) -> bool {
        self.origin == BuffOrigin::Skill
    }
}

/// Unique ledger key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuffKey {
    pub owner: CombatantId,
    pub source: &'static str,
    pub instance: u32,
}

impl std::fmt::Display for BuffKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.source, self.instance)
    }
}

/// A live record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuffRecord {
    pub stat: StatKind,
    pub magnitude: i64,
    pub remaining: Lifetime,
    pub origin: BuffOrigin,
}

/// A record taken out of the ledger, already reversed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpiredBuff {
    pub key: BuffKey,
    pub record: BuffRecord,
}

/// Result of applying a buff through the ledger contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Stored under `key` and added to the stat.
    Applied { key: BuffKey, replaced: bool },
    /// Curse intercepted the attempt: no stat change, damage taken instead.
    ///
    /// `penalty` is the full curse damage; `damage` is the HP actually lost,
    /// which is less when the target had fewer HP than the penalty.
    Diverted {
        penalty: u64,
        damage: u64,
        curse_remaining: u32,
    },
    /// Target is not alive.
    Rejected,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Key chosen for an incoming buff and the record it supersedes, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyResolution {
    pub key: BuffKey,
    pub replaces: Option<BuffKey>,
}

/// Per-combatant store of live modifier records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuffLedger {
    owner: CombatantId,
    records: BTreeMap<BuffKey, BuffRecord>,
    next_instance: u32,
}

impl BuffLedger {
    pub fn new(owner: CombatantId) -> Self {
        Self {
            owner,
            records: BTreeMap::new(),
            next_instance: 0,
        }
    }

    /// Picks the key an incoming buff will live under.
    ///
    /// Mints a fresh instance unless the buff is in replace mode and a record
    /// from the same source is live.
    pub fn resolve_key(&mut self, buff: &Buff) -> KeyResolution {
        if buff.mode == ApplyMode::Replace {
            if let Some(existing) = self.key_for_source(buff.source) {
                return KeyResolution {
                    key: existing,
                    replaces: Some(existing),
                };
            }
        }

        let key = BuffKey {
            owner: self.owner,
            source: buff.source,
            instance: self.next_instance,
        };
        self.next_instance += 1;
        KeyResolution {
            key,
            replaces: None,
        }
    }

    /// Stores `buff` under `key` and adds its magnitude to `stats`.
    pub(crate) fn insert(&mut self, key: BuffKey, buff: &Buff, stats: &mut StatBlock) {
        stats.add(buff.stat, buff.magnitude);
        let record = BuffRecord {
            stat: buff.stat,
            magnitude: buff.magnitude,
            remaining: buff.lifetime,
            origin: buff.origin,
        };
        debug!(
            target: "battle::ledger",
            key = %key,
            stat = %buff.stat,
            magnitude = buff.magnitude,
            "buff applied"
        );
        if let Some(previous) = self.records.insert(key, record) {
            // Callers remove the superseded record first; a leftover here would drift the stat.
            stats.add(previous.stat, -previous.magnitude);
        }
    }

    /// Removes a record and reverses it.
    pub(crate) fn remove(&mut self, key: &BuffKey, stats: &mut StatBlock) -> Option<BuffRecord> {
        let record = self.records.remove(key)?;
        stats.add(record.stat, -record.magnitude);
        debug!(
            target: "battle::ledger",
            key = %key,
            stat = %record.stat,
            magnitude = record.magnitude,
            "buff removed"
        );
        Some(record)
    }

    /// One round passes: decrement finite records and reverse those reaching zero.
    pub(crate) fn expire(&mut self, stats: &mut StatBlock) -> Vec<ExpiredBuff> {
        let mut due = Vec::new();
        for (key, record) in self.records.iter_mut() {
            if let Lifetime::Rounds(remaining) = &mut record.remaining {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    due.push(*key);
                }
            }
        }

        due.into_iter()
            .filter_map(|key| {
                self.remove(&key, stats)
                    .map(|record| ExpiredBuff { key, record })
            })
            .collect()
    }

    /// First live key for `source`, in key order.
    pub fn key_for_source(&self, source: &str) -> Option<BuffKey> {
        self.records.keys().find(|key| key.source == source).copied()
    }

    /// First negative attribute-tagged record, the target of attribute purify.
    pub fn first_reduction(&self) -> Option<BuffKey> {
        self.records
            .iter()
            .find(|(_, record)| record.origin == BuffOrigin::Attribute && record.magnitude < 0)
            .map(|(key, _)| *key)
    }

    pub fn get(&self, key: &BuffKey) -> Option<&BuffRecord> {
        self.records.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BuffKey, &BuffRecord)> {
        self.records.iter()
    }

    /// Records currently live for `source`.
    pub fn count_source(&self, source: &str) -> usize {
        self.records.keys().filter(|key| key.source == source).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ledger() -> (BuffLedger, StatBlock) {
        (BuffLedger::new(CombatantId::Hero(0)), StatBlock::zeroed())
    }

    fn put(ledger: &mut BuffLedger, stats: &mut StatBlock, buff: Buff) -> BuffKey {
        let resolution = ledger.resolve_key(&buff);
        if let Some(old) = resolution.replaces {
            ledger.remove(&old, stats);
        }
        ledger.insert(resolution.key, &buff, stats);
        resolution.key
    }

    #[test]
    fn stacking_mints_distinct_keys() {
        let (mut ledger, mut stats) = ledger();
        let buff = Buff::attribute("anthem", StatKind::Attack, 10, Lifetime::rounds(2));
        let a = put(&mut ledger, &mut stats, buff.clone());
        let b = put(&mut ledger, &mut stats, buff);

        assert_ne!(a, b);
        assert_eq!(ledger.count_source("anthem"), 2);
        assert_eq!(stats.get(StatKind::Attack), 20);
    }

    #[test]
    fn replace_reuses_key_and_reverses_old_magnitude() {
        let (mut ledger, mut stats) = ledger();
        let first = Buff::skill("hourglass", StatKind::Speed, 20, Lifetime::Permanent).replacing();
        let a = put(&mut ledger, &mut stats, first);
        let second = Buff::skill("hourglass", StatKind::Speed, 35, Lifetime::Permanent).replacing();
        let b = put(&mut ledger, &mut stats, second);

        assert_eq!(a, b);
        assert_eq!(ledger.len(), 1);
        assert_eq!(stats.get(StatKind::Speed), 35);
    }

    #[test]
    fn independent_instances_expire_independently() {
        let (mut ledger, mut stats) = ledger();
        put(
            &mut ledger,
            &mut stats,
            Buff::attribute("anthem", StatKind::Attack, 10, Lifetime::rounds(1)),
        );
        put(
            &mut ledger,
            &mut stats,
            Buff::attribute("anthem", StatKind::Attack, 10, Lifetime::rounds(3)),
        );

        let expired = ledger.expire(&mut stats);
        assert_eq!(expired.len(), 1);
        assert_eq!(stats.get(StatKind::Attack), 10);

        ledger.expire(&mut stats);
        let expired = ledger.expire(&mut stats);
        assert_eq!(expired.len(), 1);
        assert_eq!(stats.get(StatKind::Attack), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn permanent_records_survive_expiry() {
        let (mut ledger, mut stats) = ledger();
        put(
            &mut ledger,
            &mut stats,
            Buff::skill("aura", StatKind::DamageReduction, 10, Lifetime::Permanent),
        );
        for _ in 0..10_000 {
            assert!(ledger.expire(&mut stats).is_empty());
        }
        assert_eq!(stats.get(StatKind::DamageReduction), 10);
    }

    #[test]
    fn removal_reverses_once() {
        let (mut ledger, mut stats) = ledger();
        let key = put(
            &mut ledger,
            &mut stats,
            Buff::attribute("sunder", StatKind::DamageReduction, -10, Lifetime::rounds(2)),
        );
        assert_eq!(stats.get(StatKind::DamageReduction), -10);
        assert!(ledger.remove(&key, &mut stats).is_some());
        assert!(ledger.remove(&key, &mut stats).is_none());
        assert_eq!(stats.get(StatKind::DamageReduction), 0);
    }

    #[test]
    fn first_reduction_skips_skill_records_and_positive_magnitudes() {
        let (mut ledger, mut stats) = ledger();
        put(
            &mut ledger,
            &mut stats,
            Buff::skill("mark", StatKind::Armor, -5, Lifetime::rounds(2)),
        );
        put(
            &mut ledger,
            &mut stats,
            Buff::attribute("anthem", StatKind::Attack, 5, Lifetime::rounds(2)),
        );
        assert_eq!(ledger.first_reduction(), None);

        let key = put(
            &mut ledger,
            &mut stats,
            Buff::attribute("sunder", StatKind::DamageReduction, -10, Lifetime::rounds(2)),
        );
        assert_eq!(ledger.first_reduction(), Some(key));
    }

    fn any_stat() -> impl Strategy<Value = StatKind> {
        prop::sample::select(vec![
            StatKind::Attack,
            StatKind::Speed,
            StatKind::CritRate,
            StatKind::HolyDamage,
            StatKind::DamageReduction,
            StatKind::CtrlImmunity,
        ])
    }

    proptest! {
        #[test]
        fn expiry_restores_the_pre_application_value(
            base in -1_000_000i64..1_000_000,
            stat in any_stat(),
            magnitude in -100_000i64..100_000,
            rounds in 1u32..20,
            skill in any::<bool>(),
        ) {
            let (mut ledger, mut stats) = ledger();
            stats.set(stat, base);

            let buff = if skill {
                Buff::skill("fuzzed", stat, magnitude, Lifetime::rounds(rounds))
            } else {
                Buff::attribute("fuzzed", stat, magnitude, Lifetime::rounds(rounds))
            };
            put(&mut ledger, &mut stats, buff);
            prop_assert_eq!(stats.get(stat), base + magnitude);

            let mut expired = 0;
            for _ in 0..rounds {
                expired += ledger.expire(&mut stats).len();
            }
            prop_assert_eq!(expired, 1);
            prop_assert_eq!(stats.get(stat), base);
            prop_assert!(ledger.is_empty());
        }

        #[test]
        fn concurrent_records_never_drift(
            magnitudes in prop::collection::vec((-500i64..500, 1u32..6), 1..12),
        ) {
            let (mut ledger, mut stats) = ledger();
            for (magnitude, rounds) in &magnitudes {
                put(
                    &mut ledger,
                    &mut stats,
                    Buff::attribute("fuzzed", StatKind::Attack, *magnitude, Lifetime::rounds(*rounds)),
                );
            }
            for _ in 0..6 {
                ledger.expire(&mut stats);
                let live: i64 = ledger.iter().map(|(_, r)| r.magnitude).sum();
                prop_assert_eq!(stats.get(StatKind::Attack), live);
            }
            prop_assert!(ledger.is_empty());
        }
    }
}
