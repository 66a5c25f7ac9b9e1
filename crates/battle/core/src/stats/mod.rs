//! Stat system: named stat storage and the reversible buff ledger.
//!
//! # Architecture
//!
//! ```text
//! [ StatBlock ]   current value per StatKind (base + live modifiers)
//!      ↑
//! [ BuffLedger ]  keyed records; the only writer of StatBlock after setup
//! ```
//!
//! Every record adds its magnitude to the block when inserted and subtracts
//! it exactly once when it expires or is removed. Nothing else writes stats,
//! so the block always equals base + sum of live records.

pub mod kind;
pub mod ledger;

pub use kind::{StatBlock, StatKind};
pub use ledger::{
    ApplyMode, ApplyOutcome, Buff, BuffKey, BuffLedger, BuffOrigin, BuffRecord, ExpiredBuff,
    Lifetime,
};
