//! Data-driven encounter definitions.
//!
//! Reads encounter descriptions from TOML or RON files into
//! [`battle_core::EncounterSpec`]. Identifiers stay strings here; they are
//! resolved (and rejected) by [`battle_core::Encounter::new`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{EncounterFormat, EncounterLoader, LoadResult};
