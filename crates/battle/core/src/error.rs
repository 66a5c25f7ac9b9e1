//! Setup errors.
//!
//! The simulation itself never fails: refused operations are reported as
//! outcome records. The only error surface is malformed configuration, which
//! is rejected by [`crate::Encounter::new`] before any round executes.

/// Errors raised while building an encounter from an [`crate::EncounterSpec`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("unknown combatant class '{0}'")]
    UnknownClass(String),

    #[error("unknown artifact '{0}'")]
    UnknownArtifact(String),

    #[error("unknown companion '{0}'")]
    UnknownCompanion(String),

    #[error("unknown purify variant '{0}'")]
    UnknownPurify(String),

    #[error("unknown trait '{0}'")]
    UnknownTrait(String),

    #[error("unknown lifestar '{0}'")]
    UnknownLifestar(String),

    #[error("unknown control kind '{value}' for {combatant}")]
    UnknownControlKind { combatant: String, value: String },

    #[error("roster is empty")]
    EmptyRoster,

    #[error("roster has {count} heroes, at most {max} are allowed")]
    TooManyHeroes { count: usize, max: usize },

    #[error("artifact bearer index {index} is out of range for {heroes} heroes")]
    InvalidBearer { index: usize, heroes: usize },

    #[error("{0} has zero max hp")]
    ZeroHp(String),
}
