//! Hero classes.

mod assassin;
mod bard;
mod chronomancer;
mod paladin;
mod pyromancer;
mod warden;

pub use assassin::Assassin;
pub use bard::Bard;
pub use chronomancer::Chronomancer;
pub use paladin::Paladin;
pub use pyromancer::Pyromancer;
pub use warden::Warden;

use super::{ClassKind, HeroClass};

pub fn build_class(kind: ClassKind) -> Box<dyn HeroClass> {
    match kind {
        ClassKind::Paladin => Box::new(Paladin::default()),
        ClassKind::Assassin => Box::new(Assassin),
        ClassKind::Pyromancer => Box::new(Pyromancer),
        ClassKind::Warden => Box::new(Warden),
        ClassKind::Chronomancer => Box::new(Chronomancer::default()),
        ClassKind::Bard => Box::new(Bard),
    }
}
