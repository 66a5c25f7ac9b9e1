//! Variant registry: resolves configuration identifiers into hook objects
//! and owns them for the lifetime of the encounter.

use std::str::FromStr;

use crate::config::EncounterSpec;
use crate::error::SetupError;
use crate::state::CombatantId;

use super::{
    Artifact, ArtifactKind, ClassKind, Companion, CompanionKind, HeroClass, Lifestar, LifestarKind,
    Purify, PurifyKind, TraitEnable, TraitEnableKind, build_artifact, build_class, build_companion,
    build_lifestar, build_purify, build_trait_enable,
};

/// Every variant bound to one encounter. Classes and lifestars are indexed
/// by roster position.
#[derive(Debug)]
pub struct Registry {
    classes: Vec<Box<dyn HeroClass>>,
    lifestars: Vec<Option<Box<dyn Lifestar>>>,
    artifact: Option<Box<dyn Artifact>>,
    companion: Option<Box<dyn Companion>>,
    trait_enable: Option<Box<dyn TraitEnable>>,
    purify: Option<Box<dyn Purify>>,
}

fn parse<K: FromStr>(value: &str, error: impl FnOnce(String) -> SetupError) -> Result<K, SetupError> {
    K::from_str(value).map_err(|_| error(value.to_string()))
}

impl Registry {
    /// Resolves every identifier in `spec`, failing on the first unknown one.
    pub fn from_spec(spec: &EncounterSpec) -> Result<Self, SetupError> {
        let mut classes = Vec::with_capacity(spec.heroes.len());
        let mut lifestars = Vec::with_capacity(spec.heroes.len());
        for hero in &spec.heroes {
            let class: ClassKind = parse(&hero.class, SetupError::UnknownClass)?;
            classes.push(build_class(class));

            let lifestar = match &hero.lifestar {
                Some(id) => {
                    let kind: LifestarKind = parse(id, SetupError::UnknownLifestar)?;
                    Some(build_lifestar(kind))
                }
                None => None,
            };
            lifestars.push(lifestar);
        }

        let artifact = match &spec.artifact {
            Some(artifact) => {
                let kind: ArtifactKind = parse(&artifact.kind, SetupError::UnknownArtifact)?;
                if artifact.bearer >= spec.heroes.len() {
                    return Err(SetupError::InvalidBearer {
                        index: artifact.bearer,
                        heroes: spec.heroes.len(),
                    });
                }
                Some(build_artifact(kind, CombatantId::Hero(artifact.bearer as u8)))
            }
            None => None,
        };

        let companion = spec
            .companion
            .as_deref()
            .map(|id| parse::<CompanionKind>(id, SetupError::UnknownCompanion).map(build_companion))
            .transpose()?;
        let trait_enable = spec
            .trait_enable
            .as_deref()
            .map(|id| parse::<TraitEnableKind>(id, SetupError::UnknownTrait).map(build_trait_enable))
            .transpose()?;
        let purify = spec
            .purify
            .as_deref()
            .map(|id| parse::<PurifyKind>(id, SetupError::UnknownPurify).map(build_purify))
            .transpose()?;

        Ok(Self {
            classes,
            lifestars,
            artifact,
            companion,
            trait_enable,
            purify,
        })
    }

    pub fn class(&self, id: CombatantId) -> Option<&dyn HeroClass> {
        let index = id.hero_index()?;
        self.classes.get(index).map(|class| class.as_ref())
    }

    pub fn class_mut(&mut self, id: CombatantId) -> Option<&mut Box<dyn HeroClass>> {
        let index = id.hero_index()?;
        self.classes.get_mut(index)
    }

    pub fn lifestar_mut(&mut self, id: CombatantId) -> Option<&mut Box<dyn Lifestar>> {
        let index = id.hero_index()?;
        self.lifestars.get_mut(index)?.as_mut()
    }

    pub fn artifact(&self) -> Option<&dyn Artifact> {
        self.artifact.as_deref()
    }

    pub fn artifact_mut(&mut self) -> Option<&mut Box<dyn Artifact>> {
        self.artifact.as_mut()
    }

    pub fn companion(&self) -> Option<&dyn Companion> {
        self.companion.as_deref()
    }

    pub fn companion_mut(&mut self) -> Option<&mut Box<dyn Companion>> {
        self.companion.as_mut()
    }

    pub fn trait_enable(&self) -> Option<&dyn TraitEnable> {
        self.trait_enable.as_deref()
    }

    pub fn purify_mut(&mut self) -> Option<&mut Box<dyn Purify>> {
        self.purify.as_mut()
    }

    pub fn purify(&self) -> Option<&dyn Purify> {
        self.purify.as_deref()
    }

    /// Roster ids of heroes that carry a lifestar.
    pub fn lifestar_holders(&self) -> Vec<CombatantId> {
        self.lifestars
            .iter()
            .enumerate()
            .filter(|(_, lifestar)| lifestar.is_some())
            .map(|(index, _)| CombatantId::Hero(index as u8))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseStats, BossSpec, HeroSpec};

    fn spec() -> EncounterSpec {
        EncounterSpec::new(
            vec![
                HeroSpec::new("Aria", "paladin", BaseStats::default().with_hp(10)),
                HeroSpec::new("Brann", "Chronomancer", BaseStats::default().with_hp(10))
                    .with_lifestar("vigil"),
            ],
            BossSpec::new("Wyrm", BaseStats::default().with_hp(10)),
        )
    }

    #[test]
    fn resolves_catalogue_identifiers() {
        let spec = spec()
            .with_artifact("aegis_relic", 1)
            .with_companion("gryphon")
            .with_trait("undying")
            .with_purify("curse_cleanse");
        let registry = Registry::from_spec(&spec).unwrap();

        assert_eq!(
            registry.class(CombatantId::Hero(1)).map(|c| c.kind()),
            Some(ClassKind::Chronomancer)
        );
        assert_eq!(registry.artifact().map(|a| a.bearer()), Some(CombatantId::Hero(1)));
        assert_eq!(registry.companion().map(|c| c.kind()), Some(CompanionKind::Gryphon));
        assert_eq!(registry.trait_enable().map(|t| t.kind()), Some(TraitEnableKind::Undying));
        assert_eq!(registry.purify().map(|p| p.kind()), Some(PurifyKind::CurseCleanse));
        assert_eq!(registry.lifestar_holders(), vec![CombatantId::Hero(1)]);
    }

    #[test]
    fn unknown_identifiers_fail_fast() {
        let mut bad_class = spec();
        bad_class.heroes[0].class = "necromancer".into();
        assert_eq!(
            Registry::from_spec(&bad_class).unwrap_err(),
            SetupError::UnknownClass("necromancer".into())
        );

        assert_eq!(
            Registry::from_spec(&spec().with_companion("dragon")).unwrap_err(),
            SetupError::UnknownCompanion("dragon".into())
        );
        assert_eq!(
            Registry::from_spec(&spec().with_artifact("aegis_relic", 2)).unwrap_err(),
            SetupError::InvalidBearer { index: 2, heroes: 2 }
        );
    }
}
