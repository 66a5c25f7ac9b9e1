//! Encounter loader.

use std::path::Path;

use anyhow::Context;
use battle_core::EncounterSpec;

use crate::loaders::{LoadResult, read_file};

/// On-disk encounter formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterFormat {
    Toml,
    Ron,
}

impl EncounterFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => anyhow::bail!(
                "Unsupported encounter file {}: expected .toml or .ron",
                path.display()
            ),
        }
    }
}

/// Loader for encounter descriptions.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load an encounter from a TOML or RON file, chosen by extension.
    pub fn load(path: &Path) -> LoadResult<EncounterSpec> {
        let format = EncounterFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse(&content, format).with_context(|| format!("Failed to load encounter {}", path.display()))
    }

    /// Parse an encounter from an in-memory document.
    pub fn parse(content: &str, format: EncounterFormat) -> LoadResult<EncounterSpec> {
        let spec = match format {
            EncounterFormat::Toml => {
                toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse encounter TOML: {}", e))?
            }
            EncounterFormat::Ron => {
                ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?
            }
        };
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use battle_core::{BattleConfig, Encounter};

    use super::*;

    const TOML_ENCOUNTER: &str = r#"
companion = "phoenix"
trait_enable = "undying"

[artifact]
kind = "venom_fang"
bearer = 1

[config]
round_cap = 10
seed = 99

[[heroes]]
name = "Aldren"
class = "paladin"
lifestar = "vigil"
[heroes.stats]
hp = 40000
attack = 900
speed = 12

[[heroes]]
name = "Sable"
class = "Assassin"
immune = "silence"
[heroes.stats]
hp = 25000
attack = 1400
speed = 30
crit_rate = 25

[boss]
name = "Grave Wyrm"
[boss.stats]
hp = 2000000
attack = 1500
"#;

    const RON_ENCOUNTER: &str = r#"(
    heroes: [
        (name: "Lyre", class: "bard", stats: (hp: 27000, attack: 1000, speed: 20)),
    ],
    boss: (name: "Grave Wyrm", stats: (hp: 500000, attack: 800), immune: "fear"),
    purify: Some("curse_cleanse"),
)"#;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_toml_with_defaults_filled_in() {
        let file = write_temp(".toml", TOML_ENCOUNTER);
        let spec = EncounterLoader::load(file.path()).unwrap();

        assert_eq!(spec.heroes.len(), 2);
        assert_eq!(spec.heroes[0].immune, "fear");
        assert_eq!(spec.heroes[0].lifestar.as_deref(), Some("vigil"));
        assert_eq!(spec.heroes[1].immune, "silence");
        assert_eq!(spec.heroes[1].stats.crit_rate, 25);
        assert_eq!(spec.boss.immune, "seal");
        assert_eq!(spec.artifact.as_ref().map(|a| a.bearer), Some(1));
        assert_eq!(spec.config.round_cap, 10);
        assert_eq!(spec.config.seed, 99);
        assert!(!spec.config.core_engaged);

        assert!(Encounter::new(&spec).is_ok());
    }

    #[test]
    fn loads_ron() {
        let file = write_temp(".ron", RON_ENCOUNTER);
        let spec = EncounterLoader::load(file.path()).unwrap();

        assert_eq!(spec.heroes[0].class, "bard");
        assert_eq!(spec.boss.immune, "fear");
        assert_eq!(spec.purify.as_deref(), Some("curse_cleanse"));
        assert_eq!(spec.config, BattleConfig::default());
        assert!(Encounter::new(&spec).is_ok());
    }

    #[test]
    fn rejects_unknown_extensions() {
        let file = write_temp(".json", "{}");
        let err = EncounterLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported encounter file"));
    }

    #[test]
    fn reports_parse_failures_with_the_path() {
        let file = write_temp(".toml", "heroes = 3");
        let err = EncounterLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to load encounter"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(EncounterLoader::load(Path::new("/nonexistent/encounter.toml")).is_err());
    }
}
