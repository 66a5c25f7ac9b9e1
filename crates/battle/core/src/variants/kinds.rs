//! Closed catalogue identifiers, parsed from configuration strings.

macro_rules! catalogue {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            Hash,
            strum::Display,
            strum::EnumString,
            strum::AsRefStr,
            strum::EnumIter,
        )]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        #[strum(serialize_all = "snake_case", ascii_case_insensitive)]
        pub enum $name {
            $($variant),+
        }
    };
}

catalogue!(
    /// Hero classes.
    ClassKind {
        Paladin,
        Assassin,
        Pyromancer,
        Warden,
        Chronomancer,
        Bard,
    }
);

catalogue!(
    /// Team artifacts.
    ArtifactKind {
        ExecutionersBlade,
        DefiersBanner,
        VenomFang,
        EmberHeart,
        AegisRelic,
        TimewornHourglass,
    }
);

catalogue!(
    /// Team companions.
    CompanionKind {
        Phoenix,
        Gryphon,
        Tortoise,
    }
);

catalogue!(
    /// Team-wide pipeline traits.
    TraitEnableKind {
        Ruthless,
        Steadfast,
        Vampiric,
        Wrath,
        Undying,
    }
);

catalogue!(
    /// End-of-round cleanses.
    PurifyKind {
        ControlCleanse,
        AttributeCleanse,
        CurseCleanse,
    }
);

catalogue!(
    /// Per-hero passives.
    LifestarKind {
        Sentinel,
        Vigil,
        Bloom,
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn identifiers_parse_case_insensitively() {
        assert_eq!(ClassKind::from_str("Paladin").unwrap(), ClassKind::Paladin);
        assert_eq!(
            ArtifactKind::from_str("executioners_blade").unwrap(),
            ArtifactKind::ExecutionersBlade
        );
        assert_eq!(PurifyKind::CurseCleanse.to_string(), "curse_cleanse");
        assert!(CompanionKind::from_str("dragon").is_err());
    }
}
