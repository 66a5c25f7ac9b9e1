//! Attacker capability flags consulted by the damage pipeline.

bitflags::bitflags! {
    /// Conditional damage modifiers an attacker is allowed to engage.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// Bonus scaling with how far the defender's HP exceeds the attacker's.
        const EXECUTE = 1 << 0;
        /// Flat bonus while the defender is at or above 70% HP.
        const DEFIER = 1 << 1;
        /// Flat bonus while the defender's HP exceeds the attacker's.
        const GIANT_SLAYER = 1 << 2;
        /// Bonus proportional to the defender's missing HP.
        const MAIM = 1 << 3;
        /// Bonus against poisoned defenders.
        const VENOM = 1 << 4;
    }
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("|").to_lowercase())
        }
    }
}
