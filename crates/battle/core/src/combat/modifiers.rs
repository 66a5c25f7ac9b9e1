//! Conditional multiplier stack (pipeline step 2).
//!
//! Each engaged modifier contributes a fraction `f`; the stack combines them
//! as the product of `(1 + f)`.

/// Conditional damage modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Modifier {
    /// Defender is poisoned and the attacker carries venom.
    Venom,
    /// Defender is burning and the attacker holds a burn-synergy window.
    BurnSynergy,
    /// Defender HP exceeds attacker HP; scales in 10% steps.
    Execute,
    /// Defender at or above 70% of max HP.
    Defier,
    /// Defender HP exceeds attacker HP.
    GiantSlayer,
    /// Proportional to the defender's missing HP.
    Maim,
}

impl Modifier {
    pub const VENOM_BONUS: f64 = 0.20;
    pub const BURN_BONUS: f64 = 0.25;
    pub const EXECUTE_STEP_BONUS: f64 = 0.10;
    pub const EXECUTE_CAP: f64 = 1.0;
    pub const DEFIER_BONUS: f64 = 0.20;
    pub const DEFIER_HP_FRACTION: f64 = 0.70;
    pub const GIANT_SLAYER_BONUS: f64 = 0.15;
    pub const MAIM_SCALE: f64 = 0.30;
}

/// Engaged modifiers in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiplierStack {
    terms: Vec<(Modifier, f64)>,
}

impl MultiplierStack {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Adds a term. Non-positive fractions are ignored.
    pub fn add(&mut self, modifier: Modifier, fraction: f64) {
        if fraction > 0.0 {
            self.terms.push((modifier, fraction));
        }
    }

    /// Product of `(1 + f)` over every term; `1.0` when empty.
    pub fn product(&self) -> f64 {
        self.terms.iter().map(|(_, f)| 1.0 + f).product()
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.terms.iter().any(|(m, _)| *m == modifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Modifier, f64)> {
        self.terms.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_multiply() {
        let mut stack = MultiplierStack::new();
        stack.add(Modifier::Venom, 0.20);
        stack.add(Modifier::Defier, 0.50);
        stack.add(Modifier::Maim, 0.0);

        assert!((stack.product() - 1.8).abs() < 1e-12);
        assert!(!stack.contains(Modifier::Maim));
    }

    #[test]
    fn empty_stack_is_neutral() {
        assert_eq!(MultiplierStack::new().product(), 1.0);
    }
}
