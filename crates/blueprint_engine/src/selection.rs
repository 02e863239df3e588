//! Template selection strategies.

use std::{fmt, str::FromStr};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::EngineError;

/// How generators choose between equivalent templates.
///
/// Both strategies are reproducible: the same inputs always give the same
/// choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateSelection {
    /// Index is the input key modulo the number of choices.
    #[default]
    Modulo,
    /// Index is drawn from a generator seeded with this value and the key.
    Seeded(u64),
}

impl TemplateSelection {
    /// Picks an index in `0..count` for `key`. Returns 0 when `count` is 0.
    pub fn pick(&self, key: usize, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        match self {
            Self::Modulo => key % count,
            Self::Seeded(seed) => self.rng(*seed, key).random_range(0..count),
        }
    }

    /// Picks a direction for `key`: `+1` or `-1`.
    pub fn nudge(&self, key: usize) -> i64 {
        let up = match self {
            Self::Modulo => key % 2 == 0,
            Self::Seeded(seed) => self.rng(*seed, key).random_bool(0.5),
        };
        if up { 1 } else { -1 }
    }

    fn rng(&self, seed: u64, key: usize) -> StdRng {
        StdRng::seed_from_u64(seed ^ (key as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl fmt::Display for TemplateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modulo => f.write_str("modulo"),
            Self::Seeded(seed) => write!(f, "seeded:{seed}"),
        }
    }
}

impl FromStr for TemplateSelection {
    type Err = EngineError;

    /// Parses `modulo` or `seeded:<u64>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("modulo") {
            return Ok(Self::Modulo);
        }
        match s.split_once(':') {
            Some((kind, seed)) if kind.eq_ignore_ascii_case("seeded") => seed
                .trim()
                .parse()
                .map(Self::Seeded)
                .map_err(|_| EngineError::validation(format!("invalid seed: {seed}"))),
            _ => Err(EngineError::validation(format!(
                "unknown template selection: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulo_pick() {
        let selection = TemplateSelection::Modulo;
        assert_eq!(selection.pick(2, 3), 2);
        assert_eq!(selection.pick(4, 3), 1);
        assert_eq!(selection.pick(7, 0), 0);
    }

    #[test]
    fn test_seeded_pick_is_reproducible_and_in_range() {
        let a = TemplateSelection::Seeded(42);
        let b = TemplateSelection::Seeded(42);
        for key in 0..50 {
            let index = a.pick(key, 3);
            assert!(index < 3);
            assert_eq!(index, b.pick(key, 3));
            assert_eq!(a.nudge(key), b.nudge(key));
        }
    }

    #[test]
    fn test_modulo_nudge_alternates() {
        let selection = TemplateSelection::Modulo;
        assert_eq!(selection.nudge(0), 1);
        assert_eq!(selection.nudge(1), -1);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "modulo".parse::<TemplateSelection>(),
            Ok(TemplateSelection::Modulo)
        );
        assert_eq!(
            "Seeded: 7".parse::<TemplateSelection>(),
            Ok(TemplateSelection::Seeded(7))
        );
        assert_eq!(TemplateSelection::Seeded(7).to_string(), "seeded:7");
        assert!("seeded:abc".parse::<TemplateSelection>().is_err());
        assert!("random".parse::<TemplateSelection>().is_err());
    }
}
