use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level {0} is out of range 0..=3")]
    OutOfRange(u8),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("invalid difficulty value: {0}")]
    InvalidValue(u8),

    #[error("unknown difficulty: {0:?}")]
    UnknownName(String),
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Self-assessed difficulty given when marking a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Struggled to recall. Level drops by one.
    Hard,
    /// Recalled with some effort. Level stays put.
    Mid,
    /// Recalled without effort. Level rises by one.
    Easy,
}

impl Difficulty {
    /// Converts a numeric rating (0 = hard, 1 = mid, 2 = easy).
    ///
    /// # Errors
    ///
    /// Returns `DifficultyError::InvalidValue` for values above 2.
    pub fn from_u8(value: u8) -> Result<Self, DifficultyError> {
        match value {
            0 => Ok(Self::Hard),
            1 => Ok(Self::Mid),
            2 => Ok(Self::Easy),
            _ => Err(DifficultyError::InvalidValue(value)),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Hard => "hard",
            Difficulty::Mid => "mid",
            Difficulty::Easy => "easy",
        }
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(Self::Hard),
            "mid" | "medium" => Ok(Self::Mid),
            "easy" => Ok(Self::Easy),
            other => Err(DifficultyError::UnknownName(other.to_owned())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── LEVEL ────────────────────────────────────────────────────────────────────
//

/// Review progress of a card as a saturating counter in `0..=3`.
///
/// `0` means unseen, `3` means mastered. Anything below `3` is due for review.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const UNSEEN: Level = Level(0);
    pub const MASTERED: Level = Level(3);

    /// Creates a level from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` for values above 3.
    pub fn new(value: u8) -> Result<Self, LevelError> {
        if value > Self::MASTERED.0 {
            return Err(LevelError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self == Self::MASTERED
    }

    #[must_use]
    pub fn is_due(self) -> bool {
        !self.is_mastered()
    }

    /// Applies a marking to this level.
    #[must_use]
    pub fn apply(self, difficulty: Difficulty) -> Level {
        let max = Self::MASTERED.0;
        let next = match difficulty {
            Difficulty::Easy => self.0.saturating_add(1).min(max),
            Difficulty::Hard => self.0.saturating_sub(1),
            Difficulty::Mid => self.0.min(max),
        };
        Level(next)
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn all_levels() -> impl Iterator<Item = Level> {
        (0..=3).map(|v| Level::new(v).unwrap())
    }

    #[test]
    fn level_rejects_out_of_range() {
        assert_eq!(Level::new(4).unwrap_err(), LevelError::OutOfRange(4));
        assert_eq!(Level::default(), Level::UNSEEN);
    }

    #[test]
    fn easy_climbs_and_saturates_at_mastered() {
        let mut level = Level::UNSEEN;
        let mut path = vec![level.value()];
        for _ in 0..5 {
            level = level.apply(Difficulty::Easy);
            path.push(level.value());
        }
        assert_eq!(path, vec![0, 1, 2, 3, 3, 3]);
        assert!(level.is_mastered());
    }

    #[test]
    fn hard_drops_and_saturates_at_zero() {
        let mut level = Level::MASTERED;
        for _ in 0..10 {
            level = level.apply(Difficulty::Hard);
        }
        assert_eq!(level, Level::UNSEEN);
    }

    #[test]
    fn mid_is_idempotent_from_every_level() {
        for start in all_levels() {
            let mut level = start;
            for _ in 0..4 {
                level = level.apply(Difficulty::Mid);
            }
            assert_eq!(level, start);
        }
    }

    #[test]
    fn due_and_mastered_partition_levels() {
        for level in all_levels() {
            assert_ne!(level.is_due(), level.is_mastered());
        }
    }

    #[test]
    fn difficulty_parses_names_and_numbers() {
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Mid);
        assert_eq!(Difficulty::from_u8(0).unwrap(), Difficulty::Hard);
        assert!(matches!(
            Difficulty::from_u8(7).unwrap_err(),
            DifficultyError::InvalidValue(7)
        ));
        assert!(matches!(
            "again".parse::<Difficulty>().unwrap_err(),
            DifficultyError::UnknownName(_)
        ));
    }

    #[test]
    fn level_deserialization_is_range_checked() {
        let level: Level = serde_json::from_str("2").unwrap();
        assert_eq!(level.value(), 2);
        assert!(serde_json::from_str::<Level>("9").is_err());
    }
}
