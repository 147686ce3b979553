use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Card
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u64);

impl CardId {
    /// Creates a new `CardId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Unique identifier for a Deck
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeckId(u64);

impl DeckId {
    /// Creates a new `DeckId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardId({})", self.0)
    }
}

impl fmt::Debug for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to parse {kind} from string")]
pub struct ParseIdError {
    kind: &'static str,
}

impl FromStr for CardId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CardId::new)
            .map_err(|_| ParseIdError { kind: "CardId" })
    }
}

impl FromStr for DeckId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(DeckId::new)
            .map_err(|_| ParseIdError { kind: "DeckId" })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_id_display_and_debug() {
        let id = DeckId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(format!("{id:?}"), "DeckId(7)");
    }

    #[test]
    fn ids_parse_from_str() {
        assert_eq!("42".parse::<CardId>().unwrap(), CardId::new(42));
        assert_eq!(" 3 ".parse::<DeckId>().unwrap(), DeckId::new(3));
    }

    #[test]
    fn invalid_id_reports_kind() {
        let err = "abc".parse::<DeckId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse DeckId from string");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&CardId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
