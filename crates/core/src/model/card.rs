use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    ids::CardId,
    level::Level,
    text::{BackText, FrontText, TextError},
};

//
// ─── CARD TYPES ────────────────────────────────────────────────────────────────
//

/// Raw user input for a new card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

impl CardDraft {
    #[must_use]
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Trims and checks both sides of the card.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidFront` or `CardError::InvalidBack` when a side is blank.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedCard, CardError> {
        let front = FrontText::parse(&self.front).map_err(CardError::InvalidFront)?;
        let back = BackText::parse(&self.back).map_err(CardError::InvalidBack)?;

        Ok(ValidatedCard {
            front,
            back,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    pub front: FrontText,
    pub back: BackText,
    pub created_at: DateTime<Utc>,
}

impl ValidatedCard {
    #[must_use]
    pub fn assign_id(self, id: CardId) -> Card {
        Card {
            id,
            front: self.front,
            back: self.back,
            level: Level::UNSEEN,
            created_at: self.created_at,
        }
    }
}

/// A question/answer pair owned by exactly one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    front: FrontText,
    back: BackText,
    level: Level,
    created_at: DateTime<Utc>,
}

impl Card {
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn front(&self) -> &FrontText {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &BackText {
        &self.back
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.level.is_mastered()
    }

    /// Returns a copy of this card at the given level.
    #[must_use]
    pub fn with_level(&self, level: Level) -> Card {
        Card {
            level,
            ..self.clone()
        }
    }
}

//
// ─── CARD ERRORS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("invalid card front: {0}")]
    InvalidFront(#[source] TextError),

    #[error("invalid card back: {0}")]
    InvalidBack(#[source] TextError),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn card_fails_if_front_empty() {
        let err = CardDraft::new("   ", "ok").validate(fixed_now()).unwrap_err();
        assert!(matches!(err, CardError::InvalidFront(_)));
    }

    #[test]
    fn card_fails_if_back_empty() {
        let err = CardDraft::new("ok", "").validate(fixed_now()).unwrap_err();
        assert!(matches!(err, CardError::InvalidBack(_)));
    }

    #[test]
    fn valid_card_starts_unseen_and_trimmed() {
        let card = CardDraft::new(" Mitosis? ", " Cell division ")
            .validate(fixed_now())
            .unwrap()
            .assign_id(CardId::new(42));

        assert_eq!(card.id(), CardId::new(42));
        assert_eq!(card.front().as_str(), "Mitosis?");
        assert_eq!(card.back().as_str(), "Cell division");
        assert_eq!(card.level(), Level::UNSEEN);
        assert_eq!(card.created_at(), fixed_now());
    }

    #[test]
    fn with_level_leaves_original_untouched() {
        let card = CardDraft::new("Q", "A")
            .validate(fixed_now())
            .unwrap()
            .assign_id(CardId::new(1));
        let promoted = card.with_level(Level::MASTERED);

        assert_eq!(card.level(), Level::UNSEEN);
        assert!(promoted.is_mastered());
        assert_eq!(promoted.id(), card.id());
    }
}
