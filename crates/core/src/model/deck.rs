use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::card::Card;
use crate::model::ids::{CardId, DeckId};
use crate::model::level::Level;
use crate::model::text::DeckTitle;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck title cannot be empty")]
    EmptyTitle,
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// A named, ordered collection of flashcards.
///
/// Decks are plain records: every change produces a new `Deck` and the caller
/// swaps it into the collection, so no two owners ever share a mutable deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    title: DeckTitle,
    cards: Vec<Card>,
    created_at: DateTime<Utc>,
}

impl Deck {
    /// Creates a new, empty Deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyTitle` if title is empty or whitespace-only.
    pub fn new(
        id: DeckId,
        title: impl AsRef<str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DeckError> {
        let title = DeckTitle::parse(title).map_err(|_| DeckError::EmptyTitle)?;
        Ok(Self::from_title(id, title, created_at))
    }

    /// Creates a new, empty Deck from an already validated title.
    #[must_use]
    pub fn from_title(id: DeckId, title: DeckTitle, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            cards: Vec::new(),
            created_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    /// Card shown at a session position, wrapping over the current card count.
    ///
    /// Returns `None` for an empty deck.
    #[must_use]
    pub fn card_at(&self, position: u64) -> Option<&Card> {
        let len = u64::try_from(self.cards.len()).ok().filter(|len| *len > 0)?;
        let index = usize::try_from(position % len).ok()?;
        self.cards.get(index)
    }

    #[must_use]
    pub fn due_count(&self) -> usize {
        self.cards.iter().filter(|c| c.level().is_due()).count()
    }

    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered()).count()
    }

    #[must_use]
    pub fn has_due_cards(&self) -> bool {
        self.cards.iter().any(|c| c.level().is_due())
    }

    /// Returns a copy of this deck with `card` appended.
    #[must_use]
    pub fn with_card(&self, card: Card) -> Deck {
        let mut cards = self.cards.clone();
        cards.push(card);
        Deck {
            cards,
            ..self.clone()
        }
    }

    /// Returns a copy of this deck where the card with `card_id` carries `level`.
    ///
    /// Unknown ids leave the deck unchanged.
    #[must_use]
    pub fn with_card_level(&self, card_id: CardId, level: Level) -> Deck {
        let cards = self
            .cards
            .iter()
            .map(|c| {
                if c.id() == card_id {
                    c.with_level(level)
                } else {
                    c.clone()
                }
            })
            .collect();
        Deck {
            cards,
            ..self.clone()
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
