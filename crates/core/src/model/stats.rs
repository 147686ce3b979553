use serde::Serialize;

use crate::model::deck::Deck;
use crate::model::ids::DeckId;

/// Dashboard counters derived from the whole deck collection.
///
/// Always recomputed from the decks passed in; nothing is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub total_decks: usize,
    pub total_cards: usize,
    /// Cards below the mastered level.
    pub due: usize,
    pub mastered: usize,
}

impl Aggregates {
    #[must_use]
    pub fn compute(decks: &[Deck]) -> Self {
        decks.iter().fold(
            Self {
                total_decks: decks.len(),
                ..Self::default()
            },
            |acc, deck| Self {
                total_cards: acc.total_cards + deck.cards().len(),
                due: acc.due + deck.due_count(),
                mastered: acc.mastered + deck.mastered_count(),
                ..acc
            },
        )
    }
}

/// Per-deck counters shown next to each deck in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    pub deck_id: DeckId,
    pub title: String,
    pub total: usize,
    pub due: usize,
    pub mastered: usize,
}

impl DeckStats {
    #[must_use]
    pub fn from_deck(deck: &Deck) -> Self {
        Self {
            deck_id: deck.id(),
            title: deck.title().to_owned(),
            total: deck.cards().len(),
            due: deck.due_count(),
            mastered: deck.mastered_count(),
        }
    }
}
