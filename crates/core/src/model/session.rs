use serde::Serialize;
use thiserror::Error;

use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::ids::{CardId, DeckId};
use crate::model::level::{Difficulty, Level};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyError {
    #[error("no study session is open")]
    NotReviewing,

    #[error("deck {0} has no cards to study")]
    EmptyDeck(DeckId),

    #[error("session is bound to deck {expected}, got deck {actual}")]
    DeckMismatch { expected: DeckId, actual: DeckId },
}

//
// ─── TALLY ─────────────────────────────────────────────────────────────────────
//

/// Count of markings given during one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTally {
    pub reviewed: u32,
    pub easy: u32,
    pub mid: u32,
    pub hard: u32,
}

impl SessionTally {
    fn record(&mut self, difficulty: Difficulty) {
        self.reviewed = self.reviewed.saturating_add(1);
        let slot = match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Mid => &mut self.mid,
            Difficulty::Hard => &mut self.hard,
        };
        *slot = slot.saturating_add(1);
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Cursor over one deck's cards while reviewing.
///
/// `position` only ever grows; the displayed card is `cards[position % len]`
/// against whatever the deck holds at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySession {
    deck_id: DeckId,
    position: u64,
    revealed: bool,
    tally: SessionTally,
}

impl StudySession {
    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn tally(&self) -> SessionTally {
        self.tally
    }

    #[must_use]
    pub fn current_card<'a>(&self, deck: &'a Deck) -> Option<&'a Card> {
        deck.card_at(self.position)
    }
}

/// Result of marking the current card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOutcome {
    pub card_id: CardId,
    pub difficulty: Difficulty,
    pub previous: Level,
    pub level: Level,
    /// Deck with the new level applied, to be written back by the caller.
    pub deck: Deck,
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StudyState {
    #[default]
    Idle,
    /// Opened on a deck without cards; only `close` does anything.
    EmptyDeck { deck_id: DeckId },
    Reviewing(StudySession),
}

impl StudyState {
    /// Opens a session on `deck`.
    #[must_use]
    pub fn open(deck: &Deck) -> Self {
        if deck.is_empty() {
            return Self::EmptyDeck { deck_id: deck.id() };
        }
        Self::Reviewing(StudySession {
            deck_id: deck.id(),
            position: 0,
            revealed: false,
            tally: SessionTally::default(),
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> Option<DeckId> {
        match self {
            Self::Idle => None,
            Self::EmptyDeck { deck_id } => Some(*deck_id),
            Self::Reviewing(session) => Some(session.deck_id),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&StudySession> {
        match self {
            Self::Reviewing(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Toggles whether the answer is shown. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::EmptyDeck` or `StudyError::NotReviewing` outside a review.
    pub fn reveal(&mut self) -> Result<bool, StudyError> {
        let session = self.reviewing_mut()?;
        session.revealed = !session.revealed;
        Ok(session.revealed)
    }

    /// Applies `difficulty` to the current card of `deck` and advances by one.
    ///
    /// `deck` must be the latest copy of the session's deck. The current card is
    /// resolved from it and updated by id. If the deck has lost all its cards,
    /// the state falls back to `EmptyDeck`.
    ///
    /// # Errors
    ///
    /// Returns `StudyError` when no review is running, the deck does not match,
    /// or the deck has no cards.
    pub fn mark(&mut self, deck: &Deck, difficulty: Difficulty) -> Result<MarkOutcome, StudyError> {
        let session = self.reviewing_mut()?;
        if session.deck_id != deck.id() {
            return Err(StudyError::DeckMismatch {
                expected: session.deck_id,
                actual: deck.id(),
            });
        }

        let Some(card) = session.current_card(deck) else {
            *self = Self::EmptyDeck { deck_id: deck.id() };
            return Err(StudyError::EmptyDeck(deck.id()));
        };

        let previous = card.level();
        let level = previous.apply(difficulty);
        let card_id = card.id();
        let updated = deck.with_card_level(card_id, level);

        session.tally.record(difficulty);
        session.revealed = false;
        session.position = session.position.saturating_add(1);

        Ok(MarkOutcome {
            card_id,
            difficulty,
            previous,
            level,
            deck: updated,
        })
    }

    /// Ends the session. Returns the tally when a review was running.
    pub fn close(&mut self) -> Option<SessionTally> {
        match std::mem::take(self) {
            Self::Reviewing(session) => Some(session.tally),
            _ => None,
        }
    }

    fn reviewing_mut(&mut self) -> Result<&mut StudySession, StudyError> {
        match self {
            Self::Reviewing(session) => Ok(session),
            Self::EmptyDeck { deck_id } => Err(StudyError::EmptyDeck(*deck_id)),
            Self::Idle => Err(StudyError::NotReviewing),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
