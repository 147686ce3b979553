//! Shared error types for the services crate.

use thiserror::Error;

use flashdeck_core::model::{CardError, DeckError, DeckId, StudyError};
use storage::repository::StorageError;

/// Errors emitted by `Registry`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("select or create a deck first")]
    NoDeckSelected,
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error("deck {0} not found")]
    DeckNotFound(DeckId),
    #[error("removal of deck {0} was not confirmed")]
    RemovalNotConfirmed(DeckId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// Blank or missing required input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NoDeckSelected | Self::Deck(_) | Self::Card(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeckNotFound(_))
    }
}

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no cards to review in any deck")]
    NothingDue,
    #[error("there are no decks to study")]
    NoDecks,
    #[error("deck {0} not found")]
    DeckNotFound(DeckId),
    #[error(transparent)]
    Study(#[from] StudyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_core::model::TextError;

    #[test]
    fn registry_error_taxonomy() {
        assert!(RegistryError::NoDeckSelected.is_validation());
        assert!(RegistryError::Card(CardError::InvalidBack(TextError::Empty)).is_validation());
        assert!(RegistryError::DeckNotFound(DeckId::new(3)).is_not_found());
        assert!(!RegistryError::RemovalNotConfirmed(DeckId::new(3)).is_validation());
    }

    #[test]
    fn messages_name_the_deck() {
        let err = SessionError::DeckNotFound(DeckId::new(12));
        assert_eq!(err.to_string(), "deck 12 not found");
    }
}
