use std::sync::Arc;

use flashdeck_core::model::{
    Aggregates, Card, CardDraft, Deck, DeckError, DeckId, DeckStats, DeckTitle,
};
use storage::repository::{DeckRepository, NewDeckRecord, StorageError};
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::Clock;

/// A deck removal as answered by the host's confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalRequest {
    deck_id: DeckId,
    confirmed: bool,
}

impl RemovalRequest {
    #[must_use]
    pub fn confirmed(deck_id: DeckId) -> Self {
        Self {
            deck_id,
            confirmed: true,
        }
    }

    #[must_use]
    pub fn declined(deck_id: DeckId) -> Self {
        Self {
            deck_id,
            confirmed: false,
        }
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }
}

/// Canonical deck collection plus the currently selected deck.
///
/// Selection is a plain field here rather than shared state: it changes only
/// through `create_deck`, `select_deck`, `clear_selection` and `remove_deck`.
pub struct Registry {
    clock: Clock,
    decks: Arc<dyn DeckRepository>,
    selected: Option<DeckId>,
}

impl Registry {
    #[must_use]
    pub fn new(clock: Clock, decks: Arc<dyn DeckRepository>) -> Self {
        Self {
            clock,
            decks,
            selected: None,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<DeckId> {
        self.selected
    }

    /// Create an empty deck and select it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Deck` for a blank title; nothing is stored.
    /// Returns `RegistryError::Storage` if persistence fails.
    pub async fn create_deck(&mut self, title: &str) -> Result<Deck, RegistryError> {
        let title = DeckTitle::parse(title).map_err(|_| DeckError::EmptyTitle)?;
        let deck = self
            .decks
            .insert_new_deck(NewDeckRecord {
                title,
                created_at: self.clock.now(),
            })
            .await?;

        self.selected = Some(deck.id());
        info!(deck_id = %deck.id(), title = deck.title(), "deck created");
        Ok(deck)
    }

    /// Append a card at level 0 to the given deck.
    ///
    /// Text is checked before the deck lookup, so blank input fails the same
    /// way whether or not the deck exists.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NoDeckSelected` when `deck_id` is `None`.
    /// Returns `RegistryError::Card` when front or back is blank.
    /// Returns `RegistryError::DeckNotFound` when no deck has that id.
    pub async fn create_card(
        &self,
        deck_id: Option<DeckId>,
        front: &str,
        back: &str,
    ) -> Result<Card, RegistryError> {
        let deck_id = deck_id.ok_or(RegistryError::NoDeckSelected)?;
        let validated = CardDraft::new(front, back).validate(self.clock.now())?;

        let card = self
            .decks
            .insert_new_card(deck_id, validated)
            .await
            .map_err(|err| not_found_as(err, deck_id))?;

        info!(%deck_id, card_id = %card.id(), "card created");
        Ok(card)
    }

    /// `create_card` against the current selection.
    ///
    /// # Errors
    ///
    /// Same as `create_card`.
    pub async fn create_card_in_selected(
        &self,
        front: &str,
        back: &str,
    ) -> Result<Card, RegistryError> {
        self.create_card(self.selected, front, back).await
    }

    /// Delete a deck and every card in it. Clears the selection if it pointed there.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RemovalNotConfirmed` for a declined request.
    /// Returns `RegistryError::DeckNotFound` when no deck has that id.
    pub async fn remove_deck(&mut self, request: RemovalRequest) -> Result<Deck, RegistryError> {
        let deck_id = request.deck_id;
        if !request.confirmed {
            warn!(%deck_id, "deck removal declined");
            return Err(RegistryError::RemovalNotConfirmed(deck_id));
        }

        let removed = self
            .decks
            .delete_deck(deck_id)
            .await
            .map_err(|err| not_found_as(err, deck_id))?;

        if self.selected == Some(deck_id) {
            self.selected = None;
        }
        info!(%deck_id, cards = removed.cards().len(), "deck removed");
        Ok(removed)
    }

    /// Select an existing deck.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DeckNotFound` when no deck has that id.
    pub async fn select_deck(&mut self, deck_id: DeckId) -> Result<Deck, RegistryError> {
        let deck = self
            .decks
            .get_deck(deck_id)
            .await?
            .ok_or(RegistryError::DeckNotFound(deck_id))?;
        self.selected = Some(deck_id);
        Ok(deck)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected deck, if one is selected and still exists.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if repository access fails.
    pub async fn selected_deck(&self) -> Result<Option<Deck>, RegistryError> {
        match self.selected {
            Some(id) => Ok(self.decks.get_deck(id).await?),
            None => Ok(None),
        }
    }

    /// All decks in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if repository access fails.
    pub async fn decks(&self) -> Result<Vec<Deck>, RegistryError> {
        Ok(self.decks.list_decks().await?)
    }

    /// Fetch a deck by ID. Returns `Ok(None)` when the deck does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if repository access fails.
    pub async fn deck(&self, deck_id: DeckId) -> Result<Option<Deck>, RegistryError> {
        Ok(self.decks.get_deck(deck_id).await?)
    }

    /// The `limit` most recently created decks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if repository access fails.
    pub async fn recent_decks(&self, limit: usize) -> Result<Vec<Deck>, RegistryError> {
        let mut decks = self.decks.list_decks().await?;
        let skip = decks.len().saturating_sub(limit);
        Ok(decks.split_off(skip))
    }

    /// Dashboard counters, recomputed on every call.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if repository access fails.
    pub async fn aggregates(&self) -> Result<Aggregates, RegistryError> {
        let decks = self.decks.list_decks().await?;
        Ok(Aggregates::compute(&decks))
    }

    /// Per-deck counters in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Storage` if repository access fails.
    pub async fn deck_stats(&self) -> Result<Vec<DeckStats>, RegistryError> {
        let decks = self.decks.list_decks().await?;
        Ok(decks.iter().map(DeckStats::from_deck).collect())
    }
}

fn not_found_as(err: StorageError, deck_id: DeckId) -> RegistryError {
    match err {
        StorageError::NotFound => RegistryError::DeckNotFound(deck_id),
        other => RegistryError::Storage(other),
    }
}
