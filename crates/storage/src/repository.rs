use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flashdeck_core::model::{Card, CardId, Deck, DeckId, DeckTitle, ValidatedCard};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Insert shape for a deck that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeckRecord {
    pub title: DeckTitle,
    pub created_at: DateTime<Utc>,
}

/// Repository contract for decks and the cards they own.
///
/// Ids for decks and cards come from a single sequence, so no deck and card
/// ever share an id and removed ids are never handed out again.
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Append a new, empty deck and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn insert_new_deck(&self, record: NewDeckRecord) -> Result<Deck, StorageError>;

    /// Append a card to the end of a deck and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the deck does not exist.
    async fn insert_new_card(
        &self,
        deck_id: DeckId,
        card: ValidatedCard,
    ) -> Result<Card, StorageError>;

    /// Fetch a deck by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures. A missing deck is `Ok(None)`.
    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError>;

    /// List all decks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_decks(&self) -> Result<Vec<Deck>, StorageError>;

    /// Replace the stored deck that has the same id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the deck was removed.
    async fn update_deck(&self, deck: &Deck) -> Result<(), StorageError>;

    /// Remove a deck together with its cards, returning what was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the deck does not exist.
    async fn delete_deck(&self, id: DeckId) -> Result<Deck, StorageError>;
}

#[derive(Debug)]
struct State {
    decks: Vec<Deck>,
    next_id: u64,
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn position(&self, id: DeckId) -> Option<usize> {
        self.decks.iter().position(|d| d.id() == id)
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            decks: Vec::new(),
            next_id: 1,
        }
    }
}

/// Process-local repository; state lives as long as the handle.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl DeckRepository for InMemoryRepository {
    async fn insert_new_deck(&self, record: NewDeckRecord) -> Result<Deck, StorageError> {
        let mut guard = self.lock()?;
        let id = DeckId::new(guard.allocate_id());
        let deck = Deck::from_title(id, record.title, record.created_at);
        guard.decks.push(deck.clone());
        Ok(deck)
    }

    async fn insert_new_card(
        &self,
        deck_id: DeckId,
        card: ValidatedCard,
    ) -> Result<Card, StorageError> {
        let mut guard = self.lock()?;
        let index = guard.position(deck_id).ok_or(StorageError::NotFound)?;
        let card = card.assign_id(CardId::new(guard.allocate_id()));
        let updated = guard.decks[index].with_card(card.clone());
        guard.decks[index] = updated;
        Ok(card)
    }

    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.decks.iter().find(|d| d.id() == id).cloned())
    }

    async fn list_decks(&self) -> Result<Vec<Deck>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.decks.clone())
    }

    async fn update_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let index = guard.position(deck.id()).ok_or(StorageError::NotFound)?;
        guard.decks[index] = deck.clone();
        Ok(())
    }

    async fn delete_deck(&self, id: DeckId) -> Result<Deck, StorageError> {
        let mut guard = self.lock()?;
        let index = guard.position(id).ok_or(StorageError::NotFound)?;
        Ok(guard.decks.remove(index))
    }
}

/// Repository handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            decks: Arc::new(InMemoryRepository::new()),
        }
    }
}
