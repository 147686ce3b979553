use std::sync::Arc;

use flashdeck_core::model::{DeckId, Difficulty, SessionTally, StudyState};
use storage::repository::Storage;

use crate::error::SessionError;
use crate::registry::Registry;
use crate::study::{MarkResult, StudyService, StudyView};
use crate::Clock;

/// Assembles the registry and the study service over one storage backend and
/// owns the single study state the host drives.
pub struct AppServices {
    registry: Registry,
    study: StudyService,
    state: StudyState,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        let registry = Registry::new(clock, Arc::clone(&storage.decks));
        let study = StudyService::new(Arc::clone(&storage.decks));
        Self {
            registry,
            study,
            state: StudyState::Idle,
        }
    }

    /// Services backed by a fresh in-memory repository.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Storage::in_memory())
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    #[must_use]
    pub fn study_state(&self) -> &StudyState {
        &self.state
    }

    /// Select `deck_id` and open a study session on it.
    ///
    /// A running session is replaced without further effect on its deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DeckNotFound` when no deck has that id.
    pub async fn open_study(&mut self, deck_id: DeckId) -> Result<StudyView, SessionError> {
        let state = self.study.open(deck_id).await?;
        self.registry
            .select_deck(deck_id)
            .await
            .map_err(|_| SessionError::DeckNotFound(deck_id))?;
        self.replace_state(state).await
    }

    /// Open a session on the first deck with cards still due.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingDue` when there is nothing left to review.
    pub async fn open_quick_study(&mut self) -> Result<StudyView, SessionError> {
        let state = self.study.open_quick().await?;
        self.select_state_deck(&state).await?;
        self.replace_state(state).await
    }

    /// Open a session on the first deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoDecks` when the collection is empty.
    pub async fn open_first_study(&mut self) -> Result<StudyView, SessionError> {
        let state = self.study.open_first().await?;
        self.select_state_deck(&state).await?;
        self.replace_state(state).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::Study` when no card is under review.
    pub fn reveal(&mut self) -> Result<bool, SessionError> {
        self.study.reveal(&mut self.state)
    }

    /// # Errors
    ///
    /// See `StudyService::mark`.
    pub async fn mark(&mut self, difficulty: Difficulty) -> Result<MarkResult, SessionError> {
        self.study.mark(&mut self.state, difficulty).await
    }

    pub fn close_study(&mut self) -> Option<SessionTally> {
        self.study.close(&mut self.state)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if repository access fails.
    pub async fn study_view(&self) -> Result<StudyView, SessionError> {
        self.study.view(&self.state).await
    }

    async fn select_state_deck(&mut self, state: &StudyState) -> Result<(), SessionError> {
        if let Some(deck_id) = state.deck_id() {
            self.registry
                .select_deck(deck_id)
                .await
                .map_err(|_| SessionError::DeckNotFound(deck_id))?;
        }
        Ok(())
    }

    async fn replace_state(&mut self, state: StudyState) -> Result<StudyView, SessionError> {
        self.study.close(&mut self.state);
        self.state = state;
        self.study.view(&self.state).await
    }
}
