use std::sync::Arc;

use flashdeck_core::model::{
    CardId, Deck, DeckId, Difficulty, Level, SessionTally, StudyError, StudyState,
};
use serde::Serialize;
use storage::repository::{DeckRepository, StorageError};
use tracing::{debug, warn};

use crate::error::SessionError;

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// What the study screen shows for the current card.
///
/// `back` is only filled in while the answer is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub deck_id: DeckId,
    pub deck_title: String,
    pub card_id: CardId,
    pub front: String,
    pub back: Option<String>,
    pub revealed: bool,
    pub position: u64,
    pub total_cards: usize,
    pub level: Level,
}

/// Presentation-agnostic snapshot of a study state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StudyView {
    Idle,
    /// The deck has no cards (or is gone); only closing makes sense.
    Empty {
        deck_id: DeckId,
        deck_title: Option<String>,
    },
    Card(CardView),
}

/// Outcome of marking a card, after the new level was written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkResult {
    pub card_id: CardId,
    pub difficulty: Difficulty,
    pub previous: Level,
    pub level: Level,
    pub position: u64,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Drives a `StudyState` against the deck repository.
///
/// Every mark reloads the deck, so cards added since the session opened are
/// taken into account and the level is written to the card with the same id.
#[derive(Clone)]
pub struct StudyService {
    decks: Arc<dyn DeckRepository>,
}

impl StudyService {
    #[must_use]
    pub fn new(decks: Arc<dyn DeckRepository>) -> Self {
        Self { decks }
    }

    /// Open a session on a deck. A deck without cards opens in the empty state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DeckNotFound` when no deck has that id.
    pub async fn open(&self, deck_id: DeckId) -> Result<StudyState, SessionError> {
        let deck = self.load(deck_id).await?;
        let state = StudyState::open(&deck);
        debug!(%deck_id, cards = deck.cards().len(), "study session opened");
        Ok(state)
    }

    /// Open a session on the first deck that still has cards below mastered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingDue` when every card is mastered or no cards exist.
    pub async fn open_quick(&self) -> Result<StudyState, SessionError> {
        let decks = self.decks.list_decks().await?;
        let deck = decks
            .iter()
            .find(|d| d.has_due_cards())
            .ok_or(SessionError::NothingDue)?;
        debug!(deck_id = %deck.id(), "quick study picked deck");
        Ok(StudyState::open(deck))
    }

    /// Open a session on the first deck in creation order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoDecks` when the collection is empty.
    pub async fn open_first(&self) -> Result<StudyState, SessionError> {
        let decks = self.decks.list_decks().await?;
        let deck = decks.first().ok_or(SessionError::NoDecks)?;
        Ok(StudyState::open(deck))
    }

    /// Show or hide the answer of the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Study` when no card is under review.
    pub fn reveal(&self, state: &mut StudyState) -> Result<bool, SessionError> {
        Ok(state.reveal()?)
    }

    /// Mark the current card, persist its new level and move to the next card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Study` when no card is under review or the deck has no cards.
    /// Returns `SessionError::DeckNotFound` when the deck was removed mid-session;
    /// the state then falls back to the empty view.
    /// Returns `SessionError::Storage` when the new level cannot be written; the
    /// session stays on the same card.
    pub async fn mark(
        &self,
        state: &mut StudyState,
        difficulty: Difficulty,
    ) -> Result<MarkResult, SessionError> {
        let deck_id = match state {
            StudyState::Reviewing(session) => session.deck_id(),
            StudyState::EmptyDeck { deck_id } => return Err(StudyError::EmptyDeck(*deck_id).into()),
            StudyState::Idle => return Err(StudyError::NotReviewing.into()),
        };

        let Some(deck) = self.decks.get_deck(deck_id).await? else {
            *state = StudyState::EmptyDeck { deck_id };
            return Err(SessionError::DeckNotFound(deck_id));
        };

        // The cursor only moves once the new level is stored.
        let mut next = state.clone();
        let outcome = match next.mark(&deck, difficulty) {
            Ok(outcome) => outcome,
            Err(err) => {
                *state = next;
                return Err(err.into());
            }
        };
        match self.decks.update_deck(&outcome.deck).await {
            Ok(()) => *state = next,
            Err(StorageError::NotFound) => {
                *state = StudyState::EmptyDeck { deck_id };
                return Err(SessionError::DeckNotFound(deck_id));
            }
            Err(err) => {
                warn!(%deck_id, error = %err, "mark not saved");
                return Err(err.into());
            }
        }

        let position = state.session().map_or(0, |s| s.position());
        debug!(
            %deck_id,
            card_id = %outcome.card_id,
            %difficulty,
            from = outcome.previous.value(),
            to = outcome.level.value(),
            "card marked"
        );

        Ok(MarkResult {
            card_id: outcome.card_id,
            difficulty,
            previous: outcome.previous,
            level: outcome.level,
            position,
        })
    }

    /// End the session, returning the tally of a running review.
    pub fn close(&self, state: &mut StudyState) -> Option<SessionTally> {
        let deck_id = state.deck_id();
        let tally = state.close();
        if let Some(deck_id) = deck_id {
            debug!(%deck_id, reviewed = tally.map_or(0, |t| t.reviewed), "study session closed");
        }
        tally
    }

    /// Snapshot for rendering, read against the latest deck contents.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if repository access fails.
    pub async fn view(&self, state: &StudyState) -> Result<StudyView, SessionError> {
        let deck_id = match state {
            StudyState::Idle => return Ok(StudyView::Idle),
            StudyState::EmptyDeck { deck_id } => *deck_id,
            StudyState::Reviewing(session) => session.deck_id(),
        };

        let Some(deck) = self.decks.get_deck(deck_id).await? else {
            return Ok(StudyView::Empty {
                deck_id,
                deck_title: None,
            });
        };

        let card = state
            .session()
            .and_then(|session| session.current_card(&deck).map(|card| (session, card)));
        let Some((session, card)) = card else {
            return Ok(empty_view(&deck));
        };

        Ok(StudyView::Card(CardView {
            deck_id,
            deck_title: deck.title().to_owned(),
            card_id: card.id(),
            front: card.front().to_string(),
            back: session.revealed().then(|| card.back().to_string()),
            revealed: session.revealed(),
            position: session.position(),
            total_cards: deck.cards().len(),
            level: card.level(),
        }))
    }

    async fn load(&self, deck_id: DeckId) -> Result<Deck, SessionError> {
        self.decks
            .get_deck(deck_id)
            .await?
            .ok_or(SessionError::DeckNotFound(deck_id))
    }
}

fn empty_view(deck: &Deck) -> StudyView {
    StudyView::Empty {
        deck_id: deck.id(),
        deck_title: Some(deck.title().to_owned()),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    use flashdeck_core::model::{Card, CardDraft, DeckTitle, ValidatedCard};
    use flashdeck_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, NewDeckRecord};

    async fn seeded(cards: &[(&str, &str)]) -> (InMemoryRepository, DeckId) {
        let repo = InMemoryRepository::new();
        let deck = repo
            .insert_new_deck(NewDeckRecord {
                title: DeckTitle::parse("Biology").unwrap(),
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        for (front, back) in cards {
            let validated = CardDraft::new(*front, *back).validate(fixed_now()).unwrap();
            repo.insert_new_card(deck.id(), validated).await.unwrap();
        }
        (repo, deck.id())
    }

    #[tokio::test]
    async fn empty_deck_opens_in_empty_state() {
        let (repo, deck_id) = seeded(&[]).await;
        let study = StudyService::new(Arc::new(repo));

        let mut state = study.open(deck_id).await.unwrap();
        assert_eq!(
            study.view(&state).await.unwrap(),
            StudyView::Empty {
                deck_id,
                deck_title: Some("Biology".into())
            }
        );
        assert!(study.mark(&mut state, Difficulty::Easy).await.is_err());
        assert_eq!(study.close(&mut state), None);
        assert_eq!(study.view(&state).await.unwrap(), StudyView::Idle);
    }

    #[tokio::test]
    async fn open_unknown_deck_fails() {
        let study = StudyService::new(Arc::new(InMemoryRepository::new()));
        let err = study.open(DeckId::new(5)).await.unwrap_err();
        assert!(matches!(err, SessionError::DeckNotFound(_)));
    }

    #[tokio::test]
    async fn view_hides_back_until_revealed() {
        let (repo, deck_id) = seeded(&[("Mitosis?", "Cell division")]).await;
        let study = StudyService::new(Arc::new(repo));
        let mut state = study.open(deck_id).await.unwrap();

        let StudyView::Card(view) = study.view(&state).await.unwrap() else {
            panic!("expected card view");
        };
        assert_eq!(view.front, "Mitosis?");
        assert_eq!(view.back, None);
        assert_eq!(view.total_cards, 1);

        assert!(study.reveal(&mut state).unwrap());
        let StudyView::Card(view) = study.view(&state).await.unwrap() else {
            panic!("expected card view");
        };
        assert_eq!(view.back.as_deref(), Some("Cell division"));
        assert_eq!(view.position, 0);
    }

    #[tokio::test]
    async fn mark_persists_level_to_repository() {
        let (repo, deck_id) = seeded(&[("Q1", "A1"), ("Q2", "A2")]).await;
        let study = StudyService::new(Arc::new(repo.clone()));
        let mut state = study.open(deck_id).await.unwrap();

        let result = study.mark(&mut state, Difficulty::Easy).await.unwrap();
        assert_eq!(result.previous, Level::UNSEEN);
        assert_eq!(result.level.value(), 1);
        assert_eq!(result.position, 1);

        let deck = repo.get_deck(deck_id).await.unwrap().unwrap();
        assert_eq!(deck.card(result.card_id).unwrap().level().value(), 1);
    }

    /// Reads pass through; every deck update fails.
    struct ReadOnlyRepository(InMemoryRepository);

    #[async_trait::async_trait]
    impl DeckRepository for ReadOnlyRepository {
        async fn insert_new_deck(&self, record: NewDeckRecord) -> Result<Deck, StorageError> {
            self.0.insert_new_deck(record).await
        }

        async fn insert_new_card(
            &self,
            deck_id: DeckId,
            card: ValidatedCard,
        ) -> Result<Card, StorageError> {
            self.0.insert_new_card(deck_id, card).await
        }

        async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
            self.0.get_deck(id).await
        }

        async fn list_decks(&self) -> Result<Vec<Deck>, StorageError> {
            self.0.list_decks().await
        }

        async fn update_deck(&self, _deck: &Deck) -> Result<(), StorageError> {
            Err(StorageError::Connection("read-only".into()))
        }

        async fn delete_deck(&self, id: DeckId) -> Result<Deck, StorageError> {
            self.0.delete_deck(id).await
        }
    }

    #[tokio::test]
    async fn failed_write_back_leaves_session_on_same_card() {
        let (repo, deck_id) = seeded(&[("Q1", "A1"), ("Q2", "A2")]).await;
        let study = StudyService::new(Arc::new(ReadOnlyRepository(repo.clone())));
        let mut state = study.open(deck_id).await.unwrap();
        study.reveal(&mut state).unwrap();
        let before = state.clone();

        let err = study.mark(&mut state, Difficulty::Easy).await.unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(state, before);

        let session = state.session().unwrap();
        assert_eq!(session.position(), 0);
        assert!(session.revealed());
        assert_eq!(session.tally(), SessionTally::default());

        let deck = repo.get_deck(deck_id).await.unwrap().unwrap();
        assert_eq!(deck.cards()[0].level(), Level::UNSEEN);
    }

    #[tokio::test]
    async fn removed_deck_degrades_to_empty_view() {
        let (repo, deck_id) = seeded(&[("Q1", "A1")]).await;
        let study = StudyService::new(Arc::new(repo.clone()));
        let mut state = study.open(deck_id).await.unwrap();

        repo.delete_deck(deck_id).await.unwrap();

        assert_eq!(
            study.view(&state).await.unwrap(),
            StudyView::Empty {
                deck_id,
                deck_title: None
            }
        );
        let err = study.mark(&mut state, Difficulty::Easy).await.unwrap_err();
        assert!(matches!(err, SessionError::DeckNotFound(_)));
        assert!(matches!(state, StudyState::EmptyDeck { .. }));
    }

    #[tokio::test]
    async fn quick_study_skips_fully_mastered_decks() {
        let (repo, mastered_id) = seeded(&[("Q1", "A1")]).await;
        let study = StudyService::new(Arc::new(repo.clone()));

        let mut state = study.open(mastered_id).await.unwrap();
        for _ in 0..3 {
            study.mark(&mut state, Difficulty::Easy).await.unwrap();
        }
        assert!(matches!(
            study.open_quick().await.unwrap_err(),
            SessionError::NothingDue
        ));

        let other = repo
            .insert_new_deck(NewDeckRecord {
                title: DeckTitle::parse("Chemistry").unwrap(),
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        let validated = CardDraft::new("H2O?", "Water").validate(fixed_now()).unwrap();
        repo.insert_new_card(other.id(), validated).await.unwrap();

        let state = study.open_quick().await.unwrap();
        assert_eq!(state.deck_id(), Some(other.id()));
    }

    #[tokio::test]
    async fn open_first_needs_a_deck() {
        let study = StudyService::new(Arc::new(InMemoryRepository::new()));
        assert!(matches!(
            study.open_first().await.unwrap_err(),
            SessionError::NoDecks
        ));
    }

    #[tokio::test]
    async fn card_view_serializes_with_state_tag() {
        let (repo, deck_id) = seeded(&[("Q", "A")]).await;
        let study = StudyService::new(Arc::new(repo));
        let state = study.open(deck_id).await.unwrap();

        let json = serde_json::to_value(study.view(&state).await.unwrap()).unwrap();
        assert_eq!(json["state"], "card");
        assert_eq!(json["front"], "Q");
        assert_eq!(json["level"], 0);
        assert!(json["back"].is_null());
    }
}
