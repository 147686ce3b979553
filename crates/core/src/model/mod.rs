mod card;
mod deck;
mod ids;
mod level;
mod session;
mod stats;
mod text;

pub use ids::{CardId, DeckId, ParseIdError};
pub use text::{BackText, DeckTitle, FrontText, Text, TextError};

pub use card::{Card, CardDraft, CardError, ValidatedCard};
pub use deck::{Deck, DeckError};
pub use level::{Difficulty, DifficultyError, Level, LevelError};
pub use session::{MarkOutcome, SessionTally, StudyError, StudySession, StudyState};
pub use stats::{Aggregates, DeckStats};
