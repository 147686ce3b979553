//! Plain-text rendering of service snapshots.

use flashdeck_core::model::{Aggregates, Card, Deck, DeckId, DeckStats, SessionTally};
use services::{MarkResult, StudyView};

pub fn deck_created(deck: &Deck) -> String {
    format!("created deck [{}] {} (selected)", deck.id(), deck.title())
}

pub fn card_created(card: &Card, deck_id: DeckId) -> String {
    format!("added card [{}] to deck [{deck_id}]", card.id())
}

pub fn deck_removed(deck: &Deck) -> String {
    format!(
        "removed deck [{}] {} with {} cards",
        deck.id(),
        deck.title(),
        deck.cards().len()
    )
}

pub fn deck_list(stats: &[DeckStats], selected: Option<DeckId>) -> String {
    if stats.is_empty() {
        return "no decks yet; create one with `deck new <title>`".to_owned();
    }
    stats
        .iter()
        .map(|s| {
            let marker = if selected == Some(s.deck_id) { '*' } else { ' ' };
            format!(
                "{marker} [{}] {} ({} cards, {} due, {} mastered)",
                s.deck_id, s.title, s.total, s.due, s.mastered
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn aggregates(agg: &Aggregates) -> String {
    format!(
        "decks: {}\ncards: {}\ndue for review: {}\nmastered: {} / {}",
        agg.total_decks, agg.total_cards, agg.due, agg.mastered, agg.total_cards
    )
}

pub fn dashboard(agg: &Aggregates, recent: &[DeckStats], selected: Option<DeckId>) -> String {
    format!(
        "{}\nrecent decks:\n{}",
        aggregates(agg),
        deck_list(recent, selected)
    )
}

pub fn selected_deck(deck: Option<&Deck>) -> String {
    match deck {
        Some(deck) => format!(
            "selected deck [{}] {} ({} cards)",
            deck.id(),
            deck.title(),
            deck.cards().len()
        ),
        None => "no deck selected".to_owned(),
    }
}

pub fn study_view(view: &StudyView) -> String {
    match view {
        StudyView::Idle => "no study session open".to_owned(),
        StudyView::Empty { deck_title, .. } => {
            let title = deck_title.as_deref().unwrap_or("this deck");
            format!("{title} has no cards. Add some cards first, or `close`.")
        }
        StudyView::Card(card) => {
            // position keeps counting past the end, so "card 5 / 2" after wrapping is expected
            let mut out = format!(
                "{} | card {} / {} | level {}\nQ: {}",
                card.deck_title,
                card.position + 1,
                card.total_cards,
                card.level,
                card.front
            );
            if let Some(back) = &card.back {
                out.push_str("\nA: ");
                out.push_str(back);
            }
            out
        }
    }
}

pub fn mark_result(result: &MarkResult) -> String {
    format!(
        "{}: level {} -> {}",
        result.difficulty, result.previous, result.level
    )
}

pub fn tally(tally: Option<&SessionTally>) -> String {
    match tally {
        Some(t) => format!(
            "session closed: {} reviewed ({} easy, {} mid, {} hard)",
            t.reviewed, t.easy, t.mid, t.hard
        ),
        None => "session closed".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_core::model::{CardId, Level};
    use services::CardView;

    #[test]
    fn deck_list_marks_selection() {
        let stats = vec![
            DeckStats {
                deck_id: DeckId::new(1),
                title: "Biology".into(),
                total: 2,
                due: 1,
                mastered: 1,
            },
            DeckStats {
                deck_id: DeckId::new(4),
                title: "Chemistry".into(),
                total: 0,
                due: 0,
                mastered: 0,
            },
        ];
        let text = deck_list(&stats, Some(DeckId::new(4)));
        assert_eq!(
            text,
            "  [1] Biology (2 cards, 1 due, 1 mastered)\n* [4] Chemistry (0 cards, 0 due, 0 mastered)"
        );
    }

    #[test]
    fn card_view_shows_one_based_position() {
        let view = StudyView::Card(CardView {
            deck_id: DeckId::new(1),
            deck_title: "Biology".into(),
            card_id: CardId::new(2),
            front: "Mitosis?".into(),
            back: Some("Cell division".into()),
            revealed: true,
            position: 0,
            total_cards: 3,
            level: Level::UNSEEN,
        });
        assert_eq!(
            study_view(&view),
            "Biology | card 1 / 3 | level 0\nQ: Mitosis?\nA: Cell division"
        );
    }
}
