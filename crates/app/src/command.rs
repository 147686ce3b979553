use std::str::FromStr;

use flashdeck_core::model::{DeckId, Difficulty, ParseIdError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("cards are written as `card new <front> | <back>`")]
    MissingSeparator,
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyTarget {
    Deck(DeckId),
    /// First deck with cards still due.
    Quick,
    /// First deck in creation order.
    First,
}

/// One line of host input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DeckNew(String),
    DeckList,
    DeckSelect(DeckId),
    DeckRemove(DeckId),
    /// Show the selected deck.
    DeckCurrent,
    DeckUnselect,
    CardNew { front: String, back: String },
    Stats,
    /// Counters plus the most recently created decks.
    Dashboard,
    Study(StudyTarget),
    Show,
    Reveal,
    Mark(Difficulty),
    Close,
    Help,
    Quit,
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn require<'a>(
    rest: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, what });
    }
    Ok(rest)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (head, rest) = split_word(line);
        match head.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "deck" => parse_deck(rest),
            "card" => parse_card(rest),
            "stats" => Ok(Self::Stats),
            "dashboard" | "home" => Ok(Self::Dashboard),
            "study" => parse_study(rest),
            "show" => Ok(Self::Show),
            "reveal" | "flip" => Ok(Self::Reveal),
            "close" => Ok(Self::Close),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => match other.parse::<Difficulty>() {
                Ok(difficulty) => Ok(Self::Mark(difficulty)),
                Err(_) => Err(CommandError::Unknown(other.to_owned())),
            },
        }
    }
}

fn parse_deck(rest: &str) -> Result<Command, CommandError> {
    let (sub, arg) = split_word(rest);
    match sub {
        // blank titles are passed through so the registry can reject them
        "new" => Ok(Command::DeckNew(arg.to_owned())),
        "list" | "" => Ok(Command::DeckList),
        "select" => Ok(Command::DeckSelect(
            require(arg, "deck select", "a deck id")?.parse()?,
        )),
        "remove" => Ok(Command::DeckRemove(
            require(arg, "deck remove", "a deck id")?.parse()?,
        )),
        "current" => Ok(Command::DeckCurrent),
        "unselect" => Ok(Command::DeckUnselect),
        other => Err(CommandError::Unknown(format!("deck {other}"))),
    }
}

fn parse_card(rest: &str) -> Result<Command, CommandError> {
    let (sub, arg) = split_word(rest);
    if sub != "new" {
        return Err(CommandError::Unknown(format!("card {sub}")));
    }
    let (front, back) = arg.split_once('|').ok_or(CommandError::MissingSeparator)?;
    Ok(Command::CardNew {
        front: front.to_owned(),
        back: back.to_owned(),
    })
}

fn parse_study(rest: &str) -> Result<Command, CommandError> {
    let target = match require(rest, "study", "a deck id, `quick` or `first`")? {
        "quick" => StudyTarget::Quick,
        "first" => StudyTarget::First,
        id => StudyTarget::Deck(id.parse()?),
    };
    Ok(Command::Study(target))
}

pub const HELP: &str = "\
commands:
  deck new <title>             create a deck and select it
  deck list                    list decks with card counts
  deck select <id>             select a deck for new cards
  deck remove <id>             remove a deck and all its cards
  deck current                 show the selected deck
  deck unselect                clear the selection
  card new <front> | <back>    add a card to the selected deck
  stats                        totals, due and mastered counts
  dashboard                    counts plus the five most recent decks
  study <id> | quick | first   open a study session
  show                         show the current card
  reveal                       show or hide the answer
  easy | mid | hard            mark the current card and move on
  close                        end the study session
  quit                         leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deck_commands() {
        assert_eq!(
            "deck new  Biology 101 ".parse::<Command>().unwrap(),
            Command::DeckNew("Biology 101".into())
        );
        assert_eq!("deck".parse::<Command>().unwrap(), Command::DeckList);
        assert_eq!(
            "deck remove 4".parse::<Command>().unwrap(),
            Command::DeckRemove(DeckId::new(4))
        );
        assert_eq!(
            "deck new".parse::<Command>().unwrap(),
            Command::DeckNew(String::new())
        );
        assert_eq!("deck current".parse::<Command>().unwrap(), Command::DeckCurrent);
        assert_eq!("deck unselect".parse::<Command>().unwrap(), Command::DeckUnselect);
        assert_eq!("home".parse::<Command>().unwrap(), Command::Dashboard);
    }

    #[test]
    fn parses_card_with_separator() {
        assert_eq!(
            "card new Mitosis? | Cell division".parse::<Command>().unwrap(),
            Command::CardNew {
                front: "Mitosis? ".into(),
                back: " Cell division".into()
            }
        );
        assert_eq!(
            "card new just a front".parse::<Command>().unwrap_err(),
            CommandError::MissingSeparator
        );
    }

    #[test]
    fn parses_study_targets_and_marks() {
        assert_eq!(
            "study 3".parse::<Command>().unwrap(),
            Command::Study(StudyTarget::Deck(DeckId::new(3)))
        );
        assert_eq!(
            "study quick".parse::<Command>().unwrap(),
            Command::Study(StudyTarget::Quick)
        );
        assert_eq!(
            "Medium".parse::<Command>().unwrap(),
            Command::Mark(Difficulty::Mid)
        );
        assert_eq!("HARD".parse::<Command>().unwrap(), Command::Mark(Difficulty::Hard));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!("   ".parse::<Command>().unwrap_err(), CommandError::Empty);
        assert!(matches!(
            "study".parse::<Command>().unwrap_err(),
            CommandError::MissingArgument { .. }
        ));
        assert!(matches!(
            "deck select x".parse::<Command>().unwrap_err(),
            CommandError::InvalidId(_)
        ));
        assert_eq!(
            "dance".parse::<Command>().unwrap_err(),
            CommandError::Unknown("dance".into())
        );
    }
}
