use std::io::{self, BufRead, Write};

use flashdeck_core::model::{Aggregates, DeckId, DeckStats};
use serde::Serialize;
use services::{AppServices, RegistryError, RemovalRequest, SessionError, StudyView};
use thiserror::Error;
use tracing::warn;

use crate::command::{Command, CommandError, HELP, StudyTarget};
use crate::config::{OutputFormat, ShellOptions};
use crate::render;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Number of decks the dashboard lists.
const RECENT_DECKS: usize = 5;

#[derive(Serialize)]
struct Dashboard<'a> {
    #[serde(flatten)]
    aggregates: &'a Aggregates,
    recent: &'a [DeckStats],
}

/// Line-oriented host that feeds commands into `AppServices`.
pub struct Shell<W: Write> {
    app: AppServices,
    out: W,
    options: ShellOptions,
}

impl<W: Write> Shell<W> {
    pub fn new(app: AppServices, out: W, options: ShellOptions) -> Self {
        Self { app, out, options }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until end of input or `quit`.
    ///
    /// Action failures are reported and the loop continues; only I/O errors stop it.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that ended the loop.
    pub async fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut line = String::new();
        loop {
            if self.options.interactive {
                write!(self.out, "flashdeck> ")?;
                self.out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            let command = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(err) => {
                    writeln!(self.out, "error: {err}")?;
                    continue;
                }
            };

            let confirmed = match command {
                Command::DeckRemove(deck_id) => self.confirm_removal(deck_id, &mut input)?,
                _ => true,
            };

            match self.execute(command, confirmed).await {
                Ok(()) => {}
                Err(ShellError::Io(err)) => return Err(err),
                Err(err) => {
                    warn!(error = %err, "command failed");
                    writeln!(self.out, "error: {err}")?;
                }
            }
        }
        Ok(())
    }

    fn confirm_removal<R: BufRead>(
        &mut self,
        deck_id: DeckId,
        input: &mut R,
    ) -> io::Result<bool> {
        if self.options.assume_yes {
            return Ok(true);
        }
        write!(self.out, "remove deck [{deck_id}] and all its cards? [y/N] ")?;
        self.out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !self.options.interactive {
            writeln!(self.out)?;
        }
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Run one command against the services.
    ///
    /// # Errors
    ///
    /// Returns `ShellError` when the action is rejected or output fails.
    pub async fn execute(&mut self, command: Command, confirmed: bool) -> Result<(), ShellError> {
        match command {
            Command::DeckNew(title) => {
                let deck = self.app.registry_mut().create_deck(&title).await?;
                self.line(&render::deck_created(&deck))?;
            }
            Command::DeckList => {
                let stats = self.app.registry().deck_stats().await?;
                let selected = self.app.registry().selected();
                match self.options.format {
                    OutputFormat::Json => self.json(&stats)?,
                    OutputFormat::Text => self.line(&render::deck_list(&stats, selected))?,
                }
            }
            Command::DeckSelect(deck_id) => {
                let deck = self.app.registry_mut().select_deck(deck_id).await?;
                self.line(&format!("selected deck [{}] {}", deck.id(), deck.title()))?;
            }
            Command::DeckRemove(deck_id) => {
                let request = if confirmed {
                    RemovalRequest::confirmed(deck_id)
                } else {
                    RemovalRequest::declined(deck_id)
                };
                let removed = self.app.registry_mut().remove_deck(request).await?;
                self.line(&render::deck_removed(&removed))?;
            }
            Command::DeckCurrent => {
                let deck = self.app.registry().selected_deck().await?;
                self.line(&render::selected_deck(deck.as_ref()))?;
            }
            Command::DeckUnselect => {
                self.app.registry_mut().clear_selection();
                self.line("selection cleared")?;
            }
            Command::CardNew { front, back } => {
                let deck_id = self.app.registry().selected();
                let card = self
                    .app
                    .registry()
                    .create_card(deck_id, &front, &back)
                    .await?;
                if let Some(deck_id) = deck_id {
                    self.line(&render::card_created(&card, deck_id))?;
                }
            }
            Command::Stats => {
                let agg = self.app.registry().aggregates().await?;
                match self.options.format {
                    OutputFormat::Json => self.json(&agg)?,
                    OutputFormat::Text => self.line(&render::aggregates(&agg))?,
                }
            }
            Command::Dashboard => {
                let agg = self.app.registry().aggregates().await?;
                let recent: Vec<DeckStats> = self
                    .app
                    .registry()
                    .recent_decks(RECENT_DECKS)
                    .await?
                    .iter()
                    .map(DeckStats::from_deck)
                    .collect();
                let selected = self.app.registry().selected();
                match self.options.format {
                    OutputFormat::Json => self.json(&Dashboard {
                        aggregates: &agg,
                        recent: &recent,
                    })?,
                    OutputFormat::Text => {
                        self.line(&render::dashboard(&agg, &recent, selected))?;
                    }
                }
            }
            Command::Study(target) => {
                let view = match target {
                    StudyTarget::Deck(deck_id) => self.app.open_study(deck_id).await?,
                    StudyTarget::Quick => self.app.open_quick_study().await?,
                    StudyTarget::First => self.app.open_first_study().await?,
                };
                self.view(&view)?;
            }
            Command::Show => {
                let view = self.app.study_view().await?;
                self.view(&view)?;
            }
            Command::Reveal => {
                self.app.reveal()?;
                let view = self.app.study_view().await?;
                self.view(&view)?;
            }
            Command::Mark(difficulty) => {
                let result = self.app.mark(difficulty).await?;
                match self.options.format {
                    OutputFormat::Json => self.json(&result)?,
                    OutputFormat::Text => self.line(&render::mark_result(&result))?,
                }
                let view = self.app.study_view().await?;
                self.view(&view)?;
            }
            Command::Close => {
                let tally = self.app.close_study();
                match self.options.format {
                    OutputFormat::Json => self.json(&tally)?,
                    OutputFormat::Text => self.line(&render::tally(tally.as_ref()))?,
                }
            }
            Command::Help => self.line(HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn view(&mut self, view: &StudyView) -> Result<(), ShellError> {
        match self.options.format {
            OutputFormat::Json => self.json(view),
            OutputFormat::Text => self.line(&render::study_view(view)),
        }
    }

    fn line(&mut self, text: &str) -> Result<(), ShellError> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn json<T: Serialize>(&mut self, value: &T) -> Result<(), ShellError> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}
