use std::path::PathBuf;

use clap::Parser;

/// Command-line options, with environment fallbacks.
#[derive(Debug, Parser)]
#[command(name = "flashdeck", version, about = "Study flashcard decks from the terminal")]
pub struct Cli {
    /// Read commands from a file instead of stdin.
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Confirm deck removals without asking.
    #[arg(long, env = "FLASHDECK_ASSUME_YES")]
    pub assume_yes: bool,

    /// Print views as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log filter (tracing `EnvFilter` syntax).
    #[arg(long, env = "FLASHDECK_LOG", default_value = "warn")]
    pub log: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings the shell needs, resolved from `Cli`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellOptions {
    pub format: OutputFormat,
    pub assume_yes: bool,
    /// Print prompts; off when reading a script or piped input.
    pub interactive: bool,
}

impl Cli {
    #[must_use]
    pub fn shell_options(&self, stdin_is_terminal: bool) -> ShellOptions {
        ShellOptions {
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            assume_yes: self.assume_yes,
            interactive: self.script.is_none() && stdin_is_terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_text_and_warn() {
        let cli = Cli::try_parse_from(["flashdeck"]).unwrap();
        assert_eq!(cli.log, "warn");
        assert!(cli.script.is_none());
        assert_eq!(cli.shell_options(true).format, OutputFormat::Text);
        assert!(cli.shell_options(true).interactive);
    }

    #[test]
    fn script_disables_prompts() {
        let cli =
            Cli::try_parse_from(["flashdeck", "--script", "cmds.txt", "--json", "--assume-yes"])
                .unwrap();
        let options = cli.shell_options(true);
        assert!(!options.interactive);
        assert!(options.assume_yes);
        assert_eq!(options.format, OutputFormat::Json);
    }
}
