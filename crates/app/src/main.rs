//! Terminal host for the flashcard registry and study sessions.

mod command;
mod config;
mod render;
mod shell;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use anyhow::Context;
use clap::Parser;
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

use crate::config::Cli;
use crate::shell::Shell;

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let options = cli.shell_options(io::stdin().is_terminal());
    let app = AppServices::in_memory(Clock::default_clock());
    let mut shell = Shell::new(app, io::stdout().lock(), options);

    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            shell.run(BufReader::new(file)).await?;
        }
        None => {
            if options.interactive {
                println!("flashdeck: type `help` for commands");
            }
            shell.run(io::stdin().lock()).await?;
        }
    }
    Ok(())
}
