pub mod adapter;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::path::Path;

use clap::Parser;

use adapter::cli::args::{Cli, Command};
use adapter::cli::commands::{self, CommandResult};
use adapter::cli::state::AppState;
use infrastructure::config::{self, LoadedSettings, UserSettings};
use infrastructure::logging;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Settings come first: they decide whether file logging is on
    let LoadedSettings {
        path: settings_path,
        settings,
        notices,
    } = config::load(cli.config.as_deref());
    logging::setup(cli.verbose, settings.logging.file_enabled);
    for notice in &notices {
        tracing::warn!("{}", notice);
    }
    tracing::info!("Using settings from {}", settings_path.display());

    let result = match cli.command {
        // Settings commands work even when the stores cannot be opened
        Command::Settings(command) => commands::settings(&settings_path, &settings, command),
        command => {
            let runtime = tokio::runtime::Runtime::new()?;
            let state = AppState::from_settings(&settings)?;
            runtime.block_on(dispatch(&state, command, &settings_path, &settings))
        }
    };

    for line in result? {
        println!("{}", line);
    }
    Ok(())
}

async fn dispatch(
    state: &AppState,
    command: Command,
    settings_path: &Path,
    settings: &UserSettings,
) -> CommandResult {
    match command {
        Command::Verify(args) => commands::verify(state, args).await,
        Command::Tokens(command) => commands::tokens(state, command),
        Command::Group(command) => commands::group(state, command),
        Command::Settings(command) => commands::settings(settings_path, settings, command),
    }
}
