mod app;
mod choreography;
mod debounce;
mod logging;
mod ui;

use std::io::stdout;

use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
};
use neonveil_config::Config;
use ratatui::DefaultTerminal;

use crate::app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let (mut config, load_error) = Config::load_or_default();
    config.apply_env();
    if let Some(path) = logging::init(&config.log.level)? {
        tracing::info!(log = %path.display(), "neonveil starting");
    }
    if let Some(err) = load_error {
        tracing::error!(error = %err, "configuration unusable, using defaults");
    }

    let terminal = ratatui::init();
    let result = run(terminal, config);
    if let Err(err) = execute!(stdout(), DisableFocusChange) {
        tracing::warn!(%err, "could not disable focus reporting");
    }
    ratatui::restore();
    result
}

fn run(terminal: DefaultTerminal, config: Config) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    // focus events pause the backdrop while the terminal is in the background
    execute!(stdout(), EnableFocusChange)?;
    App::new(config, size).run(terminal)
}
