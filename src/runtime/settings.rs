use std::path::Path;

use crate::cli::Cli;
use crate::config;

pub fn load_settings(explicit: Option<&Path>) -> config::Settings {
    match config::Settings::load_from(explicit) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("tidal-tui: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("tidal-tui: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Command-line flags win over every other layer.
pub fn apply_cli(settings: &mut config::Settings, cli: &Cli) {
    if let Some(path) = &cli.credentials {
        settings.paths.credentials = path.clone();
    }
    if let Some(path) = &cli.log_file {
        settings.paths.log_file = path.clone();
    }
    if let Some(player) = cli.player.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        settings.player.command = player.to_string();
    }
}
