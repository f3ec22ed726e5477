use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use super::schema::Settings;
use crate::keys::KeyMap;

/// Configuration loading helpers.
///
/// `Settings::load_from` reads an optional config file, then environment
/// variables (prefix `TIDAL_TUI__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from `explicit` when given (the file must then exist),
    /// otherwise from the resolved default path.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(::config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = resolve_config_path() {
                    builder =
                        builder.add_source(::config::File::from(path.as_path()).required(false));
                }
            }
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TIDAL_TUI")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.player.command.trim().is_empty() {
            return Err("player.command must not be empty".to_string());
        }
        if self.service.tracks_limit == 0 {
            return Err("service.tracks_limit must be >= 1".to_string());
        }
        if self.ui.tick_ms == 0 {
            return Err("ui.tick_ms must be >= 1".to_string());
        }
        if log::LevelFilter::from_str(&self.log.level).is_err() {
            return Err(format!("log.level {:?} is not a log level", self.log.level));
        }
        KeyMap::from_settings(&self.keys)?;
        Ok(())
    }
}

/// Resolve the config path from `TIDAL_TUI_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TIDAL_TUI_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tidal-tui/config.toml`
/// or `~/.config/tidal-tui/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("tidal-tui").join("config.toml"))
}
