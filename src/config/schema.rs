use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tidal-tui/config.toml` or `~/.config/tidal-tui/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `TIDAL_TUI__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub player: PlayerSettings,
    pub ui: UiSettings,
    pub keys: KeySettings,
    pub paths: PathSettings,
    pub log: LogSettings,
    pub mpris: MprisSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// OAuth client id used for the device login and token refresh.
    pub client_id: String,
    /// OAuth client secret paired with `client_id`.
    pub client_secret: String,
    /// Country code used when the session does not report one.
    pub country_code: String,
    /// Requested stream quality (`LOW`, `HIGH`, `LOSSLESS`).
    pub audio_quality: String,
    /// Maximum number of tracks listed per playlist.
    pub tracks_limit: usize,
    /// Timeout for a single HTTP request (seconds).
    pub timeout_secs: u64,
    pub api_url: String,
    pub auth_url: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            country_code: "US".to_string(),
            audio_quality: "HIGH".to_string(),
            tracks_limit: 25,
            timeout_secs: 30,
            api_url: "https://api.tidal.com/v1".to_string(),
            auth_url: "https://auth.tidal.com/v1/oauth2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Program launched for every track; the playable URL is its last argument.
    pub command: String,
    /// Arguments passed before the URL.
    pub args: Vec<String>,
    /// What the play/pause toggle does to the running player.
    pub toggle_mode: ToggleModeSetting,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec!["--no-video".to_string(), "--no-terminal".to_string()],
            toggle_mode: ToggleModeSetting::Restart,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToggleModeSetting {
    /// Pausing stops the player; resuming starts the track over.
    #[serde(alias = "stop", alias = "stop-restart")]
    Restart,
    /// Pausing freezes the player process (SIGSTOP) and resuming thaws it.
    #[serde(alias = "pause", alias = "signal")]
    Suspend,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long the event loop waits for input before redrawing (milliseconds).
    pub tick_ms: u64,
    /// Whether track rows show their duration.
    pub show_durations: bool,
    /// Separator between title and artist in track rows and the player bar.
    pub track_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: "Home  Explore  Library".to_string(),
            tick_ms: 100,
            show_durations: true,
            track_separator: " - ".to_string(),
        }
    }
}

/// Key names bound to each named action.
///
/// Accepted names: single characters, `ctrl-<c>`, `alt-<c>`, `tab`, `backtab`,
/// `enter`, `space`, `esc`, `backspace`, `delete`, arrow keys, `home`, `end`,
/// `pageup`, `pagedown` and `f1`..`f12`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeySettings {
    pub cycle_pane: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub activate: Vec<String>,
    pub toggle_play: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for KeySettings {
    fn default() -> Self {
        fn keys(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }

        Self {
            cycle_pane: keys(&["tab"]),
            move_up: keys(&["up", "k"]),
            move_down: keys(&["down", "j"]),
            activate: keys(&["enter"]),
            toggle_play: keys(&["space", "p"]),
            quit: keys(&["q", "ctrl-c"]),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    /// JSON file holding the cached token triple.
    pub credentials: PathBuf,
    /// Diagnostic log file.
    pub log_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("credentials.json"),
            log_file: PathBuf::from("tidal_tui.log"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Minimum level written to the log file (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Keep the previous log instead of truncating it at start.
    pub append: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            append: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Register an MPRIS service on the session bus for media keys.
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
