use std::path::PathBuf;

use clap::Parser;

/// Browse TIDAL playlists in the terminal and play them through an external player.
#[derive(Debug, Default, Parser)]
#[command(name = "tidal-tui", version, about)]
pub struct Cli {
    /// Config file to load instead of the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Credential file (overrides `paths.credentials`).
    #[arg(long, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Log file (overrides `paths.log_file`).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Player program (overrides `player.command`).
    #[arg(short, long, value_name = "PROGRAM")]
    pub player: Option<String>,

    /// Forget stored credentials and log in again.
    #[arg(long)]
    pub logout: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}
