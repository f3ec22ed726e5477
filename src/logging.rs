//! File logging through `log` + `fern`.
//!
//! The terminal belongs to the TUI, so every record goes to the log file.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use log::LevelFilter;

use crate::config::LogSettings;

/// Open the log file, truncating it unless `append` is set.
fn open_log_file(path: &Path, append: bool) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}

fn dispatch(level: LevelFilter, file: File) -> fern::Dispatch {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        // HTTP and D-Bus internals are noisy at debug.
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .level_for("zbus", LevelFilter::Warn)
        .level_for("tracing", LevelFilter::Warn)
        .chain(file)
}

/// Install the global logger writing to `path`.
pub fn init(settings: &LogSettings, path: &Path) -> anyhow::Result<()> {
    let level = LevelFilter::from_str(&settings.level)
        .with_context(|| format!("invalid log level {:?}", settings.level))?;
    let file = open_log_file(path, settings.append)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    dispatch(level, file)
        .apply()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    log::info!(
        "{} {} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
