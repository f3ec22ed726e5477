use std::io;
use std::panic;
use std::sync::mpsc;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::cli::Cli;
use crate::keys::KeyMap;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::player::{CommandLauncher, Player};
use crate::session::{self, CredentialStore};
use crate::tidal::TidalAuthenticator;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = settings::load_settings(cli.config.as_deref());
    settings::apply_cli(&mut settings, &cli);

    if cli.print_config {
        let rendered = toml::to_string_pretty(&settings).context("failed to render config")?;
        print!("{rendered}");
        return Ok(());
    }

    logging::init(&settings.log, &settings.paths.log_file)?;
    let keymap = KeyMap::from_settings(&settings.keys).unwrap_or_else(|e| {
        warn!("invalid key bindings, using defaults: {e}");
        KeyMap::default()
    });

    let store = CredentialStore::new(settings.paths.credentials.clone());
    if cli.logout && store.remove()? {
        info!("removed stored credentials at {}", store.path().display());
        println!("Removed stored credentials.");
    }

    let auth = TidalAuthenticator::new(&settings.service, store.clone())?;
    let service = session::establish(&auth, &store).map_err(|e| {
        error!("authentication failed: {e}");
        e
    })?;
    info!(
        "logged in as user {} ({})",
        service.user_id(),
        service.country_code()
    );

    let mut app = App::new(Vec::new());
    startup::load_playlists(&service, &mut app);

    let launcher = CommandLauncher::new(
        settings.player.command.clone(),
        settings.player.args.clone(),
    );
    let mut player = Player::new(launcher, startup::toggle_mode(settings.player.toggle_mode));

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .mpris
        .enabled
        .then(|| crate::mpris::spawn_mpris(control_tx.clone()));

    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &keymap,
        &mut app,
        &service,
        &mut player,
        mpris.as_ref(),
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if player.has_process() {
        info!("stopping player");
    }
    player.stop();
    drop(control_tx);
    info!("shutting down");

    run_result
}

/// Leave raw mode and the alternate screen before the default hook prints.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}
