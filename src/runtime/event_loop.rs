use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Activation, App, Pane};
use crate::config;
use crate::keys::{Action, KeyMap};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Launcher, PlaybackState, Player};
use crate::runtime::mpris_sync::{self, Published};
use crate::service::MusicService;
use crate::ui::{self, NowPlaying};

/// Main terminal event loop: handles input, UI drawing, player liveness and
/// MPRIS commands. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run<S: MusicService, L: Launcher>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    keymap: &KeyMap,
    app: &mut App,
    service: &S,
    player: &mut Player<L>,
    mpris: Option<&MprisHandle>,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> anyhow::Result<()> {
    let tick = Duration::from_millis(settings.ui.tick_ms);
    let mut published: Option<Published> = None;

    loop {
        if player.poll() {
            info!("player exited on its own");
        }

        if let Some(mpris) = mpris {
            mpris_sync::update_mpris(mpris, player, &mut published);
        }

        terminal.draw(|f| {
            let now = NowPlaying {
                track: player.current_track(),
                state: player.state(),
            };
            ui::draw(f, app, now, &settings.ui, keymap)
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, player) {
                return Ok(());
            }
        }

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = keymap.action_for(&key) {
                    if handle_action(action, app, service, player) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Apply one named action. Returns `true` when the app should quit.
pub fn handle_action<S: MusicService, L: Launcher>(
    action: Action,
    app: &mut App,
    service: &S,
    player: &mut Player<L>,
) -> bool {
    debug!("action {action:?}");
    match action {
        Action::Quit => return true,
        Action::CyclePane => app.cycle_focus(),
        Action::MoveUp => app.move_up(),
        Action::MoveDown => app.move_down(),
        Action::Activate => {
            if let Some(activation) = app.activate() {
                perform_activation(activation, app, service, player);
            }
        }
        Action::TogglePlay => toggle(app, player),
    }
    false
}

/// Carry out what activating a row asked for: fetch a playlist's tracks or
/// play a track.
pub fn perform_activation<S: MusicService, L: Launcher>(
    activation: Activation,
    app: &mut App,
    service: &S,
    player: &mut Player<L>,
) {
    match activation {
        Activation::OpenPlaylist(idx) => open_playlist(idx, app, service),
        Activation::PlayTrack(idx) => play_track(idx, app, player),
    }
}

fn open_playlist<S: MusicService>(idx: usize, app: &mut App, service: &S) {
    let Some(playlist) = app.playlists.get(idx) else {
        return;
    };
    let (id, title) = (playlist.id.clone(), playlist.title.clone());

    match service.list_tracks(&id) {
        Ok(tracks) => {
            info!("playlist {title:?}: {} tracks", tracks.len());
            if tracks.is_empty() {
                app.set_status(format!("{title} has no playable tracks"));
            } else {
                app.clear_status();
            }
            app.set_tracks(idx, tracks);
        }
        Err(e) => {
            error!("failed to fetch tracks for {title:?}: {e}");
            app.set_tracks(idx, Vec::new());
            app.set_status(format!("Could not load {title}: {e}"));
        }
    }
}

fn play_track<L: Launcher>(idx: usize, app: &mut App, player: &mut Player<L>) {
    let Some(track) = app.tracks.get(idx).cloned() else {
        return;
    };
    match player.play(track) {
        Ok(()) => app.clear_status(),
        Err(e) => app.set_status(e.to_string()),
    }
}

fn toggle<L: Launcher>(app: &mut App, player: &mut Player<L>) {
    if let Err(e) = player.toggle() {
        app.set_status(e.to_string());
    }
}

/// Apply a command from the media-key bridge. Returns `true` on quit.
pub fn handle_control_cmd<L: Launcher>(
    cmd: ControlCmd,
    app: &mut App,
    player: &mut Player<L>,
) -> bool {
    debug!("MPRIS command {cmd:?}");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::PlayPause => toggle(app, player),
        ControlCmd::Play => match player.state() {
            PlaybackState::Playing => {}
            _ if player.current_track().is_some() => toggle(app, player),
            _ => {
                if let Some(idx) = app.selected(Pane::Tracks) {
                    play_track(idx, app, player);
                }
            }
        },
        ControlCmd::Pause => {
            if player.is_playing() {
                toggle(app, player);
            }
        }
        ControlCmd::Stop => player.stop(),
        ControlCmd::Next => step(1, app, player),
        ControlCmd::Prev => step(-1, app, player),
    }
    false
}

fn step<L: Launcher>(delta: isize, app: &mut App, player: &mut Player<L>) {
    match app.step_track(delta) {
        Some(idx) => play_track(idx, app, player),
        None => warn!("no tracks to step through"),
    }
}
