use log::{error, info};

use crate::app::App;
use crate::config::ToggleModeSetting;
use crate::player::ToggleMode;
use crate::service::MusicService;

pub fn toggle_mode(setting: ToggleModeSetting) -> ToggleMode {
    match setting {
        ToggleModeSetting::Restart => ToggleMode::Restart,
        ToggleModeSetting::Suspend => ToggleMode::Suspend,
    }
}

/// Fill the Playlists pane. A failed fetch leaves it empty with a status
/// message instead of aborting startup.
pub fn load_playlists<S: MusicService>(service: &S, app: &mut App) {
    match service.list_playlists() {
        Ok(playlists) => {
            info!("loaded {} playlists", playlists.len());
            if playlists.is_empty() {
                app.set_status("No playlists found");
            }
            app.playlists = playlists;
        }
        Err(e) => {
            error!("failed to fetch playlists: {e}");
            app.playlists.clear();
            app.set_status(format!("Could not load playlists: {e}"));
        }
    }
}
