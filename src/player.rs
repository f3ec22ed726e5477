//! Playback control over one external player process.
//!
//! The player owns at most one process handle. Starting a track always
//! terminates the previous process before the new one is launched, and
//! dropping the player terminates whatever is still running.

mod process;

pub use process::*;

use log::{error, info, warn};

use crate::error::ServiceError;
use crate::service::Track;

/// The playback state shown in the UI and exported over MPRIS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// How `Player::toggle` pauses a running track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ToggleMode {
    /// Kill on pause, start the track over on resume.
    #[default]
    Restart,
    /// Freeze and thaw the process with signals.
    Suspend,
}

pub struct Player<L: Launcher> {
    launcher: L,
    toggle_mode: ToggleMode,
    current: Option<Track>,
    handle: Option<L::Handle>,
    state: PlaybackState,
}

impl<L: Launcher> Player<L> {
    pub fn new(launcher: L, toggle_mode: ToggleMode) -> Self {
        Self {
            launcher,
            toggle_mode,
            current: None,
            handle: None,
            state: PlaybackState::Stopped,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a process handle is currently held.
    pub fn has_process(&self) -> bool {
        self.handle.is_some()
    }

    /// Replace whatever is playing with `track`.
    ///
    /// The track becomes current even when the launch fails, so a later
    /// toggle retries it.
    pub fn play(&mut self, track: Track) -> Result<(), ServiceError> {
        self.release();
        self.state = PlaybackState::Stopped;

        let launched = self.launcher.launch(&track.playable_url);
        let display = track.display(" - ");
        self.current = Some(track);

        match launched {
            Ok(handle) => {
                info!("playing {display} (pid {})", handle.id());
                self.handle = Some(handle);
                self.state = PlaybackState::Playing;
                Ok(())
            }
            Err(e) => {
                error!("{display}: {e}");
                Err(e)
            }
        }
    }

    /// Pause when playing, resume when paused, restart the current track when
    /// stopped. Does nothing when no track was ever played.
    pub fn toggle(&mut self) -> Result<(), ServiceError> {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => match self.current.clone() {
                Some(track) => self.play(track),
                None => Ok(()),
            },
        }
    }

    /// Terminate the process; the current track is kept.
    pub fn stop(&mut self) {
        self.release();
        self.state = PlaybackState::Stopped;
    }

    /// Check whether the process ended on its own. Returns true when the
    /// playback state changed as a result.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        if handle.is_alive() {
            return false;
        }

        info!("player pid {} exited", handle.id());
        self.handle = None;
        let changed = self.state != PlaybackState::Stopped;
        self.state = PlaybackState::Stopped;
        changed
    }

    fn pause(&mut self) {
        if self.toggle_mode == ToggleMode::Suspend {
            if let Some(handle) = self.handle.as_mut() {
                match handle.suspend() {
                    Ok(()) => {
                        self.state = PlaybackState::Paused;
                        return;
                    }
                    Err(e) => warn!("could not suspend player ({e}), stopping it instead"),
                }
            }
        }

        self.release();
        self.state = PlaybackState::Paused;
    }

    fn resume(&mut self) -> Result<(), ServiceError> {
        if let Some(handle) = self.handle.as_mut() {
            match handle.resume() {
                Ok(()) => {
                    self.state = PlaybackState::Playing;
                    return Ok(());
                }
                Err(e) => warn!("could not resume player ({e}), restarting the track"),
            }
        }

        match self.current.clone() {
            Some(track) => self.play(track),
            None => {
                self.state = PlaybackState::Stopped;
                Ok(())
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.terminate();
        }
    }
}

impl<L: Launcher> Drop for Player<L> {
    fn drop(&mut self) {
        self.release();
    }
}
