//! Application model types: `App`, `Pane` and `Selection`.
//!
//! Nothing here talks to the network or the player. The runtime turns an
//! `Activation` into a fetch or a play call and feeds the result back.

use crate::service::{Playlist, Track};

/// The pane that currently receives navigation keys.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Playlists,
    Tracks,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Playlists => Pane::Tracks,
            Pane::Tracks => Pane::Playlists,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Pane::Playlists => "Playlists",
            Pane::Tracks => "Tracks",
        }
    }
}

/// A row cursor that is always within `[0, len - 1]` for the list it is read
/// against, and absent when that list is empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn get(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    pub fn up(&mut self, len: usize) {
        if let Some(i) = self.get(len) {
            self.index = i.saturating_sub(1);
        }
    }

    pub fn down(&mut self, len: usize) {
        if let Some(i) = self.get(len) {
            self.index = (i + 1).min(len - 1);
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Move to `index`, clamped to the list.
    pub fn set(&mut self, index: usize, len: usize) {
        self.index = index.min(len.saturating_sub(1));
    }
}

/// What activating the focused row asks the runtime to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    OpenPlaylist(usize),
    PlayTrack(usize),
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub playlists: Vec<Playlist>,
    pub tracks: Vec<Track>,
    pub focus: Pane,
    playlist_sel: Selection,
    track_sel: Selection,
    /// Index of the playlist whose tracks fill the Track pane.
    pub open_playlist: Option<usize>,
    pub status: Option<String>,
}

impl App {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self {
            playlists,
            ..Self::default()
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Playlists => self.playlists.len(),
            Pane::Tracks => self.tracks.len(),
        }
    }

    pub fn selected(&self, pane: Pane) -> Option<usize> {
        let len = self.len(pane);
        match pane {
            Pane::Playlists => self.playlist_sel.get(len),
            Pane::Tracks => self.track_sel.get(len),
        }
    }

    fn selection_mut(&mut self, pane: Pane) -> &mut Selection {
        match pane {
            Pane::Playlists => &mut self.playlist_sel,
            Pane::Tracks => &mut self.track_sel,
        }
    }

    pub fn move_up(&mut self) {
        let len = self.len(self.focus);
        self.selection_mut(self.focus).up(len);
    }

    pub fn move_down(&mut self) {
        let len = self.len(self.focus);
        self.selection_mut(self.focus).down(len);
    }

    /// The action for the focused row, or `None` in an empty pane.
    pub fn activate(&self) -> Option<Activation> {
        let idx = self.selected(self.focus)?;
        Some(match self.focus {
            Pane::Playlists => Activation::OpenPlaylist(idx),
            Pane::Tracks => Activation::PlayTrack(idx),
        })
    }

    /// Replace the Track pane with the tracks of playlist `playlist_idx`.
    /// Focus moves to Tracks only when there is something to select.
    pub fn set_tracks(&mut self, playlist_idx: usize, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.track_sel.reset();
        self.open_playlist = Some(playlist_idx);
        if !self.tracks.is_empty() {
            self.focus = Pane::Tracks;
        }
    }

    /// Move the track selection by `delta` rows (clamped) and return the new
    /// row. `None` when the Track pane is empty.
    pub fn step_track(&mut self, delta: isize) -> Option<usize> {
        let len = self.tracks.len();
        let current = self.track_sel.get(len)?;
        let target = current.saturating_add_signed(delta);
        self.track_sel.set(target, len);
        self.track_sel.get(len)
    }

    pub fn open_playlist_title(&self) -> Option<&str> {
        self.open_playlist
            .and_then(|i| self.playlists.get(i))
            .map(|p| p.title.as_str())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
