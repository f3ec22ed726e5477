//! In-memory stand-ins for the service, authenticator and player process.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use crate::error::ServiceError;
use crate::player::{Launcher, PlayerHandle};
use crate::service::{Authenticator, MusicService, Playlist, Track};
use crate::session::Credentials;

pub fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Song {id}"),
        artist: format!("Artist {id}"),
        album: "Album".to_string(),
        duration_secs: 200,
        playable_url: format!("https://stream.example/{id}.flac"),
    }
}

pub fn playlist(id: &str, track_count: usize) -> Playlist {
    Playlist {
        id: id.to_string(),
        title: format!("Playlist {id}"),
        description: String::new(),
        track_count,
    }
}

pub fn credentials(token: &str) -> Credentials {
    Credentials {
        token_type: "Bearer".to_string(),
        access_token: token.to_string(),
        refresh_token: format!("refresh-{token}"),
        expiry_time: None,
    }
}

#[derive(Clone, Default)]
pub struct MockService {
    pub playlists: Vec<Playlist>,
    pub tracks: HashMap<String, Vec<Track>>,
    pub fail: bool,
    /// Token the session was resumed with.
    pub token: String,
}

impl MockService {
    pub fn with_playlists(playlists: Vec<(Playlist, Vec<Track>)>) -> Self {
        let mut service = Self::default();
        for (p, tracks) in playlists {
            service.tracks.insert(p.id.clone(), tracks);
            service.playlists.push(p);
        }
        service
    }
}

impl MusicService for MockService {
    fn list_playlists(&self) -> Result<Vec<Playlist>, ServiceError> {
        if self.fail {
            return Err(ServiceError::RemoteFetch("service unavailable".to_string()));
        }
        Ok(self.playlists.clone())
    }

    fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ServiceError> {
        if self.fail {
            return Err(ServiceError::RemoteFetch("service unavailable".to_string()));
        }
        self.tracks
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| ServiceError::RemoteFetch(format!("no playlist {playlist_id}")))
    }
}

/// Accepts exactly one access token; `login` hands out `login_outcome`.
pub struct MockAuthenticator {
    pub valid_token: String,
    pub login_outcome: Option<Credentials>,
    pub service: MockService,
    pub login_calls: Cell<usize>,
    pub resume_calls: Cell<usize>,
}

impl MockAuthenticator {
    pub fn new(valid_token: &str) -> Self {
        Self {
            valid_token: valid_token.to_string(),
            login_outcome: Some(credentials(valid_token)),
            service: MockService::default(),
            login_calls: Cell::new(0),
            resume_calls: Cell::new(0),
        }
    }
}

impl Authenticator for MockAuthenticator {
    type Session = MockService;

    fn resume(&self, credentials: &Credentials) -> Result<MockService, ServiceError> {
        self.resume_calls.set(self.resume_calls.get() + 1);
        if credentials.access_token != self.valid_token {
            return Err(ServiceError::Authentication("token rejected".to_string()));
        }
        Ok(MockService {
            token: credentials.access_token.clone(),
            ..self.service.clone()
        })
    }

    fn login(&self) -> Result<Credentials, ServiceError> {
        self.login_calls.set(self.login_calls.get() + 1);
        self.login_outcome
            .clone()
            .ok_or_else(|| ServiceError::Authentication("login was not approved".to_string()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcState {
    Running,
    Suspended,
    Killed,
    Exited,
}

pub struct MockHandle {
    id: u32,
    state: Rc<Cell<ProcState>>,
}

impl PlayerHandle for MockHandle {
    fn id(&self) -> u32 {
        self.id
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.state.get(), ProcState::Running | ProcState::Suspended)
    }

    fn terminate(&mut self) {
        if self.is_alive() {
            self.state.set(ProcState::Killed);
        }
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.state.set(ProcState::Suspended);
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        self.state.set(ProcState::Running);
        Ok(())
    }
}

/// Records every launch; processes share their state with the launcher so
/// tests can inspect and end them.
#[derive(Clone, Default)]
pub struct MockLauncher {
    pub procs: Rc<RefCell<Vec<(String, Rc<Cell<ProcState>>)>>>,
    pub fail: Rc<Cell<bool>>,
}

impl MockLauncher {
    pub fn live_count(&self) -> usize {
        self.procs
            .borrow()
            .iter()
            .filter(|(_, s)| matches!(s.get(), ProcState::Running | ProcState::Suspended))
            .count()
    }

    pub fn launched(&self) -> usize {
        self.procs.borrow().len()
    }

    pub fn state_of(&self, i: usize) -> ProcState {
        self.procs.borrow()[i].1.get()
    }

    pub fn url_of(&self, i: usize) -> String {
        self.procs.borrow()[i].0.clone()
    }

    /// Simulate the i-th process finishing on its own.
    pub fn finish(&self, i: usize) {
        self.procs.borrow()[i].1.set(ProcState::Exited);
    }
}

impl Launcher for MockLauncher {
    type Handle = MockHandle;

    fn launch(&self, url: &str) -> Result<MockHandle, ServiceError> {
        if self.fail.get() {
            return Err(ServiceError::PlaybackLaunch("mock player missing".to_string()));
        }
        let state = Rc::new(Cell::new(ProcState::Running));
        let mut procs = self.procs.borrow_mut();
        procs.push((url.to_string(), state.clone()));
        Ok(MockHandle {
            id: procs.len() as u32,
            state,
        })
    }
}
