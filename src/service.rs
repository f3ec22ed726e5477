//! The music-service capability the rest of the application talks to.
//!
//! The UI and runtime only see these traits; the concrete TIDAL adapter lives
//! in `crate::tidal`.

mod model;

pub use model::*;

use crate::error::ServiceError;
use crate::session::Credentials;

/// Read access to an authenticated account.
pub trait MusicService {
    /// The account's playlists, in the order the service returns them.
    fn list_playlists(&self) -> Result<Vec<Playlist>, ServiceError>;

    /// Tracks of one playlist, each with a resolved playable URL.
    fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ServiceError>;
}

/// Turns a token triple into a live session, or obtains a new triple
/// interactively.
pub trait Authenticator {
    type Session: MusicService;

    /// Resume a session from stored credentials.
    fn resume(&self, credentials: &Credentials) -> Result<Self::Session, ServiceError>;

    /// Run the interactive login and return the freshly issued credentials.
    fn login(&self) -> Result<Credentials, ServiceError>;
}
