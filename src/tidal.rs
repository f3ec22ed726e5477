//! Blocking TIDAL adapter implementing `Authenticator` and `MusicService`.
//!
//! Only the calls the application needs are wrapped: the OAuth device login,
//! token refresh, session lookup, playlist and track listing, and the
//! playback-info lookup that yields a playable URL.

mod api;
mod auth;
mod client;

pub use auth::TidalAuthenticator;

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::ServiceSettings;
use crate::error::ServiceError;

const SCOPE: &str = "r_usr w_usr w_sub";
const PLAYLIST_PAGE: usize = 50;
const TRACK_PAGE: usize = 100;

fn http_client(settings: &ServiceSettings) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ServiceError::from)
}
