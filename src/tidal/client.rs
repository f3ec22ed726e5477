use std::cell::RefCell;

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use super::api::{Page, PlaybackInfo, PlaylistItem, TrackItem};
use super::auth::refresh;
use super::{PLAYLIST_PAGE, TRACK_PAGE};
use crate::config::ServiceSettings;
use crate::error::ServiceError;
use crate::service::{MusicService, Playlist, Track};
use crate::session::{CredentialStore, Credentials};

/// An authenticated TIDAL session bound to one user and country.
pub struct TidalSession {
    http: Client,
    settings: ServiceSettings,
    store: CredentialStore,
    credentials: RefCell<Credentials>,
    user_id: u64,
    country_code: String,
}

impl TidalSession {
    pub(super) fn new(
        http: Client,
        settings: ServiceSettings,
        store: CredentialStore,
        credentials: Credentials,
        user_id: u64,
        country_code: String,
    ) -> Self {
        Self {
            http,
            settings,
            store,
            credentials: RefCell::new(credentials),
            user_id,
            country_code,
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// GET `path` under the API root. A 401 triggers one token refresh and a
    /// single retry.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}/{}", self.settings.api_url, path);

        let mut resp = self.send(&url, query)?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            match self.refresh_credentials() {
                Ok(()) => resp = self.send(&url, query)?,
                Err(e) => warn!("token refresh failed: {e}"),
            }
        }

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::RemoteFetch(format!(
                "{path} answered HTTP {status}"
            )));
        }
        Ok(resp.json()?)
    }

    fn send(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::blocking::Response, ServiceError> {
        let authorization = self.credentials.borrow().authorization();
        debug!("GET {url}");
        Ok(self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .query(query)
            .send()?)
    }

    fn refresh_credentials(&self) -> Result<(), ServiceError> {
        warn!("access token rejected mid-session, refreshing");
        let fresh = refresh(&self.http, &self.settings, &self.credentials.borrow())?;
        if let Err(e) = self.store.save(&fresh) {
            warn!("could not save refreshed credentials: {e}");
        }
        *self.credentials.borrow_mut() = fresh;
        Ok(())
    }

    fn stream_url(&self, track_id: u64) -> Result<String, ServiceError> {
        let info: PlaybackInfo = self.get_json(
            &format!("tracks/{track_id}/playbackinfopostpaywall"),
            &[
                ("countryCode", self.country_code.clone()),
                ("audioquality", self.settings.audio_quality.clone()),
                ("playbackmode", "STREAM".to_string()),
                ("assetpresentation", "FULL".to_string()),
            ],
        )?;
        info.stream_url()
    }
}

impl MusicService for TidalSession {
    fn list_playlists(&self) -> Result<Vec<Playlist>, ServiceError> {
        let path = format!("users/{}/playlists", self.user_id);
        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            let page: Page<PlaylistItem> = self.get_json(
                &path,
                &[
                    ("countryCode", self.country_code.clone()),
                    ("limit", PLAYLIST_PAGE.to_string()),
                    ("offset", offset.to_string()),
                ],
            )?;
            let fetched = page.items.len();
            playlists.extend(page.items.into_iter().map(Playlist::from));
            offset += fetched;

            let total = page.total_number_of_items.unwrap_or(offset);
            if fetched == 0 || offset >= total {
                break;
            }
        }

        debug!("fetched {} playlists", playlists.len());
        Ok(playlists)
    }

    fn list_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ServiceError> {
        let path = format!("playlists/{playlist_id}/tracks");
        let limit = self.settings.tracks_limit;
        let mut items = Vec::new();

        while items.len() < limit {
            let want = TRACK_PAGE.min(limit - items.len());
            let page: Page<TrackItem> = self.get_json(
                &path,
                &[
                    ("countryCode", self.country_code.clone()),
                    ("limit", want.to_string()),
                    ("offset", items.len().to_string()),
                ],
            )?;
            let fetched = page.items.len();
            items.extend(page.items);

            let total = page.total_number_of_items.unwrap_or(items.len());
            if fetched < want || items.len() >= total {
                break;
            }
        }
        items.truncate(limit);

        let mut tracks = Vec::with_capacity(items.len());
        let mut first_error = None;
        for item in items {
            if !item.is_streamable() {
                warn!("skipping track {} ({}): not streamable", item.id, item.title);
                continue;
            }
            match self.stream_url(item.id) {
                Ok(url) => tracks.push(item.into_track(url)),
                Err(e) => {
                    warn!("skipping track {} ({}): {e}", item.id, item.title);
                    first_error.get_or_insert(e);
                }
            }
        }

        // Nothing resolved at all is a fetch failure, not an empty playlist.
        if let (true, Some(e)) = (tracks.is_empty(), first_error) {
            return Err(e);
        }

        debug!("playlist {playlist_id}: {} playable tracks", tracks.len());
        Ok(tracks)
    }
}
