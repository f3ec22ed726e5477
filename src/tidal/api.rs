//! JSON shapes exchanged with the TIDAL auth and API hosts.

use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::error::ServiceError;
use crate::service::{Playlist, Track};
use crate::session::Credentials;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    2
}

impl DeviceAuthorization {
    /// The link the user opens to approve the login, with a scheme.
    pub fn link(&self) -> String {
        let uri = self
            .verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri);
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("https://{uri}")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Build stored credentials; `previous_refresh` is kept when the response
    /// does not rotate the refresh token.
    pub fn into_credentials(self, previous_refresh: Option<&str>) -> Credentials {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();
        Credentials {
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            access_token: self.access_token,
            refresh_token,
            expiry_time: self
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: u64,
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    pub total_number_of_items: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub uuid: String,
    pub title: String,
    pub description: Option<String>,
    pub number_of_tracks: Option<usize>,
}

impl From<PlaylistItem> for Playlist {
    fn from(item: PlaylistItem) -> Self {
        Playlist {
            id: item.uuid,
            title: item.title,
            description: item.description.unwrap_or_default(),
            track_count: item.number_of_tracks.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NamedRef {
    #[serde(alias = "title")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub duration: u64,
    pub artist: Option<NamedRef>,
    #[serde(default)]
    pub artists: Vec<NamedRef>,
    pub album: Option<NamedRef>,
    pub allow_streaming: Option<bool>,
    pub stream_ready: Option<bool>,
}

impl TrackItem {
    pub fn is_streamable(&self) -> bool {
        self.allow_streaming.unwrap_or(true) && self.stream_ready.unwrap_or(true)
    }

    pub fn into_track(self, playable_url: String) -> Track {
        let artist = self
            .artist
            .or_else(|| self.artists.into_iter().next())
            .map(|a| a.name)
            .unwrap_or_else(|| "Unknown Artist".to_string());
        Track {
            id: self.id.to_string(),
            title: self.title,
            artist,
            album: self
                .album
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown Album".to_string()),
            duration_secs: self.duration,
            playable_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackInfo {
    pub manifest_mime_type: String,
    pub manifest: String,
}

#[derive(Debug, Deserialize)]
struct BtsManifest {
    #[serde(default)]
    urls: Vec<String>,
}

const BTS_MIME: &str = "application/vnd.tidal.bts";

impl PlaybackInfo {
    /// Extract the first stream URL from a base64 BTS manifest.
    pub fn stream_url(&self) -> Result<String, ServiceError> {
        if self.manifest_mime_type != BTS_MIME {
            return Err(ServiceError::RemoteFetch(format!(
                "unsupported manifest type {}",
                self.manifest_mime_type
            )));
        }
        let raw = general_purpose::STANDARD
            .decode(self.manifest.trim())
            .map_err(|e| ServiceError::RemoteFetch(format!("manifest is not base64: {e}")))?;
        let manifest: BtsManifest = serde_json::from_slice(&raw)
            .map_err(|e| ServiceError::RemoteFetch(format!("manifest is not JSON: {e}")))?;
        manifest
            .urls
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::RemoteFetch("manifest lists no URLs".to_string()))
    }
}
