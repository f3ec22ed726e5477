//! Error taxonomy shared by the session, service and player layers.
//!
//! Every failure the application can recover from maps onto one of these
//! variants; only `Authentication` is fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Login or session resume failed. The process exits.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A remote call failed; callers degrade to an empty result.
    #[error("remote fetch failed: {0}")]
    RemoteFetch(String),

    /// The external player could not be started.
    #[error("could not launch player: {0}")]
    PlaybackLaunch(String),

    /// The credential file exists but cannot be read or parsed.
    #[error("unusable local state: {0}")]
    MalformedLocalState(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::RemoteFetch(e.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::MalformedLocalState(e.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::MalformedLocalState(e.to_string())
    }
}
