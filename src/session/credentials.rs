use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::ServiceError;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth token triple plus the optional access-token expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(
        default,
        deserialize_with = "deserialize_expiry",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_time: Option<DateTime<Utc>>,
}

/// Parse an expiry timestamp. One without an offset is taken as UTC.
fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.and_utc())
        })
}

fn deserialize_expiry<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_expiry(raw.trim()).map_err(de::Error::custom))
        .transpose()
}

impl Credentials {
    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// True when an expiry is known and has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time.is_some_and(|t| t <= now)
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.trim().is_empty()
    }
}

/// Reads and writes the credential file. Cloning shares the path only.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored credentials.
    ///
    /// Returns `Ok(None)` when the file does not exist and
    /// `MalformedLocalState` when it exists but cannot be used.
    pub fn load(&self) -> Result<Option<Credentials>, ServiceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ServiceError::MalformedLocalState(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };

        let credentials: Credentials = serde_json::from_str(&raw).map_err(|e| {
            ServiceError::MalformedLocalState(format!("{}: {e}", self.path.display()))
        })?;

        if credentials.access_token.trim().is_empty() {
            return Err(ServiceError::MalformedLocalState(format!(
                "{}: access_token is empty",
                self.path.display()
            )));
        }

        Ok(Some(credentials))
    }

    /// Overwrite the credential file with `credentials`.
    pub fn save(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Delete the credential file. Returns whether a file was removed.
    pub fn remove(&self) -> Result<bool, ServiceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
