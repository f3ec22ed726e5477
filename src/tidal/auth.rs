use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;

use super::api::{DeviceAuthorization, OAuthError, SessionInfo, TokenResponse};
use super::client::TidalSession;
use super::{SCOPE, http_client};
use crate::config::ServiceSettings;
use crate::error::ServiceError;
use crate::service::Authenticator;
use crate::session::{CredentialStore, Credentials};

const DEVICE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Logs in with the OAuth device flow and resumes sessions from stored tokens.
pub struct TidalAuthenticator {
    http: Client,
    settings: ServiceSettings,
    store: CredentialStore,
}

impl TidalAuthenticator {
    /// `store` receives refreshed credentials for the lifetime of sessions
    /// created here.
    pub fn new(settings: &ServiceSettings, store: CredentialStore) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http_client(settings)?,
            settings: settings.clone(),
            store,
        })
    }

    fn require_client_id(&self) -> Result<(), ServiceError> {
        if self.settings.client_id.trim().is_empty() {
            return Err(ServiceError::Authentication(
                "service.client_id is not configured".to_string(),
            ));
        }
        Ok(())
    }

    fn refresh_and_store(&self, credentials: &Credentials) -> Result<Credentials, ServiceError> {
        let fresh = refresh(&self.http, &self.settings, credentials)?;
        if let Err(e) = self.store.save(&fresh) {
            warn!("could not save refreshed credentials: {e}");
        }
        Ok(fresh)
    }

    fn lookup_session(&self, credentials: &Credentials) -> Result<SessionInfo, LookupError> {
        let resp = self
            .http
            .get(format!("{}/sessions", self.settings.api_url))
            .header(reqwest::header::AUTHORIZATION, credentials.authorization())
            .send()
            .map_err(|e| LookupError::Failed(e.into()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }
        resp.json::<SessionInfo>()
            .map_err(|e| LookupError::Failed(e.into()))
    }

    fn poll_for_token(&self, device: &DeviceAuthorization) -> Result<Credentials, ServiceError> {
        let deadline = Instant::now() + Duration::from_secs(device.expires_in);
        let mut interval = Duration::from_secs(device.interval.max(1));

        while Instant::now() < deadline {
            thread::sleep(interval);

            let resp = self
                .http
                .post(format!("{}/token", self.settings.auth_url))
                .form(&[
                    ("client_id", self.settings.client_id.as_str()),
                    ("client_secret", self.settings.client_secret.as_str()),
                    ("device_code", device.device_code.as_str()),
                    ("grant_type", DEVICE_GRANT),
                    ("scope", SCOPE),
                ])
                .send()?;

            if resp.status().is_success() {
                let token: TokenResponse = resp.json()?;
                return Ok(token.into_credentials(None));
            }

            let status = resp.status();
            let body: OAuthError = resp.json().map_err(|_| {
                ServiceError::Authentication(format!("token endpoint answered HTTP {status}"))
            })?;
            match body.error.as_str() {
                "authorization_pending" => debug!("device login still pending"),
                "slow_down" => interval += Duration::from_secs(5),
                _ => {
                    return Err(ServiceError::Authentication(
                        body.error_description.unwrap_or(body.error),
                    ));
                }
            }
        }

        Err(ServiceError::Authentication(
            "the login code expired before it was approved".to_string(),
        ))
    }
}

/// Exchange a refresh token for a new access token.
pub(super) fn refresh(
    http: &Client,
    settings: &ServiceSettings,
    credentials: &Credentials,
) -> Result<Credentials, ServiceError> {
    if !credentials.can_refresh() {
        return Err(ServiceError::Authentication(
            "no refresh token stored".to_string(),
        ));
    }

    let resp = http
        .post(format!("{}/token", settings.auth_url))
        .form(&[
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("scope", SCOPE),
        ])
        .send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ServiceError::Authentication(format!(
            "token refresh answered HTTP {status}"
        )));
    }

    let token: TokenResponse = resp.json()?;
    info!("access token refreshed");
    Ok(token.into_credentials(Some(&credentials.refresh_token)))
}

enum LookupError {
    Status(StatusCode),
    Failed(ServiceError),
}

impl Authenticator for TidalAuthenticator {
    type Session = TidalSession;

    fn resume(&self, credentials: &Credentials) -> Result<TidalSession, ServiceError> {
        let mut credentials = credentials.clone();

        if credentials.is_expired_at(Utc::now()) && credentials.can_refresh() {
            info!("stored access token expired, refreshing");
            credentials = self.refresh_and_store(&credentials)?;
        }

        let info = match self.lookup_session(&credentials) {
            Ok(info) => info,
            Err(LookupError::Status(StatusCode::UNAUTHORIZED)) if credentials.can_refresh() => {
                warn!("stored access token rejected, refreshing");
                credentials = self.refresh_and_store(&credentials)?;
                match self.lookup_session(&credentials) {
                    Ok(info) => info,
                    Err(LookupError::Status(status)) => {
                        return Err(ServiceError::Authentication(format!(
                            "session lookup answered HTTP {status}"
                        )));
                    }
                    Err(LookupError::Failed(e)) => return Err(e),
                }
            }
            Err(LookupError::Status(status)) => {
                return Err(ServiceError::Authentication(format!(
                    "session lookup answered HTTP {status}"
                )));
            }
            Err(LookupError::Failed(e)) => return Err(e),
        };

        let country_code = info
            .country_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.settings.country_code.clone());
        info!("session resumed for user {} ({country_code})", info.user_id);

        Ok(TidalSession::new(
            self.http.clone(),
            self.settings.clone(),
            self.store.clone(),
            credentials,
            info.user_id,
            country_code,
        ))
    }

    fn login(&self) -> Result<Credentials, ServiceError> {
        self.require_client_id()?;

        let resp = self
            .http
            .post(format!("{}/device_authorization", self.settings.auth_url))
            .form(&[
                ("client_id", self.settings.client_id.as_str()),
                ("scope", SCOPE),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Authentication(format!(
                "device authorization answered HTTP {status}"
            )));
        }
        let device: DeviceAuthorization = resp.json()?;

        println!(
            "Visit {} to log in (code {}). The code expires in {} seconds.",
            device.link(),
            device.user_code,
            device.expires_in
        );
        info!("waiting for device login approval");

        let credentials = self.poll_for_token(&device)?;
        println!("Login successful!");
        Ok(credentials)
    }
}
