use log::{debug, error, info, warn};

use super::credentials::CredentialStore;
use crate::error::ServiceError;
use crate::service::Authenticator;

/// Where the login lifecycle currently stands.
///
/// The only paths are `NoSession -> Authenticating -> Authenticated` and
/// `NoSession -> Authenticating -> Failed`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NoSession,
    Authenticating,
    Authenticated,
    Failed,
}

/// Drives one run of the credential/session lifecycle.
pub struct SessionLifecycle<'a, A: Authenticator> {
    auth: &'a A,
    store: &'a CredentialStore,
    state: SessionState,
}

impl<'a, A: Authenticator> SessionLifecycle<'a, A> {
    pub fn new(auth: &'a A, store: &'a CredentialStore) -> Self {
        Self {
            auth,
            store,
            state: SessionState::NoSession,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Resume from the credential file, falling back to interactive login.
    ///
    /// Any error returned is an `Authentication` error and leaves the
    /// lifecycle in `Failed`.
    pub fn establish(&mut self) -> Result<A::Session, ServiceError> {
        if self.state != SessionState::NoSession {
            return Err(ServiceError::Authentication(
                "session lifecycle already ran".to_string(),
            ));
        }
        self.transition(SessionState::Authenticating);

        match self.store.load() {
            Ok(Some(credentials)) => {
                info!("resuming session from {}", self.store.path().display());
                match self.auth.resume(&credentials) {
                    Ok(session) => {
                        self.transition(SessionState::Authenticated);
                        return Ok(session);
                    }
                    Err(e) => warn!("stored session was rejected ({e}), logging in again"),
                }
            }
            Ok(None) => info!("no stored credentials at {}", self.store.path().display()),
            Err(e) => warn!("{e}; treating stored credentials as absent"),
        }

        self.login()
    }

    fn login(&mut self) -> Result<A::Session, ServiceError> {
        let credentials = match self.auth.login() {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e)),
        };

        match self.store.save(&credentials) {
            Ok(()) => info!("saved credentials to {}", self.store.path().display()),
            Err(e) => warn!("could not save credentials: {e}"),
        }

        match self.auth.resume(&credentials) {
            Ok(session) => {
                self.transition(SessionState::Authenticated);
                Ok(session)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, e: ServiceError) -> ServiceError {
        self.transition(SessionState::Failed);
        error!("login failed: {e}");
        match e {
            ServiceError::Authentication(_) => e,
            other => ServiceError::Authentication(other.to_string()),
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("session: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Convenience wrapper running a fresh lifecycle to completion.
pub fn establish<A: Authenticator>(
    auth: &A,
    store: &CredentialStore,
) -> Result<A::Session, ServiceError> {
    SessionLifecycle::new(auth, store).establish()
}
