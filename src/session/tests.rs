use super::*;
use crate::error::ServiceError;
use crate::service::MusicService;
use crate::testing::{MockAuthenticator, credentials, playlist};
use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
    CredentialStore::new(dir.path().join("credentials.json"))
}

#[test]
fn load_returns_none_when_file_is_missing() {
    let dir = tempdir().unwrap();
    assert_eq!(store_in(&dir).load().unwrap(), None);
}

#[test]
fn load_reports_malformed_files() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    for content in ["not json", "{}", r#"{"access_token": "", "refresh_token": "r"}"#] {
        std::fs::write(store.path(), content).unwrap();
        assert!(
            matches!(store.load(), Err(ServiceError::MalformedLocalState(_))),
            "{content}"
        );
    }
}

#[test]
fn save_then_load_round_trips_and_defaults_token_type() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("nested").join("credentials.json"));

    let mut creds = credentials("tok");
    creds.expiry_time = Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap());
    store.save(&creds).unwrap();
    assert_eq!(store.load().unwrap(), Some(creds));

    std::fs::write(
        store.path(),
        r#"{"access_token": "a", "refresh_token": "r"}"#,
    )
    .unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.token_type, "Bearer");
    assert_eq!(loaded.expiry_time, None);
    assert_eq!(loaded.authorization(), "Bearer a");
}

#[test]
fn load_accepts_expiry_without_offset_as_utc() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);

    std::fs::write(
        store.path(),
        r#"{"token_type": "Bearer", "access_token": "a", "refresh_token": "r", "expiry_time": "2024-05-01T12:30:00.123456"}"#,
    )
    .unwrap();
    let expiry = store.load().unwrap().unwrap().expiry_time.unwrap();
    let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
        + chrono::Duration::microseconds(123_456);
    assert_eq!(expiry, expected);

    std::fs::write(
        store.path(),
        r#"{"access_token": "a", "refresh_token": "r", "expiry_time": "2024-05-01T14:30:00+02:00"}"#,
    )
    .unwrap();
    let expiry = store.load().unwrap().unwrap().expiry_time.unwrap();
    assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());

    std::fs::write(
        store.path(),
        r#"{"access_token": "a", "refresh_token": "r", "expiry_time": null}"#,
    )
    .unwrap();
    assert_eq!(store.load().unwrap().unwrap().expiry_time, None);

    std::fs::write(
        store.path(),
        r#"{"access_token": "a", "refresh_token": "r", "expiry_time": "next tuesday"}"#,
    )
    .unwrap();
    assert!(matches!(
        store.load(),
        Err(ServiceError::MalformedLocalState(_))
    ));
}

#[cfg(unix)]
#[test]
fn saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&credentials("tok")).unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn remove_reports_whether_a_file_existed() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    assert!(!store.remove().unwrap());
    store.save(&credentials("tok")).unwrap();
    assert!(store.remove().unwrap());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn expiry_is_checked_against_now() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut creds = credentials("tok");
    assert!(!creds.is_expired_at(now));
    creds.expiry_time = Some(now - chrono::Duration::seconds(1));
    assert!(creds.is_expired_at(now));
    creds.expiry_time = Some(now + chrono::Duration::hours(1));
    assert!(!creds.is_expired_at(now));
}

#[test]
fn stored_credentials_resume_without_login() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&credentials("good")).unwrap();
    let auth = MockAuthenticator::new("good");

    let mut lifecycle = SessionLifecycle::new(&auth, &store);
    let session = lifecycle.establish().unwrap();

    assert_eq!(lifecycle.state(), SessionState::Authenticated);
    assert_eq!(session.token, "good");
    assert_eq!(auth.login_calls.get(), 0);
}

#[test]
fn missing_file_triggers_login_and_persists_credentials() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let auth = MockAuthenticator::new("fresh");

    let session = establish(&auth, &store).unwrap();

    assert_eq!(auth.login_calls.get(), 1);
    assert_eq!(session.token, "fresh");
    assert_eq!(store.load().unwrap(), Some(credentials("fresh")));
}

#[test]
fn malformed_file_triggers_login_instead_of_crashing() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{ definitely not json").unwrap();
    let auth = MockAuthenticator::new("fresh");

    let mut lifecycle = SessionLifecycle::new(&auth, &store);
    assert!(lifecycle.establish().is_ok());
    assert_eq!(lifecycle.state(), SessionState::Authenticated);
    assert_eq!(auth.login_calls.get(), 1);
    assert_eq!(store.load().unwrap(), Some(credentials("fresh")));
}

#[test]
fn rejected_stored_session_falls_back_to_login() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&credentials("revoked")).unwrap();
    let auth = MockAuthenticator::new("fresh");

    let session = establish(&auth, &store).unwrap();
    assert_eq!(session.token, "fresh");
    assert_eq!(auth.login_calls.get(), 1);
    assert_eq!(auth.resume_calls.get(), 2);
}

#[test]
fn failed_login_ends_in_failed_state_with_authentication_error() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let mut auth = MockAuthenticator::new("fresh");
    auth.login_outcome = None;

    let mut lifecycle = SessionLifecycle::new(&auth, &store);
    let err = lifecycle.establish().err().unwrap();

    assert!(matches!(err, ServiceError::Authentication(_)));
    assert_eq!(lifecycle.state(), SessionState::Failed);
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn lifecycle_never_reenters_no_session() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let auth = MockAuthenticator::new("fresh");

    let mut lifecycle = SessionLifecycle::new(&auth, &store);
    lifecycle.establish().unwrap();
    assert!(matches!(
        lifecycle.establish(),
        Err(ServiceError::Authentication(_))
    ));
    assert_eq!(lifecycle.state(), SessionState::Authenticated);
}

#[test]
fn persisted_credentials_reproduce_an_equivalent_session() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    let mut auth = MockAuthenticator::new("fresh");
    auth.service.playlists = vec![playlist("p1", 3), playlist("p2", 0)];

    let first = establish(&auth, &store).unwrap();
    let second = establish(&auth, &store).unwrap();

    assert_eq!(auth.login_calls.get(), 1);
    assert_eq!(first.token, second.token);
    assert_eq!(
        first.list_playlists().unwrap(),
        second.list_playlists().unwrap()
    );
}
