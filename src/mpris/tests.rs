use super::*;
use crate::testing::track;
use std::sync::mpsc;

fn handle_with_state() -> (MprisHandle, Arc<Mutex<SharedState>>, mpsc::Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (handle, state, notify_rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state, notify_rx) = handle_with_state();

    let mut t = track("123");
    t.artist = "Test Artist".to_string();
    t.album = "Test Album".to_string();
    handle.set_track_metadata(Some(&t));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some(t.title.as_str()));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("https://stream.example/123.flac"));
        assert_eq!(s.length_micros, Some(200_000_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/123")
        );
    }
    assert!(notify_rx.try_recv().is_ok());

    handle.set_track_metadata(None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn set_playback_notifies_only_on_change() {
    let (handle, _state, notify_rx) = handle_with_state();

    handle.set_playback(PlaybackState::Stopped);
    assert!(notify_rx.try_recv().is_err());

    handle.set_playback(PlaybackState::Playing);
    assert!(notify_rx.try_recv().is_ok());
    handle.set_playback(PlaybackState::Playing);
    assert!(notify_rx.try_recv().is_err());
}

#[test]
fn track_ids_are_sanitized_into_object_paths() {
    assert_eq!(
        track_object_path("ab-c.1").map(|p| p.as_str().to_string()),
        Some("/org/mpris/MediaPlayer2/track/ab_c_1".to_string())
    );
    assert!(track_object_path("").is_none());
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().playback = PlaybackState::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().playback = PlaybackState::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state, _notify_rx) = handle_with_state();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert!(iface.metadata().is_empty());

    handle.set_track_metadata(Some(&track("1")));
    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_control_commands() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx: tx.clone(),
        state: Arc::new(Mutex::new(SharedState::default())),
    };
    let root = RootIface { tx };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();
    root.quit();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop,
            ControlCmd::Quit,
        ]
    );
}
