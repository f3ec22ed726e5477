use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use log::{debug, warn};
use zbus::object_server::SignalEmitter;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::player::PlaybackState;
use crate::service::Track;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.tidal_tui";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

/// UI-side handle onto the state the D-Bus thread publishes.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        let changed = match self.state.lock() {
            Ok(mut s) if s.playback != playback => {
                s.playback = playback;
                true
            }
            _ => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }

    pub fn set_track_metadata(&self, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.title.clone());
                    s.artist = vec![t.artist.clone()];
                    s.album = Some(t.album.clone());
                    s.url = Some(t.playable_url.clone());
                    s.length_micros = i64::try_from(t.duration_secs)
                        .ok()
                        .and_then(|secs| secs.checked_mul(1_000_000));
                    s.track_id = track_object_path(&t.id);
                }
                None => {
                    s.title = None;
                    s.artist.clear();
                    s.album = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

/// D-Bus object paths only allow `[A-Za-z0-9_]` per element.
fn track_object_path(id: &str) -> Option<OwnedObjectPath> {
    let element: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if element.is_empty() {
        return None;
    }
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{element}"))
        .ok()
        .map(OwnedObjectPath::from)
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tidal-tui"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut insert = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        insert(
            "mpris:trackid",
            s.track_id
                .as_ref()
                .and_then(|p| owned(Value::from(p.clone().into_inner()))),
        );
        insert(
            "xesam:title",
            s.title.clone().and_then(|t| owned(Value::from(t))),
        );
        if !s.artist.is_empty() {
            insert("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        insert(
            "xesam:album",
            s.album.clone().and_then(|a| owned(Value::from(a))),
        );
        insert("xesam:url", s.url.clone().and_then(|u| owned(Value::from(u))));
        insert(
            "mpris:length",
            s.length_micros.and_then(|l| owned(Value::from(l))),
        );
        map
    }
}

/// Start the MPRIS service on its own thread. Commands from media keys and
/// `playerctl` arrive on `tx`; a missing session bus only logs a warning.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(serve(tx, state_for_thread, notify_rx));
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify_rx: Receiver<()>) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!("MPRIS: failed to connect to session bus: {e}");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        warn!("MPRIS: failed to acquire name: {e}");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await
    {
        warn!("MPRIS: failed to register root iface: {e}");
        return;
    }

    if let Err(e) = object_server.at(OBJECT_PATH, PlayerIface { tx, state }).await {
        warn!("MPRIS: failed to register player iface: {e}");
        return;
    }

    let iface_ref = match object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!("MPRIS: player iface vanished: {e}");
            return;
        }
    };
    debug!("MPRIS: serving {BUS_NAME}");

    // Coalesce UI updates and publish PropertiesChanged for them.
    loop {
        Timer::after(Duration::from_millis(250)).await;

        let mut dirty = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => dirty = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if dirty {
            let iface = iface_ref.get().await;
            emit_changes(&iface, iface_ref.signal_emitter()).await;
        }
    }
}

async fn emit_changes(iface: &PlayerIface, emitter: &SignalEmitter<'_>) {
    if let Err(e) = iface.playback_status_changed(emitter).await {
        debug!("MPRIS: PlaybackStatus signal failed: {e}");
    }
    if let Err(e) = iface.metadata_changed(emitter).await {
        debug!("MPRIS: Metadata signal failed: {e}");
    }
}

#[cfg(test)]
mod tests;
