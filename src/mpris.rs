//! MPRIS D-Bus service exposing the focused card as the "current track".

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

pub const BUS_NAME: &str = "org.mpris.MediaPlayer2.reasons";
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }
}

/// What MPRIS clients see about the focused card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub index: usize,
    pub title: String,
    pub url: Option<String>,
    pub length_micros: Option<i64>,
}

#[derive(Debug, Default)]
struct SharedState {
    status: PlaybackStatus,
    track: Option<TrackInfo>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// A handle that records state but is not served on the bus.
    pub fn detached() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
        }
    }

    pub fn set_status(&self, status: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.status = status;
        }
    }

    pub fn set_track(&self, track: Option<TrackInfo>) {
        if let Ok(mut s) = self.state.lock() {
            s.track = track;
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> PlaybackStatus {
        self.state.lock().map(|s| s.status).unwrap_or_default()
    }
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

fn metadata_map(track: Option<&TrackInfo>) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();
    let Some(t) = track else {
        return map;
    };

    let id = format!("{OBJECT_PATH}/track/{}", t.index);
    if let Some(v) = ObjectPath::try_from(id.as_str())
        .ok()
        .and_then(|p| owned(Value::from(p)))
    {
        map.insert("mpris:trackid".to_string(), v);
    }
    if let Some(v) = owned(Value::from(t.title.clone())) {
        map.insert("xesam:title".to_string(), v);
    }
    if let Some(v) = t.url.clone().and_then(|u| owned(Value::from(u))) {
        map.insert("xesam:url".to_string(), v);
    }
    if let Some(v) = t.length_micros.and_then(|l| owned(Value::from(l))) {
        map.insert("mpris:length".to_string(), v);
    }
    map
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

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
        "reasons"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
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
        self.state
            .lock()
            .map(|s| s.status)
            .unwrap_or_default()
            .as_str()
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
        let Ok(s) = self.state.lock() else {
            return HashMap::new();
        };
        metadata_map(s.track.as_ref())
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let handle = MprisHandle::detached();

    let state_for_thread = handle.state.clone();
    std::thread::spawn(move || {
        block_on(async move {
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

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            info!(name = BUS_NAME, "MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    handle
}

#[cfg(test)]
mod tests;
