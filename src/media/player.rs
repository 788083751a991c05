use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::MediaSettings;

use super::element::{MediaElement, MediaNotifier};
use super::thread::spawn_media_thread;
use super::types::{ElementHandle, ElementId, ElementInfo, MediaCmd, MediaNotice, clamp_position};

/// Owner of the background audio thread.
pub struct MediaRuntime {
    tx: Sender<MediaCmd>,
    notices: Receiver<MediaNotice>,
    settings: MediaSettings,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl MediaRuntime {
    pub fn new(settings: MediaSettings) -> Self {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (notice_tx, notices) = mpsc::channel::<MediaNotice>();

        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let handle = spawn_media_thread(rx, notice_tx, tick);

        Self {
            tx,
            notices,
            settings,
            join: Mutex::new(Some(handle)),
        }
    }

    /// Create element `id` playing the asset at `path` and ask the thread to load it.
    pub fn element(&self, id: ElementId, path: &Path) -> RodioElement {
        let info: ElementHandle = Arc::new(Mutex::new(ElementInfo::default()));

        let _ = self.send(MediaCmd::Load {
            id,
            path: path.to_path_buf(),
            info: info.clone(),
            autoplay: self.settings.autoplay,
            muted: self.settings.start_muted,
            looping: self.settings.looping,
        });

        RodioElement::new(id, self.tx.clone(), info)
    }

    /// Drain the notifications emitted since the last call.
    pub fn notices(&self) -> impl Iterator<Item = MediaNotice> + '_ {
        self.notices.try_iter()
    }

    pub fn send(&self, cmd: MediaCmd) -> Result<(), mpsc::SendError<MediaCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// A media element whose audio is played by the `MediaRuntime` thread.
pub struct RodioElement {
    id: ElementId,
    tx: Sender<MediaCmd>,
    info: ElementHandle,
    notifier: MediaNotifier,
}

impl RodioElement {
    pub fn new(id: ElementId, tx: Sender<MediaCmd>, info: ElementHandle) -> Self {
        Self {
            id,
            tx,
            info,
            notifier: MediaNotifier::new(),
        }
    }
}

impl MediaElement for RodioElement {
    fn play(&self) {
        let _ = self.tx.send(MediaCmd::Play(self.id));
    }

    fn pause(&self) {
        let _ = self.tx.send(MediaCmd::Pause(self.id));
    }

    fn set_muted(&self, muted: bool) {
        let _ = self.tx.send(MediaCmd::SetMuted(self.id, muted));
    }

    fn current_time(&self) -> f64 {
        self.info.lock().map(|i| i.position).unwrap_or(0.0)
    }

    fn set_current_time(&self, seconds: f64) {
        // Like a browser media element, the new position is readable right away;
        // the audio thread catches up asynchronously.
        let target = match self.info.lock() {
            Ok(mut info) => {
                let t = clamp_position(seconds, info.duration);
                info.position = t;
                t
            }
            Err(_) => clamp_position(seconds, 0.0),
        };
        let _ = self.tx.send(MediaCmd::Seek(self.id, target));
    }

    fn duration(&self) -> f64 {
        self.info.lock().map(|i| i.duration).unwrap_or(0.0)
    }

    fn notifier(&self) -> &MediaNotifier {
        &self.notifier
    }
}
