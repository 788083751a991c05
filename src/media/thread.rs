use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::error::MediaError;

use super::sink::{create_sink_at, probe_duration};
use super::types::{
    ElementHandle, ElementId, MediaCmd, MediaEvent, MediaNotice, clamp_position,
};

/// Audio-thread state of one element.
pub(super) struct Element {
    path: PathBuf,
    info: ElementHandle,
    sink: Option<Sink>,
    duration: Option<Duration>,
    paused: bool,
    muted: bool,
    looping: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Element {
    fn volume(&self) -> f32 {
        if self.muted { 0.0 } else { 1.0 }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn duration_secs(&self) -> f64 {
        self.duration.map_or(0.0, |d| d.as_secs_f64())
    }

    fn position_secs(&self) -> f64 {
        clamp_position(self.elapsed().as_secs_f64(), self.duration_secs())
    }

    /// Copy the current state into the handle shared with the UI thread.
    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.position = self.position_secs();
            info.duration = self.duration_secs();
        }
    }

    /// Resume playback. An element parked at its end starts over from 0.
    fn play(&mut self, stream: Option<&OutputStream>) {
        if self.sink.is_none() || !self.paused {
            return;
        }
        if reached_end(self.accumulated, self.duration) {
            let Some(stream) = stream else {
                return;
            };
            if let Err(e) = self.seek(stream, 0.0) {
                warn!("failed to rewind ended media: {e}");
                return;
            }
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.started_at = Some(Instant::now());
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if !self.paused {
            sink.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume());
        }
    }

    /// Rebuild the sink at `target` seconds, keeping play/pause and mute.
    fn seek(&mut self, stream: &OutputStream, target: f64) -> Result<(), MediaError> {
        if self.sink.is_none() {
            return Ok(());
        }

        let target = clamp_position(target, self.duration_secs());
        let start_at = Duration::try_from_secs_f64(target).unwrap_or_default();
        let new_sink = create_sink_at(stream, &self.path, start_at, self.volume())?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(new_sink);
        self.accumulated = start_at;
        Ok(())
    }

    fn ended(&self) -> bool {
        !self.paused && self.sink.as_ref().is_some_and(|s| s.empty())
    }
}

pub(super) fn spawn_media_thread(
    rx: Receiver<MediaCmd>,
    notices: Sender<MediaNotice>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match open_stream() {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("{e}; media elements will stay silent");
                None
            }
        };

        let mut elements: BTreeMap<ElementId, Element> = BTreeMap::new();
        let mut last_tick = Instant::now();

        loop {
            let first = match rx.recv_timeout(tick) {
                Ok(cmd) => Some(cmd),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if let Some(fade_out_ms) =
                drain_commands(first, &rx, stream.as_ref(), &mut elements, &notices)
            {
                fade_out_all(&elements, fade_out_ms);
                for el in elements.values_mut() {
                    if let Some(s) = el.sink.take() {
                        s.stop();
                    }
                    el.paused = true;
                    el.started_at = None;
                    el.publish();
                }
                break;
            }

            // Commands can arrive faster than the tick; time updates must not starve.
            if last_tick.elapsed() >= tick {
                last_tick = Instant::now();
                if let Some(stream) = stream.as_ref() {
                    tick_elements(stream, &mut elements, &notices);
                }
            }
        }

        debug!("media thread exiting");
    })
}

fn open_stream() -> Result<OutputStream, MediaError> {
    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| MediaError::NoOutputDevice(e.to_string()))?;
    // rodio logs to stderr when OutputStream is dropped, which would scribble
    // over the TUI.
    stream.log_on_drop(false);
    Ok(stream)
}

fn emit(notices: &Sender<MediaNotice>, id: ElementId, event: MediaEvent) {
    let _ = notices.send(MediaNotice { id, event });
}

/// Handle `first` and then every command already queued, so a tick never
/// publishes over a seek that is still waiting in the channel.
///
/// Returns the fade-out length once `Quit` is seen; later commands stay queued.
pub(super) fn drain_commands(
    first: Option<MediaCmd>,
    rx: &Receiver<MediaCmd>,
    stream: Option<&OutputStream>,
    elements: &mut BTreeMap<ElementId, Element>,
    notices: &Sender<MediaNotice>,
) -> Option<u64> {
    let pending = first.into_iter().chain(std::iter::from_fn(|| rx.try_recv().ok()));
    for cmd in pending {
        if let MediaCmd::Quit { fade_out_ms } = cmd {
            return Some(fade_out_ms);
        }
        handle_cmd(cmd, stream, elements, notices);
    }
    None
}

/// True once playback has been parked at the end of a known duration.
pub(super) fn reached_end(accumulated: Duration, duration: Option<Duration>) -> bool {
    duration.is_some_and(|d| !d.is_zero() && accumulated >= d)
}

pub(super) fn handle_cmd(
    cmd: MediaCmd,
    stream: Option<&OutputStream>,
    elements: &mut BTreeMap<ElementId, Element>,
    notices: &Sender<MediaNotice>,
) {
    match cmd {
        MediaCmd::Load {
            id,
            path,
            info,
            autoplay,
            muted,
            looping,
        } => {
            let mut el = Element {
                path,
                info,
                sink: None,
                duration: None,
                paused: true,
                muted,
                looping,
                started_at: None,
                accumulated: Duration::ZERO,
            };

            match stream {
                Some(stream) => match create_sink_at(stream, &el.path, Duration::ZERO, el.volume()) {
                    Ok(sink) => {
                        el.sink = Some(sink);
                        el.duration = probe_duration(&el.path);
                        info!(
                            id,
                            path = %el.path.display(),
                            duration = el.duration_secs(),
                            "loaded media"
                        );
                        if let Some(d) = el.duration {
                            emit(notices, id, MediaEvent::LoadedMetadata(d.as_secs_f64()));
                        }
                        if autoplay {
                            el.play(Some(stream));
                        }
                    }
                    Err(e) => warn!(id, "{e}"),
                },
                None => debug!(id, "no output stream; element stays inert"),
            }

            el.publish();
            if let Some(old) = elements.insert(id, el) {
                if let Some(s) = old.sink {
                    s.stop();
                }
            }
        }
        MediaCmd::Play(id) => with_element(elements, id, |el| el.play(stream)),
        MediaCmd::Pause(id) => with_element(elements, id, Element::pause),
        MediaCmd::SetMuted(id, muted) => with_element(elements, id, |el| el.set_muted(muted)),
        MediaCmd::Seek(id, target) => {
            let Some(el) = elements.get_mut(&id) else {
                warn!("{}", MediaError::UnknownElement(id));
                return;
            };
            let Some(stream) = stream else {
                return;
            };
            match el.seek(stream, target) {
                Ok(()) => {
                    el.publish();
                    if el.sink.is_some() {
                        emit(notices, id, MediaEvent::TimeUpdate(el.position_secs()));
                    }
                }
                Err(e) => warn!(id, "seek failed: {e}"),
            }
        }
        // Handled by the thread loop before dispatch.
        MediaCmd::Quit { .. } => {}
    }
}

fn with_element(
    elements: &mut BTreeMap<ElementId, Element>,
    id: ElementId,
    f: impl FnOnce(&mut Element),
) {
    match elements.get_mut(&id) {
        Some(el) => {
            f(el);
            el.publish();
        }
        None => warn!("{}", MediaError::UnknownElement(id)),
    }
}

/// Periodic work: publish positions, restart looping elements, stop ended ones.
fn tick_elements(
    stream: &OutputStream,
    elements: &mut BTreeMap<ElementId, Element>,
    notices: &Sender<MediaNotice>,
) {
    for (&id, el) in elements.iter_mut() {
        if el.paused || el.sink.is_none() {
            continue;
        }

        if el.ended() {
            if el.looping {
                if let Err(e) = el.seek(stream, 0.0) {
                    warn!(id, "failed to restart looping media: {e}");
                    el.pause();
                }
            } else {
                el.pause();
                if let Some(d) = el.duration {
                    el.accumulated = d;
                }
            }
        }

        el.publish();
        emit(notices, id, MediaEvent::TimeUpdate(el.position_secs()));
    }
}

fn fade_out_all(elements: &BTreeMap<ElementId, Element>, fade_out_ms: u64) {
    let audible: Vec<&Sink> = elements
        .values()
        .filter(|el| !el.paused && !el.muted)
        .filter_map(|el| el.sink.as_ref())
        .collect();

    if audible.is_empty() || fade_out_ms == 0 {
        return;
    }

    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        for s in &audible {
            s.set_volume(1.0 - t);
        }
        thread::sleep(Duration::from_millis(step_ms));
    }
}
