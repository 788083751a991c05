//! The media playback card.
//!
//! A `MediaCard` owns one media element and mirrors its playback into a
//! `PlaybackState`. Controls (`toggle_play`, `toggle_mute`, `skip`, `seek`) act
//! on the element and update the mirror; the element's notifications and the
//! viewport's visibility reports flow back into the mirror through listeners
//! registered on `mount` and released on `unmount`.

mod model;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::trace;

use crate::media::MediaElement;
use crate::signal::Subscription;
use crate::viewport::{TargetId, Viewport};

pub use model::*;

#[derive(Debug, Default)]
struct Mirror {
    playback: PlaybackState,
    visible_since: Option<Instant>,
}

pub struct MediaCard<M> {
    target: TargetId,
    threshold: f64,
    media: Option<M>,
    mirror: Rc<RefCell<Mirror>>,
    listeners: Vec<Subscription>,
}

impl<M: MediaElement> MediaCard<M> {
    /// Create an unmounted card observed as `target`. `media` is `None` when the
    /// asset could not be resolved; the controls then do nothing.
    pub fn new(target: TargetId, media: Option<M>, options: CardOptions) -> Self {
        Self {
            target,
            threshold: options.threshold,
            media,
            mirror: Rc::new(RefCell::new(Mirror {
                playback: PlaybackState::new(options.autoplay, options.start_muted),
                visible_since: None,
            })),
            listeners: Vec::new(),
        }
    }

    /// Start observing visibility and media notifications. Mounting twice is a no-op.
    pub fn mount(&mut self, viewport: &dyn Viewport) {
        if self.is_mounted() {
            return;
        }

        let mirror = self.mirror.clone();
        self.listeners.push(viewport.observe(
            self.target,
            self.threshold,
            Box::new(move |intersecting| {
                let mut m = mirror.borrow_mut();
                if intersecting && !m.playback.is_visible {
                    m.visible_since = Some(Instant::now());
                } else if !intersecting {
                    m.visible_since = None;
                }
                m.playback.is_visible = intersecting;
            }),
        ));

        if let Some(media) = self.media.as_ref() {
            // Metadata may have landed before we started listening.
            let known = media.duration();
            if known > 0.0 {
                self.mirror.borrow_mut().playback.duration = known;
            }

            let mirror = self.mirror.clone();
            self.listeners.push(
                media
                    .notifier()
                    .on_time_update(move |t| mirror.borrow_mut().playback.position = t),
            );
            let mirror = self.mirror.clone();
            self.listeners.push(
                media
                    .notifier()
                    .on_loaded_metadata(move |d| mirror.borrow_mut().playback.duration = d),
            );
        }

        trace!(card = self.target, "card mounted");
    }

    /// Release every listener. The mirror keeps its last values.
    pub fn unmount(&mut self) {
        self.listeners.clear();
        trace!(card = self.target, "card unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn toggle_play(&mut self) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        let mut m = self.mirror.borrow_mut();
        if m.playback.is_playing {
            media.pause();
        } else {
            // Playback refusal by the runtime is not reported back.
            media.play();
        }
        m.playback.is_playing = !m.playback.is_playing;
    }

    pub fn toggle_mute(&mut self) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        let mut m = self.mirror.borrow_mut();
        media.set_muted(!m.playback.is_muted);
        m.playback.is_muted = !m.playback.is_muted;
    }

    /// Move by `delta` seconds; the element clamps the result. `position`
    /// follows on the next time update.
    pub fn skip(&mut self, delta: f64) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        media.set_current_time(media.current_time() + delta);
    }

    /// Jump to `target` seconds and show it right away. The mirror takes the
    /// element's clamped position, so it never runs past `duration`.
    pub fn seek(&mut self, target: f64) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        media.set_current_time(target);
        self.mirror.borrow_mut().playback.position = media.current_time();
    }

    pub fn index(&self) -> TargetId {
        self.target
    }

    pub fn state(&self) -> PlaybackState {
        self.mirror.borrow().playback
    }

    /// When the card last entered the viewport, if it is visible now.
    pub fn visible_since(&self) -> Option<Instant> {
        self.mirror.borrow().visible_since
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }
}

#[cfg(test)]
mod tests;
